// Home Assistant REST API HTTP client
//
// Wraps `reqwest::Client` with URL construction, status classification and
// JSON decoding. The endpoint groups (system, states, services, events) are
// implemented as inherent methods in separate files to keep this module
// focused on transport mechanics.

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::transport::ClientConfig;

/// Async client for the Home Assistant REST API.
///
/// Holds no mutable state: clones share the underlying connection pool and
/// can issue requests concurrently.
#[derive(Debug, Clone)]
pub struct HassClient {
    http: reqwest::Client,
    base_url: Url,
}

impl HassClient {
    /// Build a client from validated connection settings.
    pub fn new(config: &ClientConfig) -> Result<Self, Error> {
        let http = config.build_http()?;
        Ok(Self {
            http,
            base_url: config.base_url().clone(),
        })
    }

    /// The API root (e.g. `http://homeassistant.local:8123/api`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Append `segments` to the API root, percent-encoding each one.
    ///
    /// Each segment is encoded as a whole, so `/`, `?` and `#` inside an
    /// identifier can never change which resource is addressed. Segments
    /// that are empty, `.` or `..` would collapse into a parent path and are
    /// rejected before anything is sent. An empty slice addresses the root
    /// itself (`/api/`).
    pub(crate) fn url(&self, operation: &str, segments: &[&str]) -> Result<Url, Error> {
        if let Some(bad) = segments.iter().find(|s| matches!(**s, "" | "." | "..")) {
            return Err(Error::transport(
                operation,
                format!("malformed URL: {bad:?} is not a usable path segment"),
            ));
        }

        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| Error::transport(operation, "base URL cannot carry a path"))?;
            path.pop_if_empty();
            if segments.is_empty() {
                path.push("");
            } else {
                path.extend(segments);
            }
        }
        Ok(url)
    }

    // ── Request execution ────────────────────────────────────────────

    /// Send one request and return the raw body of a 2xx response.
    ///
    /// The body is read to completion before the status is checked so the
    /// server's diagnostic text is available on failures. `None` sends a
    /// request without a body (not an empty JSON object).
    pub(crate) async fn execute(
        &self,
        operation: &str,
        method: Method,
        segments: &[&str],
        body: Option<Vec<u8>>,
    ) -> Result<Vec<u8>, Error> {
        let url = self.url(operation, segments)?;
        debug!("{method} {url}");

        let mut request = self.http.request(method, url);
        if let Some(body) = body {
            request = request.body(body);
        }

        let resp = request
            .send()
            .await
            .map_err(|e| Error::transport(operation, e))?;
        let status = resp.status();
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| Error::transport(operation, e))?;
        trace!(status = status.as_u16(), len = bytes.len(), "response received");

        if status.is_success() {
            Ok(bytes.to_vec())
        } else {
            Err(Error::Api {
                operation: operation.to_owned(),
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            })
        }
    }

    /// Send a GET request and decode the JSON response.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        operation: &str,
        segments: &[&str],
    ) -> Result<T, Error> {
        let body = self.execute(operation, Method::GET, segments, None).await?;
        decode(operation, &body)
    }

    /// Send a POST request with a JSON body and decode the JSON response.
    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        operation: &str,
        segments: &[&str],
        body: &B,
    ) -> Result<T, Error> {
        let payload = encode(operation, body)?;
        let body = self
            .execute(operation, Method::POST, segments, Some(payload))
            .await?;
        decode(operation, &body)
    }

    /// Send a POST request, with a JSON body only when `body` is `Some`.
    pub(crate) async fn post_optional<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        operation: &str,
        segments: &[&str],
        body: Option<&B>,
    ) -> Result<T, Error> {
        let payload = body.map(|b| encode(operation, b)).transpose()?;
        let body = self
            .execute(operation, Method::POST, segments, payload)
            .await?;
        decode(operation, &body)
    }
}

// ── Body codecs ──────────────────────────────────────────────────────

/// Serialize a request body. Failure means the request never left, so it is
/// classified as a transport error.
fn encode<B: Serialize + ?Sized>(operation: &str, body: &B) -> Result<Vec<u8>, Error> {
    serde_json::to_vec(body).map_err(|e| Error::transport(operation, e))
}

fn decode<T: DeserializeOwned>(operation: &str, body: &[u8]) -> Result<T, Error> {
    serde_json::from_slice(body).map_err(|e| {
        let text = String::from_utf8_lossy(body).into_owned();
        let preview: String = text.chars().take(200).collect();
        Error::Decode {
            operation: operation.to_owned(),
            message: format!("{e} (body preview: {preview:?})"),
            body: text,
        }
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    fn client() -> HassClient {
        let config = ClientConfig::from_host(
            "homeassistant.local",
            None,
            SecretString::from("token".to_owned()),
        )
        .unwrap();
        HassClient::new(&config).unwrap()
    }

    #[test]
    fn root_url_keeps_trailing_slash() {
        let url = client().url("check API health", &[]).unwrap();
        assert_eq!(url.as_str(), "http://homeassistant.local:8123/api/");
    }

    #[test]
    fn segments_are_appended() {
        let url = client()
            .url("call service", &["services", "light", "turn_on"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://homeassistant.local:8123/api/services/light/turn_on"
        );
    }

    #[test]
    fn reserved_characters_are_escaped_and_round_trip() {
        let ids = [
            "light.living_room",
            "sensor.a/b",
            "sensor.what?x=1",
            "sensor.hash#frag",
            "sensor.100%",
            "sensor.with space",
            "sensor.ümlaut",
        ];

        for id in ids {
            let url = client().url("get state", &["states", id]).unwrap();

            assert!(url.query().is_none(), "{id}: query leaked into {url}");
            assert!(url.fragment().is_none(), "{id}: fragment leaked into {url}");

            let segments: Vec<&str> = url.path_segments().unwrap().collect();
            assert_eq!(segments.len(), 3, "{id}: {url}");
            assert_eq!(segments[0], "api");
            assert_eq!(segments[1], "states");

            let decoded = url::form_urlencoded::parse(format!("k={}", segments[2]).as_bytes())
                .next()
                .map(|(_, v)| v.into_owned())
                .unwrap();
            // form decoding treats `+` as space; none of the ids contain `+`
            assert_eq!(decoded, id, "{url}");
        }
    }

    #[test]
    fn dot_and_empty_segments_are_rejected() {
        for id in ["", ".", ".."] {
            let err = client().url("get state", &["states", id]).unwrap_err();
            assert!(matches!(err, Error::Transport { .. }), "{id:?}: {err:?}");
            assert_eq!(err.operation(), Some("get state"));
        }
        // Dots inside an identifier are ordinary characters.
        let url = client().url("get state", &["states", "..."]).unwrap();
        assert_eq!(url.path(), "/api/states/...");
    }

    #[test]
    fn decode_error_keeps_body() {
        let err = decode::<crate::ApiStatus>("check API health", b"not json").unwrap_err();
        match err {
            Error::Decode { operation, body, .. } => {
                assert_eq!(operation, "check API health");
                assert_eq!(body, "not json");
            }
            other => panic!("expected Decode, got {other:?}"),
        }
    }
}
