// Connection configuration and `reqwest::Client` construction.
//
// Every request carries the bearer token and a JSON content type; both are
// installed once as default headers so the endpoint methods never touch auth.

use std::fmt;
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::error::Error;

/// Port Home Assistant listens on when none is configured.
pub const DEFAULT_PORT: u16 = 8123;

/// Timeout applied to the whole exchange (connect, send, read body).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = concat!("hassctl/", env!("CARGO_PKG_VERSION"));

/// Validated connection settings for a [`HassClient`](crate::HassClient).
///
/// The base URL and token are guaranteed non-empty once constructed.
#[derive(Clone)]
pub struct ClientConfig {
    base_url: Url,
    token: SecretString,
    timeout: Duration,
}

impl ClientConfig {
    /// Build from an explicit API root such as `http://homeassistant.local:8123/api`.
    pub fn new(base_url: &str, token: SecretString) -> Result<Self, Error> {
        if base_url.trim().is_empty() {
            return Err(Error::configuration("base URL is required"));
        }
        if token.expose_secret().trim().is_empty() {
            return Err(Error::configuration("bearer token is required"));
        }

        let base_url = Self::normalize_base_url(base_url)?;

        Ok(Self {
            base_url,
            token,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Build `http://{host}:{port}/api`, using [`DEFAULT_PORT`] when `port` is `None`.
    ///
    /// `host` is a bare name or IP address; IPv6 literals may be given with
    /// or without brackets.
    pub fn from_host(host: &str, port: Option<u16>, token: SecretString) -> Result<Self, Error> {
        let host = host.trim();
        if host.is_empty() {
            return Err(Error::configuration("host name is required"));
        }
        if host.contains('/') {
            return Err(Error::configuration(format!(
                "host must be a name or IP address without scheme or path, got {host:?}"
            )));
        }
        let port = port.unwrap_or(DEFAULT_PORT);
        if host.contains(':') && !host.starts_with('[') {
            Self::new(&format!("http://[{host}]:{port}/api"), token)
        } else {
            Self::new(&format!("http://{host}:{port}/api"), token)
        }
    }

    /// Override the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The API root every endpoint path is resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Parse and strip the trailing slash so segments can be appended uniformly.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw.trim())
            .map_err(|e| Error::configuration(format!("invalid base URL {raw:?}: {e}")))?;

        if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
            return Err(Error::configuration(format!(
                "base URL must be an http(s) URL, got {raw:?}"
            )));
        }
        if url.host_str().is_none_or(str::is_empty) {
            return Err(Error::configuration(format!("base URL has no host: {raw:?}")));
        }

        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&path);
        url.set_query(None);
        url.set_fragment(None);

        Ok(url)
    }

    /// Build the `reqwest::Client` shared by every request.
    pub(crate) fn build_http(&self) -> Result<reqwest::Client, Error> {
        let mut headers = HeaderMap::new();

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", self.token.expose_secret()))
            .map_err(|e| Error::configuration(format!("invalid bearer token header value: {e}")))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(|e| Error::configuration(format!("failed to build HTTP client: {e}")))
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url.as_str())
            .field("token", &"[REDACTED]")
            .field("timeout", &self.timeout)
            .finish()
    }
}
