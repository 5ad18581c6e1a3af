use thiserror::Error;

/// Top-level error type for the `hassctl-api` crate.
///
/// Every endpoint method surfaces exactly one of these variants. The
/// call-time variants carry the operation that was attempted (e.g.
/// `"get state for light.kitchen"`) so callers can build a diagnostic
/// without re-describing the request.
#[derive(Debug, Error)]
pub enum Error {
    // ── Configuration ───────────────────────────────────────────────
    /// Invalid or missing client configuration. Only raised while
    /// constructing a [`ClientConfig`](crate::ClientConfig) or client.
    #[error("invalid client configuration: {message}")]
    Configuration { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// The request never completed (DNS failure, connection refused,
    /// timeout, unusable URL).
    #[error("failed to {operation}: {source}")]
    Transport {
        operation: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    // ── API ─────────────────────────────────────────────────────────
    /// The server answered with a status outside `200..=299`.
    /// `body` is the raw response text, which Home Assistant uses for
    /// its human-readable diagnostic.
    #[error("failed to {operation}: API request failed with status {status}: {body}")]
    Api {
        operation: String,
        status: u16,
        body: String,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// A 2xx response whose body did not match the expected shape.
    #[error("failed to {operation}: could not decode response: {message}")]
    Decode {
        operation: String,
        message: String,
        body: String,
    },
}

impl Error {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub(crate) fn transport(
        operation: &str,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Transport {
            operation: operation.to_owned(),
            source: source.into(),
        }
    }

    /// The operation that was attempted, if this is a call-time error.
    pub fn operation(&self) -> Option<&str> {
        match self {
            Self::Configuration { .. } => None,
            Self::Transport { operation, .. }
            | Self::Api { operation, .. }
            | Self::Decode { operation, .. } => Some(operation),
        }
    }

    /// HTTP status code of an [`Error::Api`] response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if the server reported the resource as missing.
    ///
    /// Resource adapters treat this as "the entity no longer exists".
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404, .. })
    }

    /// Returns `true` if the server rejected the bearer token.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api { status: 401 | 403, .. })
    }

    /// Returns `true` if the exchange exceeded the configured timeout.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Transport { source, .. } => source
                .downcast_ref::<reqwest::Error>()
                .is_some_and(reqwest::Error::is_timeout),
            _ => false,
        }
    }

    /// Returns `true` if the request was handed to the HTTP stack and failed
    /// there, as opposed to being refused before sending (malformed URL,
    /// unserializable body).
    pub fn is_connection(&self) -> bool {
        match self {
            Self::Transport { source, .. } => source.is::<reqwest::Error>(),
            _ => false,
        }
    }

    /// Returns `true` if this is a transient error worth retrying.
    ///
    /// The client itself never retries; this only informs callers.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport { source, .. } => source
                .downcast_ref::<reqwest::Error>()
                .is_some_and(|e| e.is_timeout() || e.is_connect()),
            Self::Api { status, .. } => matches!(status, 502..=504),
            _ => false,
        }
    }
}
