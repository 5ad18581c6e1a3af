//! CLI error types with miette diagnostics.
//!
//! Maps `hassctl_api::Error` and `ConfigError` into user-facing errors with
//! actionable help text and a stable exit code.

use miette::Diagnostic;
use thiserror::Error;

use hassctl_config::ConfigError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach Home Assistant ({operation})")]
    #[diagnostic(
        code(hassctl::connection_failed),
        help(
            "Check that Home Assistant is running and reachable.\n\
             Try: hassctl health -v"
        )
    )]
    ConnectionFailed {
        operation: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Request timed out ({operation})")]
    #[diagnostic(
        code(hassctl::timeout),
        help("Increase the timeout with --timeout or check server responsiveness.")
    )]
    Timeout { operation: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {body}")]
    #[diagnostic(
        code(hassctl::auth_failed),
        help(
            "Verify the long-lived access token (Profile > Security in Home Assistant).\n\
             Store a new one with: hassctl config set-token"
        )
    )]
    AuthFailed { body: String },

    #[error("No bearer token configured for profile '{profile}'")]
    #[diagnostic(
        code(hassctl::no_credentials),
        help(
            "Configure credentials with: hassctl config init\n\
             Or set the HA_BEARER_TOKEN environment variable."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("Not found while trying to {operation}: {body}")]
    #[diagnostic(code(hassctl::not_found), help("{hint}"))]
    NotFound {
        operation: String,
        body: String,
        hint: String,
    },

    // ── API ──────────────────────────────────────────────────────────
    #[error("{0}")]
    #[diagnostic(code(hassctl::api_error))]
    Api(hassctl_api::Error),

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(hassctl::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(hassctl::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: hassctl config init, or pass --host and --token"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(hassctl::config))]
    Config(ConfigError),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render output: {0}")]
    #[diagnostic(code(hassctl::render))]
    Render(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::ProfileNotFound { .. } => exit_code::USAGE,
            Self::Api(_) | Self::Config(_) | Self::Io(_) | Self::Render(_) => exit_code::GENERAL,
        }
    }
}

// ── hassctl_api::Error → CliError mapping ────────────────────────────

impl From<hassctl_api::Error> for CliError {
    fn from(err: hassctl_api::Error) -> Self {
        let timed_out = err.is_timeout();
        let sent = err.is_connection();
        match err {
            hassctl_api::Error::Transport { operation, .. } if timed_out => {
                Self::Timeout { operation }
            }
            hassctl_api::Error::Transport { operation, source } if sent => {
                Self::ConnectionFailed { operation, source }
            }
            hassctl_api::Error::Transport { operation, source } => Self::Validation {
                field: "request".into(),
                reason: format!("cannot {operation}: {source}"),
            },
            hassctl_api::Error::Api {
                status: 401 | 403,
                body,
                ..
            } => Self::AuthFailed { body },
            hassctl_api::Error::Api {
                operation,
                status: 404,
                body,
            } => {
                let hint = not_found_hint(&operation);
                Self::NotFound {
                    operation,
                    body,
                    hint,
                }
            }
            other => Self::Api(other),
        }
    }
}

fn not_found_hint(operation: &str) -> String {
    if operation.starts_with("get state") || operation.starts_with("set state") {
        "Run: hassctl states list to see available entities".into()
    } else if operation.starts_with("call service") {
        "Run: hassctl services list to see available services".into()
    } else {
        "Check the identifier and try again".into()
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => Self::NoCredentials { profile },
            ConfigError::ProfileNotFound { name, available } => {
                Self::ProfileNotFound { name, available }
            }
            ConfigError::Missing { name, env } => Self::Validation {
                field: name.into(),
                reason: format!("not set (use a profile, a flag, or {env})"),
            },
            ConfigError::InvalidPort { value } => Self::Validation {
                field: "port".into(),
                reason: format!("{value:?} is not a number between 1 and 65535"),
            },
            ConfigError::Client(err) => err.into(),
            other => Self::Config(other),
        }
    }
}
