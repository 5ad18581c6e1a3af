use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading configuration or resolving credentials.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required setting was not provided by any source.
    #[error("{name} is required (set via profile, flag, or {env} env var)")]
    Missing { name: &'static str, env: &'static str },

    /// A port value that is not a number in `1..=65535`.
    #[error("invalid port {value:?}: expected a number between 1 and 65535")]
    InvalidPort { value: String },

    /// No bearer token was found anywhere in the credential chain.
    #[error("no bearer token configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("profile '{name}' not found (available: {available})")]
    ProfileNotFound { name: String, available: String },

    /// The resolved values were rejected by the API client.
    #[error(transparent)]
    Client(#[from] hassctl_api::Error),

    #[error("failed to load configuration: {0}")]
    Load(Box<figment::Error>),

    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Load(Box::new(err))
    }
}
