//! Environment-variable bootstrap.
//!
//! Reads the conventional `HA_BEARER_TOKEN` / `HA_HOST_NAME` / `HA_PORT`
//! variables when no profile applies. The lookup is injectable so callers
//! and tests can resolve settings without mutating the process environment.

use std::fmt;

use hassctl_api::{ClientConfig, DEFAULT_PORT};
use secrecy::SecretString;

use crate::error::ConfigError;

/// Bearer token (required).
pub const TOKEN_ENV: &str = "HA_BEARER_TOKEN";
/// Host name or IP address (required).
pub const HOST_ENV: &str = "HA_HOST_NAME";
/// Port (optional, defaults to 8123).
pub const PORT_ENV: &str = "HA_PORT";

/// Connection settings read from the environment.
#[derive(Clone)]
pub struct EnvSettings {
    pub token: SecretString,
    pub host: String,
    pub port: u16,
}

impl EnvSettings {
    /// Read settings through `lookup`. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let token = get(TOKEN_ENV).ok_or(ConfigError::Missing {
            name: "bearer token",
            env: TOKEN_ENV,
        })?;
        let host = get(HOST_ENV).ok_or(ConfigError::Missing {
            name: "host name",
            env: HOST_ENV,
        })?;
        let port = match get(PORT_ENV) {
            Some(raw) => parse_port(&raw)?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            token: SecretString::from(token),
            host: host.trim().to_owned(),
            port,
        })
    }

    /// Build the API client configuration (`http://{host}:{port}/api`).
    pub fn client_config(&self) -> Result<ClientConfig, ConfigError> {
        Ok(ClientConfig::from_host(
            &self.host,
            Some(self.port),
            self.token.clone(),
        )?)
    }
}

impl fmt::Debug for EnvSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvSettings")
            .field("token", &"[REDACTED]")
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}

/// Parse a port, rejecting `0` and anything outside `u16`.
pub fn parse_port(raw: &str) -> Result<u16, ConfigError> {
    match raw.trim().parse::<u16>() {
        Ok(port) if port > 0 => Ok(port),
        _ => Err(ConfigError::InvalidPort {
            value: raw.to_owned(),
        }),
    }
}
