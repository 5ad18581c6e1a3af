//! Configuration for the `hassctl` CLI.
//!
//! TOML profiles, environment bootstrap (`HA_BEARER_TOKEN`, `HA_HOST_NAME`,
//! `HA_PORT`), credential resolution (flag + env + keyring + plaintext),
//! and translation to [`hassctl_api::ClientConfig`].

mod credentials;
mod env;
mod error;
mod profile;

use std::time::Duration;

use hassctl_api::ClientConfig;
use tracing::debug;

pub use credentials::{read_keyring, resolve_token_with, store_token};
pub use env::{EnvSettings, HOST_ENV, PORT_ENV, TOKEN_ENV, parse_port};
pub use error::ConfigError;
pub use profile::{
    Config, Defaults, Profile, config_path, load_config, load_config_from,
    load_config_or_default, save_config, save_config_to,
};

/// Values supplied on the command line that take precedence over both the
/// environment and the selected profile.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub token: Option<String>,
    /// Timeout in seconds.
    pub timeout: Option<u64>,
}

/// Build a [`ClientConfig`] for `profile_name`, reading the process
/// environment and the system keyring.
///
/// Host and port come from the flags, then `HA_HOST_NAME` / `HA_PORT`, then
/// the profile. When the profile is not in the file but a host is available,
/// the settings are bootstrapped from the flags and `HA_*` variables alone
/// (see [`EnvSettings`]), so no config file is needed.
pub fn resolve_profile(
    config: &Config,
    profile_name: &str,
    overrides: &Overrides,
) -> Result<ClientConfig, ConfigError> {
    resolve_profile_with(config, profile_name, overrides, |name| {
        std::env::var(name).ok()
    })
}

/// [`resolve_profile`] with an injectable environment lookup.
pub fn resolve_profile_with(
    config: &Config,
    profile_name: &str,
    overrides: &Overrides,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<ClientConfig, ConfigError> {
    let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    let Some(profile) = config.profiles.get(profile_name) else {
        if overrides.host.is_none() && get(HOST_ENV).is_none() {
            return Err(ConfigError::ProfileNotFound {
                name: profile_name.into(),
                available: config.profile_names(),
            });
        }
        debug!(profile = profile_name, "profile not in config, using environment");
        return from_environment(config, overrides, &get);
    };

    let host = overrides
        .host
        .clone()
        .or_else(|| get(HOST_ENV))
        .unwrap_or_else(|| profile.host.clone())
        .trim()
        .to_owned();
    if host.is_empty() {
        return Err(ConfigError::Missing {
            name: "host name",
            env: HOST_ENV,
        });
    }

    let port = match (overrides.port, get(PORT_ENV)) {
        (Some(port), _) => Some(port),
        (None, Some(raw)) => Some(parse_port(&raw)?),
        (None, None) => profile.port,
    };
    let token = resolve_token_with(
        profile,
        profile_name,
        overrides.token.as_deref(),
        &lookup,
        read_keyring,
    )?;
    let timeout = overrides
        .timeout
        .or(profile.timeout)
        .unwrap_or(config.defaults.timeout);

    let client = ClientConfig::from_host(&host, port, token)?
        .with_timeout(Duration::from_secs(timeout));
    debug!(profile = profile_name, base_url = %client.base_url(), "resolved profile");
    Ok(client)
}

/// Profile-less bootstrap: flags layered over the `HA_*` variables.
fn from_environment(
    config: &Config,
    overrides: &Overrides,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<ClientConfig, ConfigError> {
    let settings = EnvSettings::from_lookup(|name| {
        let flag = match name {
            TOKEN_ENV => overrides.token.clone(),
            HOST_ENV => overrides.host.clone(),
            PORT_ENV => overrides.port.map(|p| p.to_string()),
            _ => None,
        };
        flag.filter(|v| !v.trim().is_empty())
            .or_else(|| lookup(name))
    })?;
    let timeout = overrides.timeout.unwrap_or(config.defaults.timeout);

    let client = settings
        .client_config()?
        .with_timeout(Duration::from_secs(timeout));
    debug!(base_url = %client.base_url(), "resolved from environment");
    Ok(client)
}
