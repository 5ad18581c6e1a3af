//! Bearer token resolution and keyring storage.

use secrecy::SecretString;
use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::profile::Profile;
use crate::TOKEN_ENV;

const KEYRING_SERVICE: &str = "hassctl";

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, ConfigError> {
    Ok(keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/token"))?)
}

/// Resolve the bearer token for a profile.
///
/// Order: explicit override, the profile's `token_env` variable,
/// `HA_BEARER_TOKEN`, the keyring, plaintext `token` in the profile.
/// `lookup` reads environment variables and `keyring_get` reads the keyring
/// entry for a profile name ([`read_keyring`] in production).
pub fn resolve_token_with(
    profile: &Profile,
    profile_name: &str,
    token_override: Option<&str>,
    lookup: impl Fn(&str) -> Option<String>,
    keyring_get: impl Fn(&str) -> Option<String>,
) -> Result<SecretString, ConfigError> {
    let non_empty = |s: String| (!s.trim().is_empty()).then_some(s);

    // 1. Explicit override (CLI flag)
    if let Some(token) = token_override.map(str::to_owned).and_then(non_empty) {
        trace!("token from override");
        return Ok(SecretString::from(token));
    }

    // 2. Profile's token_env -> env var lookup
    if let Some(token) = profile
        .token_env
        .as_deref()
        .and_then(&lookup)
        .and_then(non_empty)
    {
        trace!("token from profile token_env");
        return Ok(SecretString::from(token));
    }

    // 3. Conventional env var
    if let Some(token) = lookup(TOKEN_ENV).and_then(non_empty) {
        trace!("token from {TOKEN_ENV}");
        return Ok(SecretString::from(token));
    }

    // 4. System keyring
    if let Some(token) = keyring_get(profile_name).and_then(non_empty) {
        trace!("token from keyring");
        return Ok(SecretString::from(token));
    }

    // 5. Plaintext in config
    if let Some(token) = profile.token.clone().and_then(non_empty) {
        trace!("token from plaintext profile");
        return Ok(SecretString::from(token));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Read a profile's token from the system keyring. A missing entry or an
/// unavailable keyring both yield `None`.
pub fn read_keyring(profile_name: &str) -> Option<String> {
    match keyring_entry(profile_name)
        .and_then(|entry| entry.get_password().map_err(ConfigError::from))
    {
        Ok(token) => Some(token),
        Err(e) => {
            debug!(profile = profile_name, error = %e, "no keyring token");
            None
        }
    }
}

/// Store a profile's token in the system keyring.
pub fn store_token(profile_name: &str, token: &str) -> Result<(), ConfigError> {
    keyring_entry(profile_name)?.set_password(token)?;
    debug!(profile = profile_name, "stored token in keyring");
    Ok(())
}
