//! TOML configuration file: profiles, defaults, load and save.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;

// ── TOML config structs ──────────────────────────────────────────────

/// On-disk configuration. The API client never sees this type; it receives
/// a [`hassctl_api::ClientConfig`] built by [`resolve_profile`](crate::resolve_profile).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when `--profile` is not given.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Comma-separated profile names, for diagnostics.
    pub fn profile_names(&self) -> String {
        if self.profiles.is_empty() {
            return "(none)".into();
        }
        self.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
    }

    /// Look up a profile by name.
    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::ProfileNotFound {
                name: name.into(),
                available: self.profile_names(),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_timeout() -> u64 {
    30
}

/// A named Home Assistant instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    /// Host name or IP address.
    pub host: String,

    /// Port, 8123 when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    /// Bearer token in plaintext. Prefer the keyring or `token_env`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Name of an environment variable holding the token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_env: Option<String>,

    /// Timeout override in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

// ── Config file path ─────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("io", "hassctl", "hassctl").map_or_else(
        || {
            let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
            p.push(".config");
            p.push("hassctl");
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

// ── Loading & saving ─────────────────────────────────────────────────

/// Load configuration from the default path and `HASSCTL_*` env vars.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load configuration layered as defaults, then the TOML file at `path`
/// (skipped when missing), then `HASSCTL_` env vars (`__` separates keys,
/// e.g. `HASSCTL_DEFAULTS__TIMEOUT=10`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");
    let config = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("HASSCTL_").split("__"))
        .extract()?;
    Ok(config)
}

/// Load config, falling back to defaults on any error.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_else(|e| {
        debug!(error = %e, "using default config");
        Config::default()
    })
}

/// Write configuration to the default path.
pub fn save_config(config: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(config, &path)?;
    Ok(path)
}

/// Write configuration as TOML, creating parent directories.
pub fn save_config_to(config: &Config, path: &Path) -> Result<(), ConfigError> {
    let text = toml::to_string_pretty(config)?;
    let write_err = |source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }
    std::fs::write(path, text).map_err(write_err)?;
    debug!(path = %path.display(), "saved config");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn sample() -> Config {
        let mut config = Config::default();
        config.profiles.insert(
            "default".into(),
            Profile {
                host: "homeassistant.local".into(),
                port: Some(8124),
                token_env: Some("HOME_TOKEN".into()),
                ..Profile::default()
            },
        );
        config.profiles.insert(
            "lab".into(),
            Profile {
                host: "10.0.0.5".into(),
                token: Some("plain".into()),
                timeout: Some(5),
                ..Profile::default()
            },
        );
        config
    }

    #[test]
    fn save_then_load_preserves_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        save_config_to(&sample(), &path).unwrap();
        let loaded = load_config_from(&path).unwrap();

        assert_eq!(loaded, sample());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_config_from(&dir.path().join("absent.toml")).unwrap();

        assert_eq!(loaded.default_profile.as_deref(), Some("default"));
        assert_eq!(loaded.defaults, Defaults::default());
        assert!(loaded.profiles.is_empty());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[defaults]\noutput = \"json\"\n\n[profiles.home]\nhost = \"ha.lan\"\n",
        )
        .unwrap();

        let loaded = load_config_from(&path).unwrap();

        assert_eq!(loaded.defaults.output, "json");
        assert_eq!(loaded.defaults.timeout, 30);
        assert_eq!(loaded.profiles["home"].host, "ha.lan");
        assert_eq!(loaded.profiles["home"].port, None);
    }

    #[test]
    fn unknown_profile_lists_available() {
        let err = sample().profile("nope").unwrap_err();
        assert_eq!(
            err.to_string(),
            "profile 'nope' not found (available: default, lab)"
        );
    }
}
