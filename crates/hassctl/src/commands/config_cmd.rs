//! Config subcommand handlers.

use dialoguer::{Input, Password, Select};
use hassctl_api::{ClientConfig, DEFAULT_PORT, HassClient};
use hassctl_config::{self as config, Config, Profile};
use secrecy::SecretString;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::{OutputOpts, util::prompt_err};

const MASK: &str = "****";

// ── Helpers ─────────────────────────────────────────────────────────

/// Replace plaintext tokens so `config show` never prints a secret.
fn redacted(cfg: &Config) -> Config {
    let mut cfg = cfg.clone();
    for profile in cfg.profiles.values_mut() {
        if profile.token.is_some() {
            profile.token = Some(MASK.into());
        }
    }
    cfg
}

/// Format config for display, masking sensitive fields.
fn format_config_redacted(cfg: &Config) -> String {
    use std::fmt::Write;
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);

    for (name, p) in &cfg.profiles {
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = writeln!(out, "host = \"{}\"", p.host);
        if let Some(port) = p.port {
            let _ = writeln!(out, "port = {port}");
        }
        if p.token.is_some() {
            let _ = writeln!(out, "token = \"{MASK}\"");
        }
        if let Some(ref env) = p.token_env {
            let _ = writeln!(out, "token_env = \"{env}\"");
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
    }

    out.trim_end().to_owned()
}

fn prompt_token() -> Result<String, CliError> {
    let token = Password::new()
        .with_prompt("Long-lived access token")
        .interact()
        .map_err(prompt_err)?;
    if token.trim().is_empty() {
        return Err(CliError::Validation {
            field: "token".into(),
            reason: "token cannot be empty".into(),
        });
    }
    Ok(token)
}

/// Where the token ends up after `config init`.
enum TokenStorage {
    Keyring,
    Plaintext,
    EnvVar(String),
}

fn prompt_token_storage() -> Result<TokenStorage, CliError> {
    let choices = &[
        "Store in system keyring (recommended)",
        "Save to config file (plaintext)",
        "Read from an environment variable at runtime",
    ];
    let selection = Select::new()
        .with_prompt("Where should the token be stored?")
        .items(choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    Ok(match selection {
        0 => TokenStorage::Keyring,
        1 => TokenStorage::Plaintext,
        _ => {
            let name: String = Input::new()
                .with_prompt("Environment variable name")
                .default(config::TOKEN_ENV.into())
                .interact_text()
                .map_err(prompt_err)?;
            TokenStorage::EnvVar(name)
        }
    })
}

/// Connect once with the entered settings and report what answered.
async fn verify(host: &str, port: u16, token: &str) -> Result<(), CliError> {
    let client_config =
        ClientConfig::from_host(host, Some(port), SecretString::from(token.to_owned()))?;
    let client = HassClient::new(&client_config)?;
    let status = client.health().await?;
    eprintln!("   ✓ {} ({})", status.message, client.base_url());
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    args: ConfigArgs,
    global: &GlobalOpts,
    mut cfg: Config,
    out: &OutputOpts,
) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init { no_verify } => {
            let config_path = config::config_path();
            eprintln!("hassctl configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default(crate::active_profile_name(global, &cfg))
                .interact_text()
                .map_err(prompt_err)?;

            let host: String = Input::new()
                .with_prompt("Home Assistant host")
                .default(
                    global
                        .host
                        .clone()
                        .unwrap_or_else(|| "homeassistant.local".into()),
                )
                .interact_text()
                .map_err(prompt_err)?;

            let port: u16 = Input::new()
                .with_prompt("Port")
                .default(global.port.unwrap_or(DEFAULT_PORT))
                .validate_with(|p: &u16| {
                    if *p == 0 {
                        Err("port must be between 1 and 65535")
                    } else {
                        Ok(())
                    }
                })
                .interact_text()
                .map_err(prompt_err)?;

            let token = prompt_token()?;

            if no_verify {
                eprintln!("   Skipping connection check");
            } else {
                eprintln!("   Checking connection...");
                verify(&host, port, &token).await?;
            }

            let mut profile = Profile {
                host,
                port: (port != DEFAULT_PORT).then_some(port),
                ..Profile::default()
            };
            match prompt_token_storage()? {
                TokenStorage::Keyring => {
                    config::store_token(&profile_name, &token)?;
                    eprintln!("   ✓ Token stored in system keyring");
                }
                TokenStorage::Plaintext => profile.token = Some(token),
                TokenStorage::EnvVar(name) => profile.token_env = Some(name),
            }

            cfg.profiles.insert(profile_name.clone(), profile);
            if cfg.profiles.len() == 1 || cfg.default_profile.is_none() {
                cfg.default_profile = Some(profile_name.clone());
            }
            let path = config::save_config(&cfg)?;

            eprintln!("\n✓ Configuration written to {}", path.display());
            eprintln!("  Profile: {profile_name}");
            eprintln!("\n  Test it: hassctl -p {profile_name} health");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let rendered = output::render_single(
                out.format,
                &redacted(&cfg),
                format_config_redacted,
                |c| c.profiles.keys().cloned().collect::<Vec<_>>().join("\n"),
            )?;
            output::print_output(&rendered, out.quiet);
            Ok(())
        }

        // ── SetToken ────────────────────────────────────────────────
        ConfigCommand::SetToken { profile } => {
            let profile_name = profile.unwrap_or_else(|| crate::active_profile_name(global, &cfg));
            cfg.profile(&profile_name)?;

            let token = prompt_token()?;
            config::store_token(&profile_name, &token)?;
            out.status(&format!(
                "✓ Token stored in system keyring for profile '{profile_name}'"
            ));
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), false);
            Ok(())
        }
    }
}
