mod cli;
mod commands;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use hassctl_api::HassClient;
use hassctl_config::{Config, Overrides};

use crate::cli::{Cli, Command, GlobalOpts};
use crate::commands::OutputOpts;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Shell completions need neither config nor a connection
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "hassctl", &mut std::io::stdout());
            Ok(())
        }

        // Config commands manage the file themselves
        Command::Config(args) => {
            let config = hassctl_config::load_config_or_default();
            let out = OutputOpts::new(&cli.global, &config);
            commands::config_cmd::handle(args, &cli.global, config, &out).await
        }

        // Everything else talks to Home Assistant
        cmd => {
            let config = hassctl_config::load_config()?;
            let out = OutputOpts::new(&cli.global, &config);
            let client = build_client(&cli.global, &config)?;

            tracing::debug!(command = ?cmd, base_url = %client.base_url(), "dispatching command");
            commands::dispatch(cmd, &client, &out).await
        }
    }
}

/// Resolve the active profile name: `--profile`, then `default_profile`.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build a client from the config file, the active profile and CLI overrides.
fn build_client(global: &GlobalOpts, config: &Config) -> Result<HassClient, CliError> {
    let profile_name = active_profile_name(global, config);
    let overrides = Overrides {
        host: global.host.clone(),
        port: global.port,
        token: global.token.clone(),
        timeout: global.timeout,
    };

    let client_config = hassctl_config::resolve_profile(config, &profile_name, &overrides)?;
    Ok(HassClient::new(&client_config)?)
}
