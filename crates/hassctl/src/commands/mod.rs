//! Command dispatch: bridges CLI args -> client calls -> output formatting.

pub mod config_cmd;
pub mod events;
pub mod services;
pub mod states;
pub mod system;
pub mod util;

use clap::ValueEnum;
use hassctl_api::HassClient;
use hassctl_config::Config;

use crate::cli::{Command, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output::Painter;

/// Presentation settings resolved from flags and the config file's defaults.
#[derive(Debug, Clone, Copy)]
pub struct OutputOpts {
    pub format: OutputFormat,
    pub painter: Painter,
    pub quiet: bool,
}

impl OutputOpts {
    pub fn new(global: &GlobalOpts, config: &Config) -> Self {
        let format = global.output.unwrap_or_else(|| {
            OutputFormat::from_str(&config.defaults.output, true).unwrap_or_else(|_| {
                tracing::warn!(
                    value = %config.defaults.output,
                    "unknown defaults.output in config, using table"
                );
                OutputFormat::Table
            })
        });
        Self {
            format,
            painter: Painter::new(global.color),
            quiet: global.quiet,
        }
    }

    /// Print a status line to stderr unless `--quiet`.
    pub fn status(&self, message: &str) {
        if !self.quiet {
            eprintln!("{}", self.painter.success(message));
        }
    }
}

/// Dispatch a connection-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, client: &HassClient, out: &OutputOpts) -> Result<(), CliError> {
    match cmd {
        Command::Health => system::health(client, out).await,
        Command::ConfigInfo => system::config_info(client, out).await,
        Command::States(args) => states::handle(client, args, out).await,
        Command::Services(args) => services::handle(client, args, out).await,
        Command::Events(args) => events::handle(client, args, out).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
