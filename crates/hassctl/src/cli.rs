//! Clap derive structures for the `hassctl` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// hassctl -- query and control Home Assistant over its REST API
#[derive(Debug, Parser)]
#[command(
    name = "hassctl",
    version,
    about = "Query and control Home Assistant from the command line",
    long_about = "A CLI for the Home Assistant REST API.\n\n\
        Reads and writes entity states, calls services and fires events.\n\
        Connection settings come from a named profile, from flags, or from\n\
        HA_HOST_NAME / HA_PORT / HA_BEARER_TOKEN.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Configuration profile to use
    #[arg(long, short = 'p', env = "HASSCTL_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Home Assistant host name or IP (overrides HA_HOST_NAME and the profile)
    #[arg(long, short = 'H', global = true)]
    pub host: Option<String>,

    /// Home Assistant port (overrides HA_PORT and the profile, default 8123)
    #[arg(long, global = true, value_parser = clap::value_parser!(u16).range(1..))]
    pub port: Option<u16>,

    /// Long-lived access token (overrides HA_BEARER_TOKEN)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Output format (defaults to the config file's `defaults.output`)
    #[arg(long, short = 'o', env = "HASSCTL_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Request timeout in seconds
    #[arg(long, env = "HASSCTL_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check that the API is reachable and the token is accepted
    #[command(alias = "ping")]
    Health,

    /// Show the server configuration (location, units, version, components)
    #[command(alias = "info")]
    ConfigInfo,

    /// Read and write entity states
    #[command(alias = "st")]
    States(StatesArgs),

    /// List and call services
    #[command(alias = "svc")]
    Services(ServicesArgs),

    /// List and fire events
    Events(EventsArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  STATES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct StatesArgs {
    #[command(subcommand)]
    pub command: StatesCommand,
}

#[derive(Debug, Subcommand)]
pub enum StatesCommand {
    /// List every entity state
    #[command(alias = "ls")]
    List {
        /// Only show entities in this domain (e.g. `light`)
        #[arg(long, short = 'd')]
        domain: Option<String>,
    },

    /// Show one entity's state and attributes
    Get {
        /// Entity ID (e.g. `light.kitchen`)
        entity_id: String,
    },

    /// Create or replace an entity's state representation
    ///
    /// This only changes what Home Assistant reports; it does not talk to
    /// the device. Use `services call` to actuate.
    Set {
        /// Entity ID
        entity_id: String,

        /// New state value
        state: String,

        /// Attributes as a JSON object
        #[arg(long, short = 'a')]
        attributes: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SERVICES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ServicesArgs {
    #[command(subcommand)]
    pub command: ServicesCommand,
}

#[derive(Debug, Subcommand)]
pub enum ServicesCommand {
    /// List services grouped by domain
    #[command(alias = "ls")]
    List {
        /// Only show services in this domain
        #[arg(long, short = 'd')]
        domain: Option<String>,
    },

    /// Call a service and print the states it changed
    Call {
        /// Service domain (e.g. `light`)
        domain: String,

        /// Service name (e.g. `turn_on`)
        service: String,

        /// Service data as a JSON object (e.g. '{"entity_id": "light.kitchen"}')
        #[arg(long)]
        data: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  EVENTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct EventsArgs {
    #[command(subcommand)]
    pub command: EventsCommand,
}

#[derive(Debug, Subcommand)]
pub enum EventsCommand {
    /// List event types and their listener counts
    #[command(alias = "ls")]
    List,

    /// Fire an event on the event bus
    Fire {
        /// Event type
        event_type: String,

        /// Event data as a JSON object
        #[arg(long)]
        data: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create or update a profile with guided setup
    Init {
        /// Save without checking the connection first
        #[arg(long)]
        no_verify: bool,
    },

    /// Display the configuration with secrets masked
    Show,

    /// Store a profile's token in the system keyring
    SetToken {
        /// Profile name (defaults to the active profile)
        #[arg(long = "for")]
        profile: Option<String>,
    },

    /// Print the configuration file path
    Path,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
