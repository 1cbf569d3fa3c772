//! Clap derive structures for the `simcii` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// simcii: live dashboard for SIMCII sensor devices and zone statistics
#[derive(Debug, Parser)]
#[command(
    name = "simcii",
    version,
    about = "Monitor SIMCII devices and zone statistics from the command line",
    long_about = "Talks to the SIMCII inventory service (device CRUD) and the\n\
        statistics service (per-zone temperature and humidity averages).\n\n\
        `simcii watch` keeps both in sync on a timer; the other commands\n\
        are one-shot.",
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
    /// Config file to use instead of the platform default
    #[arg(long, env = "SIMCII_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Inventory service base URL (overrides config)
    #[arg(long, short = 'i', global = true)]
    pub inventory_url: Option<String>,

    /// Statistics service base URL (overrides config)
    #[arg(long, short = 's', global = true)]
    pub statistics_url: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "SIMCII_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Request timeout in seconds (default: none)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
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

#[derive(Debug, Clone, ValueEnum)]
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
    /// Keep devices and statistics in sync and print updates
    #[command(alias = "w")]
    Watch(WatchArgs),

    /// Manage inventory devices
    #[command(alias = "dev", alias = "d")]
    Devices(DevicesArgs),

    /// Show per-zone statistics and dashboard averages
    Stats,

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Watch ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Refresh period in milliseconds (overrides config)
    #[arg(long)]
    pub refresh_ms: Option<u64>,

    /// Also print the clock tick
    #[arg(long)]
    pub clock: bool,
}

// ── Devices ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DevicesArgs {
    #[command(subcommand)]
    pub command: DevicesCommand,
}

#[derive(Debug, Subcommand)]
pub enum DevicesCommand {
    /// List all devices
    #[command(alias = "ls")]
    List,

    /// Register a new device
    Create {
        /// Device name
        nombre: String,

        /// Device type (e.g. temperatura, humedad)
        #[arg(long, short = 't')]
        tipo: String,

        /// Zone the device is installed in
        #[arg(long, short = 'z')]
        zona: String,

        /// Free-text description (soft limit, longer text is kept)
        #[arg(long, short = 'd')]
        descripcion: Option<String>,
    },

    /// Update an existing device; unspecified fields keep their value
    Update {
        /// Device ID
        id: String,

        #[arg(long)]
        nombre: Option<String>,

        #[arg(long, short = 't')]
        tipo: Option<String>,

        #[arg(long, short = 'z')]
        zona: Option<String>,

        #[arg(long, short = 'd')]
        descripcion: Option<String>,
    },

    /// Delete a device (asks for confirmation)
    #[command(alias = "rm")]
    Delete {
        /// Device ID
        id: String,
    },
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create the config file (prompts for service URLs unless --yes)
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Display the resolved configuration
    Show,

    /// Print the config file path
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
