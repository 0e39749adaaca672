//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Notifier - publish/subscribe notifications with offline delivery
#[derive(Parser, Debug)]
#[command(
    name = "notifier",
    author,
    version,
    about = "Notification dispatcher with offline queues",
    long_about = "Broadcasts event notifications to registered admins.\n\n\
                  Online admins see notifications immediately; offline admins get \n\
                  them queued and delivered from storage when they come back online."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "NOTIFIER_VERBOSE")]
    pub verbose: u8,

    /// Suppress all log output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "compact",
        global = true,
        env = "NOTIFIER_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start an interactive notification session
    Run(RunArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),

    /// Display configuration information
    Info(InfoArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(
        short,
        long,
        default_value = "notifier.toml",
        env = "NOTIFIER_CONFIG",
        conflicts_with = "demo"
    )]
    pub config: PathBuf,

    /// Use the built-in demo wiring instead of a configuration file
    #[arg(long)]
    pub demo: bool,

    /// Execute these session commands and exit instead of reading stdin
    #[arg(short = 'e', long = "exec", value_name = "COMMAND")]
    pub exec: Vec<String>,

    /// Omit timestamps from rendered notifications
    #[arg(long)]
    pub no_timestamps: bool,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "NOTIFIER_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "notifier.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "notifier.toml")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    Pretty,
    /// Compact single-line format
    #[default]
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}
