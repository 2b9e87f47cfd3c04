//! Command-line interface definitions.
//!
//! Defines the CLI structure for the repopulse application using `clap`.
//! Subcommands cover the daily forecast run, scoring a matured batch,
//! delivering the digest, inspecting artifacts, and managing configuration.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use super::paths;

/// Daily 7-day breakout forecasts for young GitHub repositories, scored against reality
#[derive(Parser, Debug)]
#[command(name = "repopulse")]
#[command(version)]
pub struct Cli {
    /// Color output mode [auto, always, never]
    #[arg(
        long,
        global = true,
        default_value = "auto",
        hide_possible_values = true
    )]
    pub color: ColorChoice,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Color output mode for terminal rendering.
#[derive(Clone, Debug, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Detect automatically
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Discover candidates, forecast them, and record today's batch
    Predict(PredictArgs),

    /// Score a batch whose horizon has elapsed and append to the ledger
    Score(ScoreArgs),

    /// Deliver a recorded digest post to the configured sinks
    Notify(NotifyArgs),

    /// Show a recorded prediction batch
    Show(ShowArgs),

    /// Calibration report over the whole outcome ledger
    Report(ReportArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Commands {
    /// Whether the command asked for JSON-formatted logs.
    #[must_use]
    pub fn json_logs(&self) -> bool {
        match self {
            Self::Predict(args) => args.json_logs,
            Self::Score(args) => args.json_logs,
            _ => false,
        }
    }
}

/// Subcommands for `repopulse config`.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Generate a new configuration file from template.
    Init(ConfigInitArgs),
    /// Display the effective configuration with defaults applied.
    Show(ConfigPathArg),
    /// Validate a configuration file for correctness.
    Validate(ConfigPathArg),
}

/// Shared argument struct for commands that require only a configuration path.
#[derive(Parser, Debug)]
pub struct ConfigPathArg {
    /// Path to the configuration file.
    #[arg(short, long, default_value_os_t = paths::default_config())]
    pub config: PathBuf,
}

/// Arguments for the `config init` subcommand.
#[derive(Parser, Debug)]
pub struct ConfigInitArgs {
    /// Output path for the generated configuration file.
    #[arg(default_value_os_t = paths::default_config())]
    pub path: PathBuf,
    /// Overwrite the file if it already exists.
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the `predict` subcommand.
#[derive(Parser, Debug)]
pub struct PredictArgs {
    /// Path to the configuration file.
    #[arg(short, long, default_value_os_t = paths::default_config())]
    pub config: PathBuf,

    /// Compute and print the batch without writing any artifact.
    #[arg(long)]
    pub dry_run: bool,

    /// Use JSON log format instead of pretty-printed logs.
    #[arg(long)]
    pub json_logs: bool,
}

/// Arguments for the `score` subcommand.
#[derive(Parser, Debug)]
pub struct ScoreArgs {
    /// Path to the configuration file.
    #[arg(short, long, default_value_os_t = paths::default_config())]
    pub config: PathBuf,

    /// Prediction date to score (YYYY-MM-DD, default: one horizon ago).
    #[arg(long)]
    pub prediction_date: Option<NaiveDate>,

    /// Use JSON log format instead of pretty-printed logs.
    #[arg(long)]
    pub json_logs: bool,
}

/// Arguments for the `notify` subcommand.
#[derive(Parser, Debug)]
pub struct NotifyArgs {
    /// Path to the configuration file.
    #[arg(short, long, default_value_os_t = paths::default_config())]
    pub config: PathBuf,

    /// Date of the post to deliver (YYYY-MM-DD, default: today UTC).
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

/// Arguments for the `show` subcommand.
#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Path to the configuration file.
    #[arg(short, long, default_value_os_t = paths::default_config())]
    pub config: PathBuf,

    /// Batch date (YYYY-MM-DD, default: today UTC).
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Show only the N most probable breakouts.
    #[arg(long)]
    pub limit: Option<usize>,
}

/// Arguments for the `report` subcommand.
#[derive(Parser, Debug)]
pub struct ReportArgs {
    /// Path to the configuration file.
    #[arg(short, long, default_value_os_t = paths::default_config())]
    pub config: PathBuf,

    /// Only include ledger rows recorded under this model tag.
    #[arg(long)]
    pub model: Option<String>,
}
