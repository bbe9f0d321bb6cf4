//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Replay Syncer - Race telemetry resampling and ranking pipeline
#[derive(Parser, Debug)]
#[command(
    name = "replay-syncer",
    author,
    version,
    about = "Race telemetry replay synchronization pipeline",
    long_about = "Converts irregular per-lap telemetry traces into a fixed-rate ranked \n\
                  playback stream.\n\n\
                  Loads a recorded session, resamples every competitor onto a shared \n\
                  timeline, ranks them per frame, and caches the computed payload."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "REPLAY_SYNCER_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "REPLAY_SYNCER_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute (or load) the playback payload for a session
    Run(RunArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),

    /// Display session and configuration information
    Info(InfoArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(
        short,
        long,
        default_value = "config.toml",
        env = "REPLAY_SYNCER_CONFIG"
    )]
    pub config: PathBuf,

    /// Override session input file from configuration
    #[arg(long, env = "REPLAY_SYNCER_INPUT")]
    pub input: Option<PathBuf>,

    /// Override output frame rate (Hz) from configuration
    #[arg(long, env = "REPLAY_SYNCER_FRAME_RATE")]
    pub frame_rate: Option<f64>,

    /// Override frame stride from configuration (keep every Nth frame)
    #[arg(long, env = "REPLAY_SYNCER_FRAME_SKIP")]
    pub frame_skip: Option<usize>,

    /// Recompute even if a cached payload exists
    #[arg(long)]
    pub refresh: bool,

    /// Write the resulting payload JSON to this path ("-" for stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Validate configuration and exit without running
    #[arg(long)]
    pub dry_run: bool,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "9000", env = "REPLAY_SYNCER_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Show per-competitor lap details
    #[arg(long)]
    pub laps: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}
