use std::path::PathBuf;

use clap::Parser;

pub mod global;

pub use global::OutputFormat;

/// Top-level CLI parser for the `botany-reconcile` binary.
#[derive(Debug, Parser)]
#[command(
    name = "botany-reconcile",
    version,
    about = "Reconcile and audit botany plant state across plant file, JSON mirror, and garden table"
)]
pub struct Cli {
    /// Report what would change without writing to any store
    #[arg(long)]
    pub dry_run: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Only process this user (need not have a plant file yet)
    #[arg(short, long)]
    pub user: Option<String>,

    /// Hours since last watering before the fallback path marks a plant dead
    #[arg(long)]
    pub dead_after_hours: Option<u32>,

    /// Root holding one directory per user
    #[arg(long)]
    pub home_prefix: Option<PathBuf>,

    /// Shared garden SQLite database
    #[arg(long)]
    pub db_path: Option<PathBuf>,

    /// Back up and recreate plants whose file is missing or unreadable
    #[arg(long)]
    pub reinit_corrupt: bool,

    /// After reconciling, compare the page view against the live plant
    #[arg(long)]
    pub audit: bool,

    /// Hours since last watering before the page shows a plant as thirsty
    #[arg(long)]
    pub water_interval_hours: Option<u32>,

    /// Output format: table, json, raw
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}
