//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::categories::CategoriesArgs;
use crate::commands::day::DayArgs;
use crate::commands::init::InitArgs;
use crate::commands::log::LogArgs;
use crate::commands::stats::StatsArgs;

/// Time block tracker.
///
/// Splits each day into fixed blocks, carries the last activity forward
/// through unlogged time, and totals time per category.
#[derive(Debug, Parser)]
#[command(name = "tb", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the snapshot file (overrides config).
    #[arg(short, long, global = true)]
    pub snapshot: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create the snapshot file with a default profile.
    Init(InitArgs),

    /// Show one day's blocks.
    Day(DayArgs),

    /// Show time per category over a period.
    Stats(StatsArgs),

    /// Log categories for the block at a given time.
    Log(LogArgs),

    /// List the profile's categories.
    Categories(CategoriesArgs),
}
