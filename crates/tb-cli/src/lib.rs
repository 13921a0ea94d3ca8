//! Time block tracker CLI library.
//!
//! This crate provides the CLI interface for the time block tracker.

mod cli;
pub mod commands;
mod config;
mod snapshot;

pub use cli::{Cli, Commands};
pub use config::Config;
pub use snapshot::Snapshot;
