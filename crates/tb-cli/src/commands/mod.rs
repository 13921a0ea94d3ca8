//! CLI subcommand implementations.

pub mod categories;
pub mod day;
pub mod init;
pub mod log;
pub mod stats;
mod util;
