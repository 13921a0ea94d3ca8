use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tb_cli::commands::{categories, day, init, log, stats};
use tb_cli::{Cli, Commands, Config};

/// Load config, letting `--snapshot` override the configured path.
fn load_config(config_path: Option<&Path>, snapshot: Option<&Path>) -> Result<Config> {
    let mut config = Config::load_from(config_path).context("failed to load configuration")?;
    if let Some(path) = snapshot {
        config.snapshot_path = path.to_path_buf();
    }
    tracing::debug!(?config, "loaded configuration");
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let Some(command) = &cli.command else {
        // No subcommand, show help
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let config = load_config(cli.config.as_deref(), cli.snapshot.as_deref())?;
    let mut stdout = std::io::stdout().lock();

    match command {
        Commands::Init(args) => init::run(&mut stdout, args, &config)?,
        Commands::Day(args) => day::run(&mut stdout, args, &config)?,
        Commands::Stats(args) => stats::run(&mut stdout, args, &config)?,
        Commands::Log(args) => log::run(&mut stdout, args, &config)?,
        Commands::Categories(args) => categories::run(&mut stdout, args, &config)?,
    }

    stdout.flush()?;
    Ok(())
}
