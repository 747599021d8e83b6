//! CLI entry point - the composition root.
//!
//! Parses arguments, installs logging, bootstraps the context and hands the
//! command to [`voxblend_cli::dispatch`].

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use voxblend_cli::{Cli, CliConfig, bootstrap, dispatch};

fn init_logging(verbose: bool) -> anyhow::Result<()> {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let Some(command) = cli.command else {
        // No command provided - show help
        Cli::command().print_help()?;
        return Ok(());
    };

    let config = CliConfig {
        config_dir: cli.config_dir,
    };
    let result = bootstrap(config).and_then(|mut ctx| dispatch(&mut ctx, command));

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(e.exit_code());
    }
    Ok(())
}
