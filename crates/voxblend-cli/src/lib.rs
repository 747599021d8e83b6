//! Command-line front end for voxblend.
//!
//! Each invocation restores the last-used mix, applies one command through
//! the interaction controller and persists the result.

#![deny(unused_crate_dependencies)]

// Binary-only dependencies
use anyhow as _;
use tracing_subscriber as _;

// Used by the integration tests only
#[cfg(test)]
use ndarray as _;
#[cfg(test)]
use tempfile as _;

pub mod bootstrap;
pub mod commands;
pub mod error;
pub mod handlers;
pub mod parser;

// Re-export primary types for convenient access
pub use bootstrap::{CliConfig, CliContext, bootstrap};
pub use commands::{Commands, Toggle};
pub use error::CliError;
pub use parser::Cli;

/// Run one command against a bootstrapped context and persist the mix.
pub fn dispatch(ctx: &mut CliContext, command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Voices => handlers::voices::execute(ctx),
        Commands::Show => handlers::show::execute(ctx),
        Commands::Set { voice, units } => handlers::edit::set(ctx, &voice, units)?,
        Commands::Reset => handlers::edit::reset(ctx),
        Commands::Randomize { count, seed } => handlers::edit::randomize(ctx, count, seed)?,
        Commands::Refresh { seed } => handlers::edit::refresh(ctx, seed)?,
        Commands::Normalize { state } => handlers::edit::normalize(ctx, state),
        Commands::Speed { value } => handlers::edit::speed(ctx, value)?,
        Commands::Columns { value } => handlers::edit::columns(ctx, value)?,
        Commands::Save { path } => handlers::documents::save(ctx, &path)?,
        Commands::Load { path } => handlers::documents::load(ctx, &path)?,
        Commands::Export { voices, out } => handlers::export::execute(ctx, &voices, &out)?,
    }

    ctx.persist()
}
