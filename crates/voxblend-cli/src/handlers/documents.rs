//! Save/load command handlers.

use std::path::Path;

use voxblend_core::config;

use crate::bootstrap::CliContext;
use crate::error::CliError;

/// Write the current mix to `path`.
pub fn save(ctx: &mut CliContext, path: &Path) -> Result<(), CliError> {
    ctx.controller.flush();
    config::save(path, ctx.controller.weights(), ctx.controller.settings())?;
    println!("Configuration saved to {}", path.display());
    Ok(())
}

/// Replace the current mix with the document at `path`.
///
/// Voices unknown to the catalog are skipped; the loaded mix is rescaled
/// when normalization is on.
pub fn load(ctx: &mut CliContext, path: &Path) -> Result<(), CliError> {
    let (weights, settings) = config::load(path, &ctx.catalog)?;
    ctx.controller.replace(weights, settings);
    println!("Configuration loaded from {}", path.display());
    Ok(())
}
