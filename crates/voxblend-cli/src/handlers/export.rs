//! Export command handler.
//!
//! Compiles the mix against a Kokoro voice pack and writes the blended
//! embedding as a NumPy `.npy` file that Kokoro front ends accept as a
//! custom voice.

use std::path::Path;

use voxblend_core::compile;
use voxblend_voice::{load_npz, missing_voices};

use crate::bootstrap::CliContext;
use crate::error::CliError;

pub fn execute(ctx: &mut CliContext, voices: &Path, out: &Path) -> Result<(), CliError> {
    ctx.controller.flush();
    let registry = load_npz(voices)?;

    let missing = missing_voices(&ctx.catalog, &registry);
    if !missing.is_empty() {
        tracing::warn!(
            count = missing.len(),
            "Voice pack lacks some catalog voices; they cannot be blended"
        );
    }

    let blend = compile(
        ctx.controller.weights(),
        &registry,
        ctx.controller.settings().normalize,
    )?;

    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    ndarray_npy::write_npy(out, &blend)
        .map_err(|e| CliError::Voice(format!("Failed to write {}: {e}", out.display())))?;

    tracing::info!(path = %out.display(), shape = ?blend.shape(), "Blend exported");
    println!("Blend written to {}", out.display());
    Ok(())
}
