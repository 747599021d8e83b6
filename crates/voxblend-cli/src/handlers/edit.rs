//! Handlers that change the mix or its settings.
//!
//! Each one goes through the [`InteractionController`] so a CLI edit
//! behaves exactly like a slider move in an interactive session: the edit
//! is committed (bypassing the debounce window) and normalized around the
//! edited voice.
//!
//! [`InteractionController`]: voxblend_voice::InteractionController

use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::time::Instant;
use voxblend_voice::SliderEdit;

use crate::bootstrap::CliContext;
use crate::commands::Toggle;
use crate::error::CliError;

/// Move one slider and commit it immediately.
pub fn set(ctx: &mut CliContext, voice: &str, units: i32) -> Result<(), CliError> {
    ctx.controller
        .edit(SliderEdit::user(voice, units), Instant::now())?;
    ctx.controller.flush();
    report(ctx, "Mix updated");
    Ok(())
}

pub fn reset(ctx: &mut CliContext) {
    ctx.controller.reset();
    println!("All voices set to 0");
}

/// Random mix of `count` voices.
pub fn randomize(ctx: &mut CliContext, count: usize, seed: Option<u64>) -> Result<(), CliError> {
    if count == 0 {
        return Err(CliError::Arguments("--count must be at least 1".into()));
    }
    ctx.controller.randomize(count, &mut rng(seed));
    report(ctx, "Randomized mix");
    Ok(())
}

/// Redraw the weights of the active voices.
pub fn refresh(ctx: &mut CliContext, seed: Option<u64>) -> Result<(), CliError> {
    ctx.controller.refresh(&mut rng(seed))?;
    report(ctx, "Refreshed mix");
    Ok(())
}

pub fn normalize(ctx: &mut CliContext, state: Toggle) {
    ctx.controller.set_normalize(state.enabled());
    println!(
        "Normalization {}",
        if state.enabled() { "on" } else { "off" }
    );
}

pub fn speed(ctx: &mut CliContext, value: f32) -> Result<(), CliError> {
    if !value.is_finite() {
        return Err(CliError::Arguments(format!("invalid speed: {value}")));
    }
    ctx.controller.set_speed(value);
    println!("Speed set to {:.2}", ctx.controller.settings().speed);
    Ok(())
}

pub fn columns(ctx: &mut CliContext, value: u32) -> Result<(), CliError> {
    if value == 0 {
        return Err(CliError::Arguments("columns must be at least 1".into()));
    }
    ctx.controller.set_columns(value);
    println!("Sliders per row set to {value}");
    Ok(())
}

fn rng(seed: Option<u64>) -> StdRng {
    seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64)
}

fn report(ctx: &CliContext, headline: &str) {
    println!("{headline}:");
    for label in ctx.controller.labels() {
        if label.units > 0 {
            println!("  {}", label.text);
        }
    }
}
