//! Voices command handler.

use crate::bootstrap::CliContext;

/// List every catalog voice with its current slider value.
pub fn execute(ctx: &CliContext) {
    let weights = ctx.controller.weights();
    for (index, (voice, units)) in weights.iter().enumerate() {
        let marker = if units > 0 { "*" } else { " " };
        println!("{marker} {index:>2}  {voice:<12} {units:>3}");
    }
    println!();
    println!(
        "{} voices, {} active",
        ctx.catalog.len(),
        weights.active_voices().len()
    );
}
