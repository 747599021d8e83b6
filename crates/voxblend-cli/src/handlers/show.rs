//! Show command handler.
//!
//! Prints the settings followed by the slider labels of the active voices,
//! laid out in the configured number of columns.

use voxblend_core::VoiceLabel;

use crate::bootstrap::CliContext;

const CELL_WIDTH: usize = 20;

pub fn execute(ctx: &CliContext) {
    let settings = ctx.controller.settings();
    println!(
        "normalize = {}",
        if settings.normalize { "on" } else { "off" }
    );
    println!("speed     = {:.2}", settings.speed);
    println!("columns   = {}", settings.columns);
    println!();

    let weights = ctx.controller.weights();
    if weights.is_all_zero() {
        println!("No voices in the mix. Try `voxblend set <voice> <units>` or `voxblend randomize`.");
        return;
    }

    for line in grid(&ctx.controller.labels(), settings.columns) {
        println!("{line}");
    }
    println!();
    println!("total = {:.2}", weights.sum());
}

/// Lay out the labels of active voices `columns` per line.
fn grid(labels: &[VoiceLabel], columns: u32) -> Vec<String> {
    let active: Vec<&VoiceLabel> = labels.iter().filter(|label| label.units > 0).collect();
    active
        .chunks(columns.max(1) as usize)
        .map(|row| {
            row.iter()
                .map(|label| format!("{:<CELL_WIDTH$}", label.text))
                .collect::<String>()
                .trim_end()
                .to_string()
        })
        .collect()
}
