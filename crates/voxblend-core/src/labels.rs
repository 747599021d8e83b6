//! Slider label text and grid placement, derived from a [`WeightSet`].

use serde::Serialize;

use crate::catalog::VoiceId;
use crate::settings::grid_position;
use crate::weights::{WeightSet, units_to_ratio};

/// What a UI shows next to one slider.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VoiceLabel {
    pub voice: VoiceId,
    pub units: u8,
    /// `"<voice>: <ratio>"` with two decimals.
    pub text: String,
    pub row: usize,
    pub column: usize,
}

/// Labels for every catalog voice, laid out `columns` per row.
pub fn labels(weights: &WeightSet, columns: u32) -> Vec<VoiceLabel> {
    weights
        .iter()
        .enumerate()
        .map(|(index, (voice, units))| {
            let (row, column) = grid_position(index, columns);
            VoiceLabel {
                voice: voice.clone(),
                units,
                text: format!("{voice}: {:.2}", units_to_ratio(units)),
                row,
                column,
            }
        })
        .collect()
}
