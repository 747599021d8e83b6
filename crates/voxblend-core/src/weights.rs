//! The authoritative weight model: one slider value per catalog voice.
//!
//! Weights are stored in integer slider units (`0..=100`); the real-valued
//! ratio of a voice is `units / 100`. A [`WeightSet`] never normalizes
//! itself; that is the job of [`crate::normalize`], invoked by the
//! interaction controller.

use std::sync::Arc;

use crate::catalog::{VoiceCatalog, VoiceId};
use crate::error::BlendError;

/// Upper bound of a slider, i.e. a ratio of 1.0.
pub const MAX_UNITS: u8 = 100;

/// Number of slider units per 1.0 ratio.
pub const UNITS_PER_RATIO: f64 = 100.0;

/// Ordered mapping of every catalog voice to its slider value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightSet {
    catalog: Arc<VoiceCatalog>,
    units: Vec<u8>,
}

impl WeightSet {
    /// A weight set with every voice at zero.
    pub fn new(catalog: Arc<VoiceCatalog>) -> Self {
        let units = vec![0; catalog.len()];
        Self { catalog, units }
    }

    pub fn catalog(&self) -> &Arc<VoiceCatalog> {
        &self.catalog
    }

    /// Set a voice's slider value, clamped to `0..=100`.
    pub fn set_weight(&mut self, voice: &str, value: i32) -> Result<(), BlendError> {
        let index = self
            .catalog
            .index_of(voice)
            .ok_or_else(|| BlendError::UnknownVoice(voice.to_string()))?;
        self.units[index] = clamp_units(value);
        Ok(())
    }

    /// Slider value of `voice`, if it is in the catalog.
    pub fn weight(&self, voice: &str) -> Option<u8> {
        self.catalog.index_of(voice).map(|i| self.units[i])
    }

    /// Real-valued ratio (`units / 100`) of `voice`.
    pub fn ratio(&self, voice: &str) -> Option<f64> {
        self.weight(voice).map(units_to_ratio)
    }

    /// Whether the voice contributes to the blend (weight > 0).
    pub fn is_enabled(&self, voice: &str) -> bool {
        self.weight(voice).is_some_and(|w| w > 0)
    }

    /// Voices with a positive weight, in catalog order.
    pub fn active_voices(&self) -> Vec<&VoiceId> {
        self.iter()
            .filter(|(_, units)| *units > 0)
            .map(|(voice, _)| voice)
            .collect()
    }

    /// Sum of all ratios.
    pub fn sum(&self) -> f64 {
        f64::from(self.total_units()) / UNITS_PER_RATIO
    }

    /// Sum of all slider values.
    pub fn total_units(&self) -> u32 {
        self.units.iter().map(|&u| u32::from(u)).sum()
    }

    /// Whether every weight is zero.
    pub fn is_all_zero(&self) -> bool {
        self.units.iter().all(|&u| u == 0)
    }

    /// Set every weight to zero.
    pub fn reset_all(&mut self) {
        self.units.fill(0);
    }

    /// `(voice, units)` pairs in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (&VoiceId, u8)> + '_ {
        self.catalog.iter().zip(self.units.iter().copied())
    }

    pub(crate) fn units(&self) -> &[u8] {
        &self.units
    }

    pub(crate) fn from_units(catalog: Arc<VoiceCatalog>, units: Vec<u8>) -> Self {
        debug_assert_eq!(catalog.len(), units.len());
        Self { catalog, units }
    }

    pub(crate) fn set_units_at(&mut self, index: usize, units: u8) {
        self.units[index] = units.min(MAX_UNITS);
    }
}

/// Clamp an arbitrary integer slider value into `0..=100`.
pub fn clamp_units(value: i32) -> u8 {
    // Lossless: the value is clamped into u8 range first.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let units = value.clamp(0, i32::from(MAX_UNITS)) as u8;
    units
}

/// Quantize a ratio to slider units (round half to even, clamped).
pub fn ratio_to_units(ratio: f64) -> u8 {
    if !ratio.is_finite() {
        return 0;
    }
    let scaled = (ratio * UNITS_PER_RATIO).round_ties_even();
    // Clamped into 0..=100 before the cast.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let units = scaled.clamp(0.0, UNITS_PER_RATIO) as u8;
    units
}

pub fn units_to_ratio(units: u8) -> f64 {
    f64::from(units) / UNITS_PER_RATIO
}
