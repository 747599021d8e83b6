//! Proportional slider normalization.
//!
//! Keeps a [`WeightSet`] summing to exactly 1.0 (100 slider units) while one
//! slider at a time is edited. Two passes exist:
//!
//! - **Rescale** (no pivot): every weight is scaled by `1 / total`.
//! - **Pivot** (one slider moved to a target `T`): the pivot takes exactly
//!   `T`, and `1 - T` is shared among the other active voices strictly in
//!   proportion to their current weights.
//!
//! Values are computed in `f64`, quantized to integer slider units (round
//! half to even), and the signed rounding residual is then absorbed by the
//! *last* eligible voice in catalog order, so the result sums to exactly 100
//! units. If absorbing the whole residual would push that voice outside
//! `0..=100`, the remainder spills to the previous eligible voice.
//!
//! `normalize` is total: degenerate inputs (all zero, single active voice,
//! pivot at an extreme) are handled by policy branches and never error.

use crate::catalog::VoiceId;
use crate::weights::{MAX_UNITS, UNITS_PER_RATIO, WeightSet, ratio_to_units};

/// A slider that was just moved, and the ratio it was moved to.
#[derive(Debug, Clone, PartialEq)]
pub struct Pivot {
    pub voice: VoiceId,
    /// Requested ratio; values above 1.0 take the over-budget branch.
    pub target: f64,
}

impl Pivot {
    pub fn new(voice: impl Into<VoiceId>, target: f64) -> Self {
        Self {
            voice: voice.into(),
            target,
        }
    }

    /// Pivot from an integer slider value.
    pub fn from_units(voice: impl Into<VoiceId>, units: u8) -> Self {
        Self::new(voice, f64::from(units) / UNITS_PER_RATIO)
    }
}

/// Produce a normalized copy of `weights`.
///
/// With `pivot == None` every weight is rescaled; with a pivot the remaining
/// budget is redistributed proportionally. A pivot naming a voice outside the
/// catalog is treated as a rescale.
pub fn normalize(weights: &WeightSet, pivot: Option<&Pivot>) -> WeightSet {
    let pivot_index = pivot.and_then(|p| {
        let index = weights.catalog().index_of(p.voice.as_str());
        if index.is_none() {
            tracing::warn!(voice = %p.voice, "Pivot voice not in catalog, rescaling instead");
        }
        index.map(|i| (i, p.target))
    });

    match pivot_index {
        Some((index, target)) => redistribute(weights, index, target),
        None => rescale(weights),
    }
}

/// Case A: scale every weight by `1 / total`.
fn rescale(weights: &WeightSet) -> WeightSet {
    let units = weights.units();
    let total = weights.total_units();
    if total == 0 {
        return weights.clone();
    }

    let scale = UNITS_PER_RATIO / f64::from(total);
    let mut result: Vec<u8> = units
        .iter()
        .map(|&u| ratio_to_units(f64::from(u) * scale / UNITS_PER_RATIO))
        .collect();

    // Residual goes to the last voice with a positive pre-scale weight.
    let eligible: Vec<usize> = (0..units.len()).filter(|&i| units[i] > 0).collect();
    absorb_residual(&mut result, &eligible);

    tracing::debug!(
        total_before = total,
        total_after = sum_units(&result),
        "Rescaled weights"
    );
    WeightSet::from_units(weights.catalog().clone(), result)
}

/// Case B: give the pivot exactly `target`, share the rest proportionally.
fn redistribute(weights: &WeightSet, pivot: usize, target: f64) -> WeightSet {
    let units = weights.units();
    let target = if target.is_finite() { target.max(0.0) } else { 0.0 };
    let mut result = vec![0u8; units.len()];

    let active: Vec<usize> = (0..units.len())
        .filter(|&i| i != pivot && units[i] > 0)
        .collect();
    let remaining: u32 = active.iter().map(|&i| u32::from(units[i])).sum();

    if remaining == 0 {
        // Nothing to redistribute: the pivot keeps its (capped) target alone.
        result[pivot] = ratio_to_units(target.min(1.0));
        return WeightSet::from_units(weights.catalog().clone(), result);
    }

    let budget = 1.0 - target;
    if budget < 0.0 {
        result[pivot] = MAX_UNITS;
        tracing::debug!(target, "Pivot over budget, clamped to 1.0");
        return WeightSet::from_units(weights.catalog().clone(), result);
    }

    result[pivot] = ratio_to_units(target);
    let remaining = f64::from(remaining);
    for &i in &active {
        let share = budget * f64::from(units[i]) / remaining;
        result[i] = ratio_to_units(share);
    }

    // The pivot is never perturbed by rounding.
    absorb_residual(&mut result, &active);

    tracing::debug!(
        pivot = %weights.catalog().get(pivot).map_or("?", VoiceId::as_str),
        target,
        redistributed = active.len(),
        "Redistributed weights around pivot"
    );
    WeightSet::from_units(weights.catalog().clone(), result)
}

/// Push `100 - sum(units)` into the eligible voices, last one first.
fn absorb_residual(units: &mut [u8], eligible: &[usize]) {
    let mut residual = i32::from(MAX_UNITS) - sum_units(units);
    for &i in eligible.iter().rev() {
        if residual == 0 {
            break;
        }
        let current = i32::from(units[i]);
        let adjusted = (current + residual).clamp(0, i32::from(MAX_UNITS));
        residual -= adjusted - current;
        // Within 0..=100 after the clamp above.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        {
            units[i] = adjusted as u8;
        }
    }
}

fn sum_units(units: &[u8]) -> i32 {
    units.iter().map(|&u| i32::from(u)).sum()
}
