//! Random voice mixes.
//!
//! With normalization on, weights come from a flat Dirichlet distribution;
//! with it off, each
//! weight is drawn uniformly from `[0.01, 1.0]`. Every chosen slider ends
//! up in `1..=100` so a drawn voice never silently drops out.

use rand::Rng;
use rand::seq::SliceRandom;
use rand_distr::{Dirichlet, Distribution};

use crate::error::BlendError;
use crate::weights::{MAX_UNITS, UNITS_PER_RATIO, WeightSet};

/// Default number of voices picked by [`randomize`].
pub const DEFAULT_RANDOM_COUNT: usize = 10;

const MIN_UNIFORM: f64 = 0.01;
const MAX_UNIFORM: f64 = 1.0;

/// Pick `min(count, catalog size)` distinct voices and give them random
/// weights; every other voice is set to zero.
///
/// The caller is expected to run a rescale pass afterwards when
/// normalization is enabled.
pub fn randomize<R: Rng + ?Sized>(
    weights: &mut WeightSet,
    count: usize,
    normalize: bool,
    rng: &mut R,
) {
    let indices: Vec<usize> = (0..weights.catalog().len()).collect();
    let count = count.min(indices.len());
    let chosen: Vec<usize> = indices.choose_multiple(rng, count).copied().collect();
    let draws = draw(count, normalize, rng);

    weights.reset_all();
    for (&index, value) in chosen.iter().zip(draws) {
        weights.set_units_at(index, to_slider(value));
    }

    tracing::debug!(count, normalize, "Randomized voice mix");
}

/// Redraw the weights of the currently active voices, leaving the selection
/// untouched.
pub fn refresh<R: Rng + ?Sized>(
    weights: &mut WeightSet,
    normalize: bool,
    rng: &mut R,
) -> Result<(), BlendError> {
    let active: Vec<usize> = weights
        .units()
        .iter()
        .enumerate()
        .filter(|(_, units)| **units > 0)
        .map(|(index, _)| index)
        .collect();
    if active.is_empty() {
        return Err(BlendError::NoActiveVoice);
    }

    let draws = draw(active.len(), normalize, rng);
    for (&index, value) in active.iter().zip(draws) {
        weights.set_units_at(index, to_slider(value));
    }

    tracing::debug!(count = active.len(), normalize, "Refreshed voice weights");
    Ok(())
}

fn draw<R: Rng + ?Sized>(count: usize, normalize: bool, rng: &mut R) -> Vec<f64> {
    if !normalize {
        return (0..count)
            .map(|_| rng.gen_range(MIN_UNIFORM..=MAX_UNIFORM))
            .collect();
    }

    // `Dirichlet` needs at least two components.
    match count {
        0 => Vec::new(),
        1 => vec![1.0],
        _ => Dirichlet::new_with_size(1.0, count)
            .map_or_else(|_| even_split(count), |dirichlet| dirichlet.sample(rng)),
    }
}

fn even_split(count: usize) -> Vec<f64> {
    #[allow(clippy::cast_precision_loss)]
    let even = 1.0 / count as f64;
    vec![even; count]
}

fn to_slider(ratio: f64) -> u8 {
    let scaled = (ratio * UNITS_PER_RATIO).round_ties_even();
    // Clamped into 1..=100 before the cast.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let units = scaled.clamp(1.0, f64::from(MAX_UNITS)) as u8;
    units
}
