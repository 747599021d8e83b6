//! Blend compilation: weighted sum of voice embeddings.

use std::collections::HashMap;

use ndarray::ArrayD;

use crate::catalog::VoiceId;
use crate::error::BlendError;
use crate::weights::WeightSet;

/// A voice style embedding. Dimensionality is whatever the voice pack uses
/// (Kokoro packs are `[510, 1, 256]`); all embeddings in a blend must agree.
pub type Embedding = ArrayD<f32>;

/// Named voice embeddings available for blending.
#[derive(Debug, Clone, Default)]
pub struct VoiceRegistry {
    embeddings: HashMap<VoiceId, Embedding>,
}

impl VoiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, voice: impl Into<VoiceId>, embedding: Embedding) {
        self.embeddings.insert(voice.into(), embedding);
    }

    pub fn get(&self, voice: &str) -> Option<&Embedding> {
        self.embeddings.get(voice)
    }

    pub fn contains(&self, voice: &str) -> bool {
        self.embeddings.contains_key(voice)
    }

    pub fn len(&self) -> usize {
        self.embeddings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.embeddings.is_empty()
    }

    /// Voice names, sorted.
    pub fn voices(&self) -> Vec<&VoiceId> {
        let mut voices: Vec<&VoiceId> = self.embeddings.keys().collect();
        voices.sort();
        voices
    }
}

impl FromIterator<(VoiceId, Embedding)> for VoiceRegistry {
    fn from_iter<T: IntoIterator<Item = (VoiceId, Embedding)>>(iter: T) -> Self {
        Self {
            embeddings: iter.into_iter().collect(),
        }
    }
}

/// Per-voice ratios actually fed into the blend.
///
/// With `normalized == true` the stored ratios are used as-is; otherwise
/// they are divided by their total so synthesis always sees weights that
/// sum to 1.
pub fn effective_ratios(
    weights: &WeightSet,
    normalized: bool,
) -> Result<Vec<(VoiceId, f64)>, BlendError> {
    let active: Vec<(VoiceId, f64)> = weights
        .iter()
        .filter(|(_, units)| *units > 0)
        .map(|(voice, units)| (voice.clone(), f64::from(units) / 100.0))
        .collect();
    if active.is_empty() {
        return Err(BlendError::NoActiveVoice);
    }

    let mut total: f64 = active.iter().map(|(_, r)| r).sum();
    if total <= 0.0 {
        total = 1.0;
    }

    Ok(active
        .into_iter()
        .map(|(voice, ratio)| {
            let effective = if normalized { ratio } else { ratio / total };
            (voice, effective)
        })
        .collect())
}

/// Combine the active voices of `weights` into one embedding.
///
/// Pure function of its inputs. Fails with [`BlendError::NoActiveVoice`] when
/// every weight is zero and [`BlendError::UnknownVoice`] when an active voice
/// has no embedding.
pub fn compile(
    weights: &WeightSet,
    registry: &VoiceRegistry,
    normalized: bool,
) -> Result<Embedding, BlendError> {
    let ratios = effective_ratios(weights, normalized)?;

    let mut blend: Option<Embedding> = None;
    for (voice, ratio) in &ratios {
        let embedding = registry
            .get(voice.as_str())
            .ok_or_else(|| BlendError::UnknownVoice(voice.to_string()))?;
        #[allow(clippy::cast_possible_truncation)]
        let ratio = *ratio as f32;

        match blend.as_mut() {
            None => blend = Some(embedding * ratio),
            Some(acc) => {
                if acc.shape() != embedding.shape() {
                    return Err(BlendError::ShapeMismatch {
                        voice: voice.to_string(),
                        expected: acc.shape().to_vec(),
                        found: embedding.shape().to_vec(),
                    });
                }
                acc.scaled_add(ratio, embedding);
            }
        }
    }

    tracing::debug!(voices = ratios.len(), normalized, "Compiled voice blend");
    blend.ok_or(BlendError::NoActiveVoice)
}
