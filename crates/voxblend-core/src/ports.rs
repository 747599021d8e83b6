//! Gateway ports: engine-agnostic interfaces for synthesis and playback.
//!
//! The session runtime only talks to a speech engine and an audio device
//! through these traits, so engines and output backends can be swapped
//! (or faked in tests) without touching the blending logic.

use std::time::Duration;

use async_trait::async_trait;

use crate::blend::Embedding;
use crate::error::{PlaybackError, SynthesisError};

// ── Shared types ───────────────────────────────────────────────────

/// Audio produced by a synthesis engine.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesizedAudio {
    /// PCM f32 samples, mono.
    pub samples: Vec<f32>,

    /// Sample rate of the audio (e.g., 24 000 Hz for Kokoro).
    pub sample_rate: u32,

    /// Duration of the audio.
    pub duration: Duration,
}

impl SynthesizedAudio {
    /// Wrap raw samples, deriving the duration from the sample rate.
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        let duration = if sample_rate == 0 {
            Duration::ZERO
        } else {
            #[allow(clippy::cast_precision_loss)]
            let secs = samples.len() as f64 / f64::from(sample_rate);
            Duration::from_secs_f64(secs)
        };
        Self {
            samples,
            sample_rate,
            duration,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

// ── Synthesis ──────────────────────────────────────────────────────

/// Text + blend vector → PCM samples.
///
/// Implementations must be `Send + Sync`: previews run on background tasks
/// that hold the gateway behind an `Arc`.
#[async_trait]
pub trait SynthesisGateway: Send + Sync {
    /// Synthesize `text` with the given blended style vector.
    ///
    /// `blend` has the same shape as the registry's embeddings and its
    /// contributing ratios already sum to 1.
    async fn create(
        &self,
        text: &str,
        blend: &Embedding,
        speed: f32,
        lang: &str,
    ) -> Result<SynthesizedAudio, SynthesisError>;
}

// ── Playback ───────────────────────────────────────────────────────

/// PCM samples → audible output with a busy/idle signal.
pub trait PlaybackGateway: Send + Sync {
    /// Start playing `audio`, replacing anything currently playing.
    /// Returns as soon as playback has started.
    fn play(&self, audio: &SynthesizedAudio) -> Result<(), PlaybackError>;

    /// Whether audio is still being played.
    fn is_busy(&self) -> bool;

    /// Stop playback immediately. No-op when idle.
    fn stop(&self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_follows_sample_rate() {
        let audio = SynthesizedAudio::new(vec![0.0; 12_000], 24_000);
        assert_eq!(audio.duration, Duration::from_millis(500));
        assert!(SynthesizedAudio::new(vec![], 0).duration.is_zero());
    }
}
