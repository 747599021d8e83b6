//! Preview requests: everything a background synthesis task needs, captured
//! from the session at the moment the preview was asked for.

use std::path::PathBuf;

use voxblend_core::{
    BlendError, Embedding, SessionSettings, SynthesisError, SynthesisGateway, SynthesizedAudio,
    VoiceRegistry, WeightSet, compile,
};

/// Why a preview is being synthesized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewKind {
    /// The user asked for it; failures are reported.
    Explicit,
    /// Fired by the auto-preview ticker; failures are only logged.
    Auto,
    /// Synthesize, write a WAV file to the path, then play.
    Export(PathBuf),
}

impl PreviewKind {
    pub const fn is_auto(&self) -> bool {
        matches!(self, Self::Auto)
    }
}

/// A compiled blend plus the text and settings to synthesize it with.
#[derive(Debug, Clone)]
pub struct PreviewRequest {
    pub text: String,
    pub blend: Embedding,
    pub speed: f32,
    pub lang: String,
}

impl PreviewRequest {
    /// Snapshot the current mix into a request.
    ///
    /// Fails with [`BlendError::EmptyText`] for blank text and with the
    /// compiler's errors for an empty or unresolvable mix.
    pub fn prepare(
        text: &str,
        weights: &WeightSet,
        settings: &SessionSettings,
        registry: &VoiceRegistry,
        lang: &str,
    ) -> Result<Self, BlendError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(BlendError::EmptyText);
        }

        let blend = compile(weights, registry, settings.normalize)?;
        Ok(Self {
            text: text.to_string(),
            blend,
            speed: settings.speed,
            lang: lang.to_string(),
        })
    }

    /// Run the synthesis engine on this request.
    pub async fn synthesize(
        &self,
        gateway: &dyn SynthesisGateway,
    ) -> Result<SynthesizedAudio, SynthesisError> {
        tracing::debug!(
            chars = self.text.len(),
            speed = self.speed,
            lang = %self.lang,
            "Synthesizing preview"
        );
        gateway
            .create(&self.text, &self.blend, self.speed, &self.lang)
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use ndarray::arr1;
    use voxblend_core::VoiceCatalog;

    use super::*;

    fn mix() -> (WeightSet, VoiceRegistry) {
        let catalog = Arc::new(VoiceCatalog::new(["a", "b"]).unwrap());
        let mut weights = WeightSet::new(catalog);
        weights.set_weight("a", 100).unwrap();
        let mut registry = VoiceRegistry::new();
        registry.insert("a", arr1(&[1.0_f32, 2.0]).into_dyn());
        (weights, registry)
    }

    #[test]
    fn blank_text_is_rejected() {
        let (weights, registry) = mix();
        let err = PreviewRequest::prepare(
            "  \n",
            &weights,
            &SessionSettings::default(),
            &registry,
            "en-us",
        )
        .unwrap_err();
        assert_eq!(err, BlendError::EmptyText);
    }

    #[test]
    fn request_captures_trimmed_text_and_speed() {
        let (weights, registry) = mix();
        let mut settings = SessionSettings::default();
        settings.set_speed(1.5);

        let request =
            PreviewRequest::prepare(" hi there ", &weights, &settings, &registry, "en-us").unwrap();
        assert_eq!(request.text, "hi there");
        assert!((request.speed - 1.5).abs() < f32::EPSILON);
        assert_eq!(request.blend.shape(), &[2]);
    }

    #[test]
    fn empty_mix_is_no_active_voice() {
        let (mut weights, registry) = mix();
        weights.reset_all();
        let err = PreviewRequest::prepare(
            "hello",
            &weights,
            &SessionSettings::default(),
            &registry,
            "en-us",
        )
        .unwrap_err();
        assert_eq!(err, BlendError::NoActiveVoice);
    }
}
