//! Error taxonomy for the blending core.
//!
//! The numeric core (weights, normalization) never fails on degenerate input;
//! these errors cover lookups against the catalog/registry, persisted
//! documents, and the external synthesis/playback collaborators.

use std::path::PathBuf;

/// Errors raised while editing weights or compiling a blend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BlendError {
    /// The voice is not part of the catalog (on edit) or registry (on compile).
    #[error("Voice not found: {0}")]
    UnknownVoice(String),

    /// A blend was requested while every weight is zero.
    #[error("At least one voice ratio must be greater than 0")]
    NoActiveVoice,

    /// A catalog was built with the same voice listed twice.
    #[error("Voice listed more than once: {0}")]
    DuplicateVoice(String),

    /// Two embeddings in a blend have different shapes.
    #[error("Embedding for '{voice}' has shape {found:?}, expected {expected:?}")]
    ShapeMismatch {
        voice: String,
        expected: Vec<usize>,
        found: Vec<usize>,
    },

    /// Synthesis was requested with no text.
    #[error("Please enter text to synthesize")]
    EmptyText,
}

/// Errors raised while persisting or restoring a session document.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Reading or writing the document failed.
    #[error("Config IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The document is not valid JSON or has the wrong shape.
    #[error("Malformed config document at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// The document could not be encoded.
    #[error("Failed to encode config document: {0}")]
    Encode(#[source] serde_json::Error),

    /// No usable configuration directory could be determined.
    #[error("Cannot determine configuration directory")]
    NoConfigDir,
}

/// Failure reported by a [`SynthesisGateway`](crate::ports::SynthesisGateway).
#[derive(Debug, Clone, thiserror::Error)]
#[error("Speech synthesis failed: {0}")]
pub struct SynthesisError(pub String);

/// Failure reported by a [`PlaybackGateway`](crate::ports::PlaybackGateway).
#[derive(Debug, Clone, thiserror::Error)]
pub enum PlaybackError {
    /// The output device could not be opened.
    #[error("Failed to open audio output stream: {0}")]
    OutputStream(String),

    /// The playback thread is gone.
    #[error("Audio playback thread terminated unexpectedly")]
    ThreadDied,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_user_facing() {
        assert_eq!(
            BlendError::UnknownVoice("xx_nobody".into()).to_string(),
            "Voice not found: xx_nobody"
        );
        assert_eq!(
            BlendError::NoActiveVoice.to_string(),
            "At least one voice ratio must be greater than 0"
        );
    }
}
