//! Session runtime error types.

use std::path::PathBuf;

use voxblend_core::{BlendError, ConfigError, PlaybackError, SynthesisError};

/// Errors that can occur while running a blend session.
#[derive(Debug, thiserror::Error)]
pub enum VoiceError {
    /// Weight edit or blend compilation failed.
    #[error(transparent)]
    Blend(#[from] BlendError),

    /// Reading or writing a session document failed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The synthesis engine failed.
    #[error(transparent)]
    Synthesis(#[from] SynthesisError),

    /// The audio output failed.
    #[error(transparent)]
    Playback(#[from] PlaybackError),

    /// Voice pack file not found at expected path.
    #[error("Voice pack not found at {0}")]
    ModelNotFound(PathBuf),

    /// The voice pack exists but could not be decoded.
    #[error("Failed to read voice pack {path}: {source}")]
    VoicePack {
        path: PathBuf,
        source: ndarray_npy::ReadNpzError,
    },

    /// Writing a WAV file failed.
    #[error("Failed to write audio to {path}: {source}")]
    Wav { path: PathBuf, source: hound::Error },

    /// A preview was requested while another is still being synthesized.
    #[error("A preview is already being synthesized")]
    PreviewInFlight,

    /// The session task has stopped.
    #[error("Blend session is closed")]
    SessionClosed,

    /// IO error (voice packs, output files).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
