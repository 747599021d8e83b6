//! CLI-specific error types and mappings.
//!
//! Maps the library error taxonomy onto exit codes and user-facing messages.

use thiserror::Error;
use voxblend_core::{BlendError, ConfigError};
use voxblend_voice::VoiceError;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// A weight edit or blend compilation was rejected.
    #[error("{0}")]
    Blend(#[from] BlendError),

    /// Argument validation failed.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// IO error (file not found, permission denied, etc.).
    #[error("IO error: {0}")]
    Io(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Voice pack or export failure.
    #[error("Voice error: {0}")]
    Voice(String),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow Unix conventions:
    /// - 0: Success
    /// - 1: General error
    /// - 2: Misuse of shell command (invalid arguments)
    /// - 64-78: Reserved for specific error categories (see sysexits.h)
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Blend(_) => 1,
            Self::Arguments(_) => 2, // EX_USAGE
            Self::Voice(_) => 65,    // EX_DATAERR
            Self::Io(_) => 74,       // EX_IOERR
            Self::Config(_) => 78,   // EX_CONFIG
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Io { .. } => Self::Io(err.to_string()),
            ConfigError::Parse { .. } | ConfigError::Encode(_) | ConfigError::NoConfigDir => {
                Self::Config(err.to_string())
            }
        }
    }
}

impl From<VoiceError> for CliError {
    fn from(err: VoiceError) -> Self {
        match err {
            VoiceError::Blend(e) => Self::Blend(e),
            VoiceError::Config(e) => e.into(),
            VoiceError::Io(e) => Self::Io(e.to_string()),
            other => Self::Voice(other.to_string()),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn exit_codes_follow_sysexits() {
        assert_eq!(CliError::Arguments("x".into()).exit_code(), 2);
        assert_eq!(CliError::from(ConfigError::NoConfigDir).exit_code(), 78);
        assert_eq!(
            CliError::from(VoiceError::ModelNotFound(PathBuf::from("v.bin"))).exit_code(),
            65
        );
    }

    #[test]
    fn nested_blend_errors_keep_their_message() {
        let err = CliError::from(VoiceError::Blend(BlendError::NoActiveVoice));
        assert_eq!(err.exit_code(), 1);
        assert_eq!(err.to_string(), "At least one voice ratio must be greater than 0");
    }
}
