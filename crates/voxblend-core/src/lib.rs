//! Core domain for voxblend: the voice catalog, the slider weight model,
//! proportional normalization, blend compilation, session persistence and
//! the gateway ports the runtime plugs engines into.
//!
//! Nothing in this crate touches audio devices or runs timers; see
//! `voxblend-voice` for the interactive session runtime.

#![deny(unused_crate_dependencies)]

pub mod blend;
pub mod catalog;
pub mod config;
pub mod error;
pub mod labels;
pub mod normalize;
pub mod ports;
pub mod randomize;
pub mod settings;
pub mod weights;

pub use blend::{Embedding, VoiceRegistry, compile, effective_ratios};
pub use catalog::{VoiceCatalog, VoiceId};
pub use config::{CONFIG_DIR_ENV, ConfigDocument, ConfigStore, LAST_CONFIG_FILE};
pub use error::{BlendError, ConfigError, PlaybackError, SynthesisError};
pub use labels::{VoiceLabel, labels};
pub use normalize::{Pivot, normalize};
pub use ports::{PlaybackGateway, SynthesisGateway, SynthesizedAudio};
pub use randomize::{DEFAULT_RANDOM_COUNT, randomize, refresh};
pub use settings::{
    DEFAULT_COLUMNS, DEFAULT_LANG, DEFAULT_PREVIEW_TEXT, DEFAULT_SPEED, MAX_SPEED, MIN_SPEED,
    SessionSettings, clamp_speed, grid_position,
};
pub use weights::{MAX_UNITS, WeightSet, clamp_units, ratio_to_units, units_to_ratio};

// Integration tests use tempfile; unit tests do not.
#[cfg(test)]
use tempfile as _;
