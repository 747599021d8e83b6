//! Main commands enum and primary subcommands.
//!
//! This module defines the available commands for the CLI tool.

use std::path::PathBuf;

use clap::{Subcommand, ValueEnum};
use voxblend_core::DEFAULT_RANDOM_COUNT;

/// On/off switch for boolean settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

impl Toggle {
    pub const fn enabled(self) -> bool {
        matches!(self, Self::On)
    }
}

/// Available commands for the voice blender.
///
/// Each command edits, inspects or exports the last-used mix.
#[derive(Subcommand)]
pub enum Commands {
    /// List the voices in the catalog
    Voices,

    /// Show the current mix and settings
    Show,

    /// Move one voice slider (0-100) and normalize the rest around it
    Set {
        /// Voice identifier (e.g. "af_bella")
        voice: String,
        /// Slider value; clamped to 0-100
        #[arg(allow_negative_numbers = true)]
        units: i32,
    },

    /// Set every voice to zero
    Reset,

    /// Pick random voices with random weights
    Randomize {
        /// Number of voices to pick
        #[arg(short, long, default_value_t = DEFAULT_RANDOM_COUNT)]
        count: usize,
        /// Seed for a reproducible mix
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Redraw the weights of the voices already in the mix
    Refresh {
        /// Seed for a reproducible mix
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Turn slider normalization on or off
    Normalize {
        #[arg(value_enum)]
        state: Toggle,
    },

    /// Set the speaking speed (0.1-3.0)
    Speed {
        value: f32,
    },

    /// Set the number of sliders per row
    Columns {
        value: u32,
    },

    /// Save the mix to a configuration file
    Save {
        path: PathBuf,
    },

    /// Load a mix from a configuration file
    Load {
        path: PathBuf,
    },

    /// Compile the mix against a voice pack and write it as a .npy file
    Export {
        /// Kokoro voice pack (NumPy .npz archive)
        #[arg(long)]
        voices: PathBuf,
        /// Output .npy path
        #[arg(long)]
        out: PathBuf,
    },
}
