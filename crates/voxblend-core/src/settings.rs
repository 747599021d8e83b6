//! Session settings domain type and validation.

use serde::{Deserialize, Serialize};

/// Slowest allowed synthesis speed.
pub const MIN_SPEED: f32 = 0.1;

/// Fastest allowed synthesis speed.
pub const MAX_SPEED: f32 = 3.0;

/// Default synthesis speed.
pub const DEFAULT_SPEED: f32 = 1.0;

/// Default number of sliders per grid row.
pub const DEFAULT_COLUMNS: u32 = 1;

/// Language tag passed to the synthesis engine.
pub const DEFAULT_LANG: &str = "en-us";

/// Text used for previews until the user types something else.
pub const DEFAULT_PREVIEW_TEXT: &str = "Hello, this is a test for voice blending.";

/// Settings that persist alongside the weights.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Keep the sliders summing to 1.0.
    pub normalize: bool,

    /// Synthesis speed multiplier (`0.1..=3.0`).
    pub speed: f32,

    /// Sliders per row (presentational only, `>= 1`).
    pub columns: u32,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            normalize: true,
            speed: DEFAULT_SPEED,
            columns: DEFAULT_COLUMNS,
        }
    }
}

impl SessionSettings {
    /// Set the speed, clamped to the supported range.
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = clamp_speed(speed);
    }

    /// Set the grid width; zero is raised to one.
    pub fn set_columns(&mut self, columns: u32) {
        self.columns = columns.max(1);
    }

    /// Copy with every field forced into its valid range.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        self.set_speed(self.speed);
        self.set_columns(self.columns);
        self
    }
}

/// Clamp a speed into `MIN_SPEED..=MAX_SPEED`; non-finite input falls back
/// to the default.
pub fn clamp_speed(speed: f32) -> f32 {
    if speed.is_finite() {
        speed.clamp(MIN_SPEED, MAX_SPEED)
    } else {
        DEFAULT_SPEED
    }
}

/// Grid cell `(row, column)` of the slider at `index`.
pub const fn grid_position(index: usize, columns: u32) -> (usize, usize) {
    let columns = if columns == 0 { 1 } else { columns as usize };
    (index / columns, index % columns)
}
