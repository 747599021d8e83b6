//! Session document persistence.
//!
//! A session is stored as a JSON document:
//!
//! ```json
//! {
//!     "voice_weights": { "af_bella": 0.6, "am_adam": 0.4 },
//!     "voice_enabled": { "af_bella": true, "am_adam": true },
//!     "normalize_sliders": true,
//!     "sliders_per_row": 1,
//!     "speed": 1.0
//! }
//! ```
//!
//! `voice_enabled` is redundant (`weight > 0`) but written for compatibility
//! with existing documents; it is ignored on load. Catalog voices missing
//! from a document load as zero, voices unknown to the catalog are skipped.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::catalog::VoiceCatalog;
use crate::error::ConfigError;
use crate::settings::{DEFAULT_COLUMNS, DEFAULT_SPEED, SessionSettings};
use crate::weights::{WeightSet, ratio_to_units, units_to_ratio};

/// Environment variable overriding the configuration directory.
pub const CONFIG_DIR_ENV: &str = "VOXBLEND_CONFIG_DIR";

/// File name of the document written on shutdown and restored on startup.
pub const LAST_CONFIG_FILE: &str = "last_blender_config.json";

/// On-disk shape of a session document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigDocument {
    #[serde(default)]
    pub voice_weights: BTreeMap<String, f64>,

    #[serde(default)]
    pub voice_enabled: BTreeMap<String, bool>,

    #[serde(default = "default_normalize")]
    pub normalize_sliders: bool,

    #[serde(default = "default_columns")]
    pub sliders_per_row: u32,

    #[serde(default = "default_speed")]
    pub speed: f32,
}

const fn default_normalize() -> bool {
    true
}

const fn default_columns() -> u32 {
    DEFAULT_COLUMNS
}

const fn default_speed() -> f32 {
    DEFAULT_SPEED
}

impl ConfigDocument {
    /// Capture the current weights and settings.
    pub fn capture(weights: &WeightSet, settings: &SessionSettings) -> Self {
        Self {
            voice_weights: weights
                .iter()
                .map(|(voice, units)| (voice.to_string(), units_to_ratio(units)))
                .collect(),
            voice_enabled: weights
                .iter()
                .map(|(voice, units)| (voice.to_string(), units > 0))
                .collect(),
            normalize_sliders: settings.normalize,
            sliders_per_row: settings.columns,
            speed: settings.speed,
        }
    }

    /// Rebuild weights for `catalog` and the session settings.
    pub fn restore(&self, catalog: &Arc<VoiceCatalog>) -> (WeightSet, SessionSettings) {
        let mut weights = WeightSet::new(Arc::clone(catalog));
        for (voice, ratio) in &self.voice_weights {
            if weights
                .set_weight(voice, i32::from(ratio_to_units(*ratio)))
                .is_err()
            {
                tracing::debug!(voice = %voice, "Skipping voice not in catalog");
            }
        }

        let settings = SessionSettings {
            normalize: self.normalize_sliders,
            speed: self.speed,
            columns: self.sliders_per_row,
        }
        .sanitized();

        (weights, settings)
    }
}

/// Write a session document to `path`, creating parent directories.
pub fn save(
    path: &Path,
    weights: &WeightSet,
    settings: &SessionSettings,
) -> Result<(), ConfigError> {
    let document = ConfigDocument::capture(weights, settings);

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    document
        .serialize(&mut serializer)
        .map_err(ConfigError::Encode)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, buf).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::info!(path = %path.display(), "Configuration saved");
    Ok(())
}

/// Read a session document from `path`.
pub fn load(
    path: &Path,
    catalog: &Arc<VoiceCatalog>,
) -> Result<(WeightSet, SessionSettings), ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let document: ConfigDocument =
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    tracing::info!(path = %path.display(), "Configuration loaded");
    Ok(document.restore(catalog))
}

/// Locates session documents on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigStore {
    dir: PathBuf,
}

impl ConfigStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Resolve the configuration directory.
    ///
    /// Resolution order:
    /// 1. `VOXBLEND_CONFIG_DIR` environment variable
    /// 2. The platform config directory (e.g. `~/.config/voxblend/configs`)
    pub fn resolve() -> Result<Self, ConfigError> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            if !dir.trim().is_empty() {
                return Ok(Self::new(dir));
            }
        }
        dirs::config_dir()
            .map(|base| Self::new(base.join("voxblend").join("configs")))
            .ok_or(ConfigError::NoConfigDir)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn last_config_path(&self) -> PathBuf {
        self.dir.join(LAST_CONFIG_FILE)
    }

    /// Persist the last-used session (shutdown hook).
    pub fn save_last(
        &self,
        weights: &WeightSet,
        settings: &SessionSettings,
    ) -> Result<(), ConfigError> {
        save(&self.last_config_path(), weights, settings)
    }

    /// Restore the last-used session, falling back to defaults.
    ///
    /// A missing document is normal on first start; a malformed one is
    /// logged and ignored.
    pub fn restore_last(&self, catalog: &Arc<VoiceCatalog>) -> (WeightSet, SessionSettings) {
        let path = self.last_config_path();
        if !path.exists() {
            return (
                WeightSet::new(Arc::clone(catalog)),
                SessionSettings::default(),
            );
        }
        match load(&path, catalog) {
            Ok(restored) => restored,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load last configuration, using defaults");
                (
                    WeightSet::new(Arc::clone(catalog)),
                    SessionSettings::default(),
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Arc<VoiceCatalog> {
        Arc::new(VoiceCatalog::new(["a", "b", "c"]).unwrap())
    }

    #[test]
    fn document_marks_enabled_voices() {
        let mut weights = WeightSet::new(catalog());
        weights.set_weight("b", 30).unwrap();
        let document = ConfigDocument::capture(&weights, &SessionSettings::default());
        assert_eq!(document.voice_enabled.get("b"), Some(&true));
        assert_eq!(document.voice_enabled.get("a"), Some(&false));
        assert!((document.voice_weights["b"] - 0.3).abs() < 1e-9);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let document: ConfigDocument = serde_json::from_str("{}").unwrap();
        assert!(document.normalize_sliders);
        assert_eq!(document.sliders_per_row, 1);
        assert!((document.speed - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn restore_skips_unknown_and_zeroes_missing() {
        let document: ConfigDocument =
            serde_json::from_str(r#"{"voice_weights": {"a": 0.29, "zz": 0.5}}"#).unwrap();
        let (weights, _) = document.restore(&catalog());
        assert_eq!(weights.weight("a"), Some(29));
        assert_eq!(weights.weight("b"), Some(0));
        assert_eq!(weights.weight("c"), Some(0));
    }

    #[test]
    fn restore_sanitizes_settings() {
        let document: ConfigDocument =
            serde_json::from_str(r#"{"speed": 9.0, "sliders_per_row": 0}"#).unwrap();
        let (_, settings) = document.restore(&catalog());
        assert!((settings.speed - 3.0).abs() < f32::EPSILON);
        assert_eq!(settings.columns, 1);
    }

    #[test]
    fn last_config_path_is_in_dir() {
        let store = ConfigStore::new("/tmp/vb");
        assert_eq!(
            store.last_config_path(),
            PathBuf::from("/tmp/vb/last_blender_config.json")
        );
    }
}
