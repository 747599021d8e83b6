//! Voice pack loading.
//!
//! Kokoro ships its voices as a NumPy `.npz` archive (`voices-v1.0.bin`)
//! with one `f32` array per voice, keyed by voice id.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use ndarray::ArrayD;
use ndarray_npy::NpzReader;
use voxblend_core::{VoiceCatalog, VoiceId, VoiceRegistry};

use crate::error::VoiceError;

/// Load every array in the archive at `path` into a [`VoiceRegistry`].
pub fn load_npz(path: &Path) -> Result<VoiceRegistry, VoiceError> {
    if !path.exists() {
        return Err(VoiceError::ModelNotFound(path.to_path_buf()));
    }

    let npz_err = |source: ndarray_npy::ReadNpzError| VoiceError::VoicePack {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path)?;
    let mut npz = NpzReader::new(BufReader::new(file)).map_err(npz_err)?;

    let mut registry = VoiceRegistry::new();
    for name in npz.names().map_err(npz_err)? {
        let embedding: ArrayD<f32> = npz.by_name(&name).map_err(npz_err)?;
        let voice = name.strip_suffix(".npy").unwrap_or(&name);
        tracing::trace!(voice, shape = ?embedding.shape(), "Loaded voice embedding");
        registry.insert(voice, embedding);
    }

    tracing::info!(
        path = %path.display(),
        voices = registry.len(),
        "Voice pack loaded"
    );
    Ok(registry)
}

/// Catalog voices that have no embedding in `registry`.
pub fn missing_voices<'a>(
    catalog: &'a VoiceCatalog,
    registry: &VoiceRegistry,
) -> Vec<&'a VoiceId> {
    catalog
        .iter()
        .filter(|voice| !registry.contains(voice.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use ndarray::{Array3, ArrayD, IxDyn};
    use ndarray_npy::NpzWriter;

    use super::*;

    #[test]
    fn missing_file_is_model_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("voices.bin");
        assert!(matches!(load_npz(&path), Err(VoiceError::ModelNotFound(p)) if p == path));
    }

    #[test]
    fn loads_every_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("voices.bin");

        let mut writer = NpzWriter::new(File::create(&path).unwrap());
        writer
            .add_array("af_bella", &Array3::<f32>::from_elem((4, 1, 8), 0.5))
            .unwrap();
        writer
            .add_array("am_adam", &Array3::<f32>::zeros((4, 1, 8)))
            .unwrap();
        writer.finish().unwrap();

        let registry = load_npz(&path).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("af_bella").unwrap().shape(), &[4, 1, 8]);
        assert!(registry.contains("am_adam"));
    }

    #[test]
    fn reports_catalog_voices_without_embeddings() {
        let catalog = VoiceCatalog::new(["a", "b", "c"]).unwrap();
        let mut registry = VoiceRegistry::new();
        registry.insert("b", ArrayD::zeros(IxDyn(&[2])));

        let missing: Vec<&str> = missing_voices(&catalog, &registry)
            .into_iter()
            .map(VoiceId::as_str)
            .collect();
        assert_eq!(missing, ["a", "c"]);
    }
}
