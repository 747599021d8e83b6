//! WAV export of synthesized audio (32-bit float, mono).

use std::path::Path;

use hound::{SampleFormat, WavSpec, WavWriter};
use voxblend_core::SynthesizedAudio;

use crate::error::VoiceError;

/// Write `audio` to `path` as a mono 32-bit float WAV file.
pub fn write_wav(path: &Path, audio: &SynthesizedAudio) -> Result<(), VoiceError> {
    let wav_err = |source: hound::Error| VoiceError::Wav {
        path: path.to_path_buf(),
        source,
    };

    let spec = WavSpec {
        channels: 1,
        sample_rate: audio.sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };

    let mut writer = WavWriter::create(path, spec).map_err(wav_err)?;
    for &sample in &audio.samples {
        writer.write_sample(sample).map_err(wav_err)?;
    }
    writer.finalize().map_err(wav_err)?;

    tracing::info!(
        path = %path.display(),
        samples = audio.samples.len(),
        sample_rate = audio.sample_rate,
        "Audio written"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use hound::WavReader;

    use super::*;

    #[test]
    fn writes_float_mono_wav() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.wav");
        let audio = SynthesizedAudio::new(vec![0.0, 0.25, -0.5, 1.0], 24_000);

        write_wav(&path, &audio).unwrap();

        let mut reader = WavReader::open(&path).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 24_000);
        assert_eq!(spec.sample_format, SampleFormat::Float);
        let samples: Vec<f32> = reader.samples::<f32>().map(Result::unwrap).collect();
        assert_eq!(samples, audio.samples);
    }
}
