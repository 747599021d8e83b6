//! Preview output through `rodio`.
//!
//! [`PreviewOutput`] holds the `!Send` output stream, so it lives on the
//! thread that opened it. The session reaches it through
//! [`crate::audio_thread::LocalPlayback`].

use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, OutputStreamHandle, Sink};
use voxblend_core::PlaybackError;

fn device_err(e: impl std::fmt::Display) -> PlaybackError {
    PlaybackError::OutputStream(e.to_string())
}

/// The default output device plus at most one queued preview.
pub struct PreviewOutput {
    // Dropping the stream silences the device.
    _stream: OutputStream,
    handle: OutputStreamHandle,
    current: Option<Sink>,
}

impl PreviewOutput {
    pub fn open_default() -> Result<Self, PlaybackError> {
        let (stream, handle) = OutputStream::try_default().map_err(device_err)?;
        tracing::info!("Opened default audio output for previews");

        Ok(Self {
            _stream: stream,
            handle,
            current: None,
        })
    }

    /// Start a mono clip, cutting off whatever preview was still audible.
    pub fn start(&mut self, samples: Vec<f32>, sample_rate: u32) -> Result<(), PlaybackError> {
        self.halt();

        let sink = Sink::try_new(&self.handle).map_err(device_err)?;
        let len = samples.len();
        sink.append(SamplesBuffer::new(1, sample_rate, samples));
        self.current = Some(sink);

        tracing::debug!(samples = len, sample_rate, "Preview clip queued");
        Ok(())
    }

    pub fn halt(&mut self) {
        if let Some(sink) = self.current.take() {
            sink.stop();
            tracing::debug!("Preview clip stopped");
        }
    }

    /// A clip is queued and has not drained yet.
    pub fn is_audible(&self) -> bool {
        self.current.as_ref().is_some_and(|sink| !sink.empty())
    }
}
