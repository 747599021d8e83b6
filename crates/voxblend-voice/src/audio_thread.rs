//! Preview playback on its own OS thread.
//!
//! The rodio output stream cannot cross threads on every platform, so a
//! single `voxblend-audio` thread opens it and serves [`Request`]s from a
//! channel. [`LocalPlayback`] is the `Send + Sync` front that the
//! session holds as its [`PlaybackGateway`].

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use voxblend_core::{PlaybackError, PlaybackGateway, SynthesizedAudio};

use crate::playback::PreviewOutput;

// ── Requests ───────────────────────────────────────────────────────

enum Request {
    Start {
        samples: Vec<f32>,
        sample_rate: u32,
        done: Sender<Result<(), PlaybackError>>,
    },
    Halt,
    Audible(Sender<bool>),
    Close,
}

// ── Gateway ────────────────────────────────────────────────────────

/// Handle to the audio thread. Dropping it closes the output device.
pub struct LocalPlayback {
    requests: Sender<Request>,
    worker: Option<JoinHandle<()>>,
}

impl LocalPlayback {
    /// Start the audio thread and open the default output device.
    ///
    /// Blocks until the device is open; a device error is returned here
    /// rather than on the first `play`.
    pub fn spawn() -> Result<Self, PlaybackError> {
        let (requests, inbox) = mpsc::channel();
        let (ready_tx, ready_rx) = mpsc::channel();

        let worker = thread::Builder::new()
            .name("voxblend-audio".into())
            .spawn(move || serve(&inbox, &ready_tx))
            .map_err(|e| PlaybackError::OutputStream(format!("cannot start audio thread: {e}")))?;

        ready_rx.recv().map_err(|_| PlaybackError::ThreadDied)??;
        tracing::debug!("Audio thread ready");

        Ok(Self {
            requests,
            worker: Some(worker),
        })
    }

    /// Send a request carrying a reply sender and wait for the answer.
    fn ask<T>(&self, make: impl FnOnce(Sender<T>) -> Request) -> Result<T, PlaybackError> {
        let (tx, rx) = mpsc::channel();
        self.requests
            .send(make(tx))
            .map_err(|_| PlaybackError::ThreadDied)?;
        rx.recv().map_err(|_| PlaybackError::ThreadDied)
    }
}

impl PlaybackGateway for LocalPlayback {
    fn play(&self, audio: &SynthesizedAudio) -> Result<(), PlaybackError> {
        self.ask(|done| Request::Start {
            samples: audio.samples.clone(),
            sample_rate: audio.sample_rate,
            done,
        })?
    }

    fn is_busy(&self) -> bool {
        self.ask(Request::Audible).unwrap_or(false)
    }

    fn stop(&self) {
        let _ = self.requests.send(Request::Halt);
    }
}

impl Drop for LocalPlayback {
    fn drop(&mut self) {
        let _ = self.requests.send(Request::Close);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

// ── Audio thread ───────────────────────────────────────────────────

/// Thread body: owns the output for as long as requests keep coming.
fn serve(inbox: &Receiver<Request>, ready: &Sender<Result<(), PlaybackError>>) {
    let mut output = match PreviewOutput::open_default() {
        Ok(output) => output,
        Err(e) => {
            let _ = ready.send(Err(e));
            return;
        }
    };
    if ready.send(Ok(())).is_err() {
        return;
    }

    for request in inbox {
        match request {
            Request::Start {
                samples,
                sample_rate,
                done,
            } => {
                let _ = done.send(output.start(samples, sample_rate));
            }
            Request::Halt => output.halt(),
            Request::Audible(reply) => {
                let _ = reply.send(output.is_audible());
            }
            Request::Close => break,
        }
    }

    tracing::debug!("Audio thread stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    // CI machines usually have no sound card; both outcomes are valid but a
    // missing device must surface as an error, not a hang or panic.
    #[test]
    fn spawn_reports_device_or_serves_requests() {
        match LocalPlayback::spawn() {
            Ok(playback) => {
                assert!(!playback.is_busy());
                playback.stop();
                let clip = SynthesizedAudio::new(vec![0.0; 240], 24_000);
                assert!(playback.play(&clip).is_ok());
                playback.stop();
            }
            Err(e) => assert!(matches!(e, PlaybackError::OutputStream(_))),
        }
    }
}
