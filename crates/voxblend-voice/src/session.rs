//! Blend session: the async event loop around the interaction controller.
//!
//! A [`BlendSession`] owns the [`InteractionController`] and multiplexes, on
//! a single task:
//!
//! - [`SessionCommand`]s from the UI (via a [`SessionHandle`]),
//! - the debounce deadline of the pending slider edit,
//! - the auto-preview ticker (only while auto-preview is on),
//! - completion of background preview synthesis.
//!
//! All weight mutation happens on this task. Synthesis runs on a spawned
//! task and reports back over a channel; at most one synthesis is in flight
//! at a time. An auto-preview that completes after auto-preview was turned
//! off is discarded. A user preview that arrives while an auto-preview is
//! synthesizing waits for it and starts as soon as it finishes.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{Instant, Interval, MissedTickBehavior};
use voxblend_core::config;
use voxblend_core::{
    ConfigStore, DEFAULT_LANG, DEFAULT_PREVIEW_TEXT, DEFAULT_RANDOM_COUNT, PlaybackGateway,
    SessionSettings, SynthesisError, SynthesisGateway, SynthesizedAudio, VoiceId, VoiceRegistry,
    WeightSet,
};

use crate::controller::{
    BlendEvent, ControllerConfig, EditState, InteractionController, SliderEdit,
};
use crate::error::VoiceError;
use crate::preview::{PreviewKind, PreviewRequest};
use crate::wav::write_wav;

// ── Commands ───────────────────────────────────────────────────────

/// A request sent to the session task.
#[derive(Debug)]
pub enum SessionCommand {
    /// The user moved a slider.
    Edit { voice: VoiceId, units: i32 },
    SetText(String),
    SetSpeed(f32),
    SetColumns(u32),
    SetNormalize(bool),
    SetAutoLoop(bool),
    SetContinuous(bool),
    Reset,
    /// Random mix of `count` voices (session default when `None`).
    Randomize { count: Option<usize> },
    /// Redraw active weights, then preview.
    Refresh,
    Preview,
    /// Turn auto-preview off, synthesize, write a WAV file, then play it.
    SynthesizeAndSave(PathBuf),
    Save(PathBuf),
    Load(PathBuf),
    Snapshot(oneshot::Sender<SessionSnapshot>),
    /// Persist the last-used document and stop the task.
    Shutdown,
}

/// Point-in-time copy of the session state.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub weights: WeightSet,
    pub settings: SessionSettings,
    pub text: String,
    pub edit_state: EditState,
    pub auto_loop: bool,
    pub continuous: bool,
    pub normalization_passes: u64,
    pub preview_in_flight: bool,
}

// ── Options ────────────────────────────────────────────────────────

/// Session configuration.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub controller: ControllerConfig,

    /// Initial preview text.
    pub text: String,

    /// Language tag passed to the synthesis engine.
    pub lang: String,

    /// Voices picked by a `Randomize` without an explicit count.
    pub random_count: usize,

    /// Where the last-used document is persisted on shutdown.
    pub store: Option<ConfigStore>,

    /// Fixed RNG seed (random mixes are reproducible when set).
    pub seed: Option<u64>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            controller: ControllerConfig::default(),
            text: DEFAULT_PREVIEW_TEXT.to_string(),
            lang: DEFAULT_LANG.to_string(),
            random_count: DEFAULT_RANDOM_COUNT,
            store: None,
            seed: None,
        }
    }
}

// ── Handle ─────────────────────────────────────────────────────────

/// Cloneable sender half for a running session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: mpsc::UnboundedSender<SessionCommand>,
}

impl SessionHandle {
    pub fn send(&self, command: SessionCommand) -> Result<(), VoiceError> {
        self.tx.send(command).map_err(|_| VoiceError::SessionClosed)
    }

    /// Report a user slider edit.
    pub fn edit(&self, voice: impl Into<VoiceId>, units: i32) -> Result<(), VoiceError> {
        self.send(SessionCommand::Edit {
            voice: voice.into(),
            units,
        })
    }

    /// Fetch a snapshot once every previously sent command has been handled.
    pub async fn snapshot(&self) -> Result<SessionSnapshot, VoiceError> {
        let (reply, rx) = oneshot::channel();
        self.send(SessionCommand::Snapshot(reply))?;
        rx.await.map_err(|_| VoiceError::SessionClosed)
    }

    pub fn shutdown(&self) -> Result<(), VoiceError> {
        self.send(SessionCommand::Shutdown)
    }
}

// ── Session ────────────────────────────────────────────────────────

/// Result of a background synthesis task.
struct PreviewDone {
    kind: PreviewKind,
    epoch: u64,
    result: Result<SynthesizedAudio, SynthesisError>,
}

/// The interactive blending session.
pub struct BlendSession {
    controller: InteractionController,
    registry: Arc<VoiceRegistry>,
    synthesis: Arc<dyn SynthesisGateway>,
    playback: Arc<dyn PlaybackGateway>,
    store: Option<ConfigStore>,
    text: String,
    lang: String,
    random_count: usize,
    rng: StdRng,

    /// A synthesis task is running.
    in_flight: bool,
    /// The running synthesis is an auto-preview.
    in_flight_auto: bool,
    /// User preview waiting for the running auto-preview to finish.
    queued: Option<PreviewKind>,
    /// Bumped whenever auto-preview is turned off; stale auto results are dropped.
    epoch: u64,
    done_tx: mpsc::UnboundedSender<PreviewDone>,
    done_rx: mpsc::UnboundedReceiver<PreviewDone>,
}

impl BlendSession {
    /// Create a session around `weights`/`settings` and return it together
    /// with the UI event stream.
    pub fn new(
        weights: WeightSet,
        settings: SessionSettings,
        registry: Arc<VoiceRegistry>,
        synthesis: Arc<dyn SynthesisGateway>,
        playback: Arc<dyn PlaybackGateway>,
        options: SessionOptions,
    ) -> (Self, mpsc::UnboundedReceiver<BlendEvent>) {
        let (controller, event_rx) =
            InteractionController::new(weights, settings, options.controller);
        let (done_tx, done_rx) = mpsc::unbounded_channel();
        let rng = options
            .seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);

        let session = Self {
            controller,
            registry,
            synthesis,
            playback,
            store: options.store,
            text: options.text,
            lang: options.lang,
            random_count: options.random_count,
            rng,
            in_flight: false,
            in_flight_auto: false,
            queued: None,
            epoch: 0,
            done_tx,
            done_rx,
        };

        (session, event_rx)
    }

    /// Run the session on a new task.
    pub fn spawn(self) -> (SessionHandle, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(self.run(rx));
        (SessionHandle { tx }, task)
    }

    /// Drive the session until `Shutdown` is received or every handle is
    /// dropped.
    pub async fn run(mut self, mut commands: mpsc::UnboundedReceiver<SessionCommand>) {
        tracing::info!(voices = self.registry.len(), "Blend session started");

        let period = self
            .controller
            .config()
            .preview_interval
            .max(Duration::from_millis(1));
        let mut ticker: Option<Interval> = None;

        loop {
            sync_ticker(&mut ticker, self.controller.auto_loop(), period);
            let deadline = self.controller.debounce_deadline();

            tokio::select! {
                command = commands.recv() => match command {
                    Some(SessionCommand::Shutdown) | None => break,
                    Some(command) => self.handle(command),
                },
                () = tokio::time::sleep_until(deadline.unwrap_or_else(Instant::now)),
                    if deadline.is_some() =>
                {
                    self.controller.poll(Instant::now());
                }
                () = next_tick(&mut ticker) => self.on_tick(),
                Some(done) = self.done_rx.recv() => self.on_preview_done(done),
            }
        }

        self.shutdown();
    }

    // ── Command handling ───────────────────────────────────────────

    fn handle(&mut self, command: SessionCommand) {
        match command {
            SessionCommand::Edit { voice, units } => {
                let edit = SliderEdit::user(voice, units);
                if let Err(e) = self.controller.edit(edit, Instant::now()) {
                    self.report(&e.into());
                }
            }
            SessionCommand::SetText(text) => self.text = text,
            SessionCommand::SetSpeed(speed) => self.controller.set_speed(speed),
            SessionCommand::SetColumns(columns) => self.controller.set_columns(columns),
            SessionCommand::SetNormalize(enabled) => self.controller.set_normalize(enabled),
            SessionCommand::SetAutoLoop(enabled) => self.set_auto_loop(enabled),
            SessionCommand::SetContinuous(enabled) => self.controller.set_continuous(enabled),
            SessionCommand::Reset => self.controller.reset(),
            SessionCommand::Randomize { count } => {
                let count = count.unwrap_or(self.random_count);
                self.controller.randomize(count, &mut self.rng);
            }
            SessionCommand::Refresh => match self.controller.refresh(&mut self.rng) {
                Ok(()) => self.start_preview(PreviewKind::Explicit),
                Err(e) => self.report(&e.into()),
            },
            SessionCommand::Preview => self.start_preview(PreviewKind::Explicit),
            SessionCommand::SynthesizeAndSave(path) => {
                self.set_auto_loop(false);
                self.start_preview(PreviewKind::Export(path));
            }
            SessionCommand::Save(path) => self.save(&path),
            SessionCommand::Load(path) => self.load(&path),
            SessionCommand::Snapshot(reply) => {
                let _ = reply.send(self.snapshot());
            }
            // Handled by the event loop.
            SessionCommand::Shutdown => {}
        }
    }

    fn set_auto_loop(&mut self, enabled: bool) {
        self.controller.set_auto_loop(enabled);
        if !enabled {
            self.epoch += 1;
            self.playback.stop();
        }
    }

    fn save(&mut self, path: &Path) {
        self.controller.flush();
        match config::save(path, self.controller.weights(), self.controller.settings()) {
            Ok(()) => self.controller.emit(BlendEvent::ConfigSaved(path.to_path_buf())),
            Err(e) => self.report(&e.into()),
        }
    }

    fn load(&mut self, path: &Path) {
        let catalog = Arc::clone(self.controller.weights().catalog());
        match config::load(path, &catalog) {
            Ok((weights, settings)) => {
                self.controller.replace(weights, settings);
                self.controller.emit(BlendEvent::ConfigLoaded(path.to_path_buf()));
            }
            Err(e) => self.report(&e.into()),
        }
    }

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            weights: self.controller.weights().clone(),
            settings: *self.controller.settings(),
            text: self.text.clone(),
            edit_state: self.controller.state(),
            auto_loop: self.controller.auto_loop(),
            continuous: self.controller.continuous(),
            normalization_passes: self.controller.normalization_passes(),
            preview_in_flight: self.in_flight,
        }
    }

    // ── Previews ───────────────────────────────────────────────────

    fn on_tick(&mut self) {
        let busy = self.in_flight || self.playback.is_busy();
        if self.controller.tick(busy) {
            self.start_preview(PreviewKind::Auto);
        }
    }

    /// Compile the current mix and synthesize it on a background task.
    fn start_preview(&mut self, kind: PreviewKind) {
        let auto = kind.is_auto();
        if self.in_flight {
            if !auto && self.in_flight_auto && self.queued.is_none() {
                tracing::debug!(kind = ?kind, "Preview queued behind running auto-preview");
                self.queued = Some(kind);
            } else {
                self.fail(auto, &VoiceError::PreviewInFlight);
            }
            return;
        }

        self.controller.flush();
        let request = match PreviewRequest::prepare(
            &self.text,
            self.controller.weights(),
            self.controller.settings(),
            &self.registry,
            &self.lang,
        ) {
            Ok(request) => request,
            Err(e) => {
                self.fail(auto, &e.into());
                return;
            }
        };

        self.in_flight = true;
        self.in_flight_auto = auto;
        self.controller.emit(BlendEvent::PreviewStarted { auto });

        let synthesis = Arc::clone(&self.synthesis);
        let done_tx = self.done_tx.clone();
        let epoch = self.epoch;
        tokio::spawn(async move {
            let result = request.synthesize(synthesis.as_ref()).await;
            let _ = done_tx.send(PreviewDone {
                kind,
                epoch,
                result,
            });
        });
    }

    fn on_preview_done(&mut self, done: PreviewDone) {
        self.in_flight = false;
        self.finish_preview(done);
        if let Some(kind) = self.queued.take() {
            self.start_preview(kind);
        }
    }

    fn finish_preview(&mut self, done: PreviewDone) {
        let auto = done.kind.is_auto();

        if auto && done.epoch != self.epoch {
            tracing::debug!("Discarding auto-preview finished after auto-preview was turned off");
            return;
        }

        let audio = match done.result {
            Ok(audio) => audio,
            Err(e) => {
                self.fail(auto, &e.into());
                return;
            }
        };

        if let PreviewKind::Export(path) = &done.kind {
            if let Err(e) = write_wav(path, &audio) {
                self.report(&e);
                return;
            }
            self.controller.emit(BlendEvent::AudioSaved(path.clone()));
        }

        match self.playback.play(&audio) {
            Ok(()) => self.controller.emit(BlendEvent::PreviewPlaying {
                auto,
                duration: audio.duration,
            }),
            Err(e) => self.fail(auto, &e.into()),
        }
    }

    // ── Errors & shutdown ──────────────────────────────────────────

    /// Surface a failure on explicit actions, log it for auto-previews.
    fn fail(&self, auto: bool, error: &VoiceError) {
        if auto {
            tracing::warn!(error = %error, "Auto-preview failed");
        } else {
            self.report(error);
        }
    }

    fn report(&self, error: &VoiceError) {
        tracing::warn!(error = %error, "Session action failed");
        self.controller.emit(BlendEvent::Error(error.to_string()));
    }

    fn shutdown(&mut self) {
        self.controller.flush();
        self.playback.stop();

        if let Some(store) = &self.store {
            let saved = store.save_last(self.controller.weights(), self.controller.settings());
            if let Err(e) = saved {
                tracing::warn!(error = %e, "Failed to save last configuration");
            }
        }
        tracing::info!("Blend session stopped");
    }
}

// ── Ticker helpers ─────────────────────────────────────────────────

/// Create or drop the auto-preview ticker to match `enabled`. A fresh
/// ticker first fires one full period after it is created.
fn sync_ticker(ticker: &mut Option<Interval>, enabled: bool, period: Duration) {
    match (enabled, ticker.is_some()) {
        (true, false) => {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            *ticker = Some(interval);
        }
        (false, true) => *ticker = None,
        _ => {}
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending().await,
    }
}
