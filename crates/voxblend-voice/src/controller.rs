//! Interaction controller: the edit state machine in front of the weights.
//!
//! The controller exclusively owns the session's [`WeightSet`] and
//! [`SessionSettings`]. Raw slider edits are debounced: each user edit
//! writes the new slider value immediately and (re)arms a deadline
//! `debounce` in the future; only when the deadline passes without further
//! edits is a single normalization pass run, pivoting on the most recently
//! edited voice.
//!
//! ```text
//!            edit(User)                   poll(now >= deadline)
//!   Idle ───────────────▶ Pending ───────────────────────────▶ Idle
//!                          │   ▲       normalize + labels
//!                          └───┘
//!                        edit(User): re-arm, latest pivot wins
//! ```
//!
//! The controller is clock-agnostic: callers pass the current
//! [`Instant`] in and drive [`poll`](InteractionController::poll) from
//! whatever timer they own (see [`crate::session`]).
//!
//! Edits tagged [`EditSource::Programmatic`] write through without arming
//! the debounce, so writes made on behalf of the controller never feed back
//! into another normalization pass.

use std::time::Duration;

use rand::Rng;
use tokio::sync::mpsc;
use tokio::time::Instant;
use voxblend_core::{
    BlendError, Pivot, SessionSettings, VoiceId, VoiceLabel, WeightSet, labels, normalize,
};

/// Quiet period before a slider edit is committed.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(100);

/// Period of the auto-preview ticker.
pub const DEFAULT_PREVIEW_INTERVAL: Duration = Duration::from_millis(2000);

// ── Events ─────────────────────────────────────────────────────────

/// Events emitted by the controller and session to the UI layer.
#[derive(Debug, Clone, PartialEq)]
pub enum BlendEvent {
    /// Slider labels must be redrawn.
    LabelsChanged(Vec<VoiceLabel>),

    /// A normalization pass ran (`pivot == None` for a rescale).
    Normalized { pivot: Option<VoiceId> },

    /// Speed, layout or normalization flag changed.
    SettingsChanged(SessionSettings),

    /// Auto-preview mode changed.
    AutoLoopChanged { enabled: bool, continuous: bool },

    /// A preview synthesis was started.
    PreviewStarted { auto: bool },

    /// Synthesized audio started playing.
    PreviewPlaying { auto: bool, duration: Duration },

    /// Synthesized audio was written to disk.
    AudioSaved(std::path::PathBuf),

    /// A session document was written.
    ConfigSaved(std::path::PathBuf),

    /// A session document was loaded.
    ConfigLoaded(std::path::PathBuf),

    /// A user-initiated action failed.
    Error(String),
}

// ── Edits ──────────────────────────────────────────────────────────

/// Where a slider write came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditSource {
    /// The user moved a slider; subject to debounce and normalization.
    User,
    /// Written on the controller's behalf; never triggers normalization.
    Programmatic,
}

/// A raw slider write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliderEdit {
    pub voice: VoiceId,
    /// Slider value; clamped to `0..=100` when applied.
    pub units: i32,
    pub source: EditSource,
}

impl SliderEdit {
    pub fn user(voice: impl Into<VoiceId>, units: i32) -> Self {
        Self {
            voice: voice.into(),
            units,
            source: EditSource::User,
        }
    }

    pub fn programmatic(voice: impl Into<VoiceId>, units: i32) -> Self {
        Self {
            voice: voice.into(),
            units,
            source: EditSource::Programmatic,
        }
    }
}

/// Debounce state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditState {
    Idle,
    Pending,
}

#[derive(Debug, Clone)]
struct PendingEdit {
    voice: VoiceId,
    deadline: Instant,
}

// ── Configuration ──────────────────────────────────────────────────

/// Timer configuration for the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Quiet period before an edit is committed.
    pub debounce: Duration,

    /// Period of the auto-preview ticker.
    pub preview_interval: Duration,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            preview_interval: DEFAULT_PREVIEW_INTERVAL,
        }
    }
}

// ── Controller ─────────────────────────────────────────────────────

/// Debounced, normalizing front end to a [`WeightSet`].
pub struct InteractionController {
    weights: WeightSet,
    settings: SessionSettings,
    config: ControllerConfig,
    pending: Option<PendingEdit>,

    /// Weights changed since the last auto-preview.
    dirty: bool,
    auto_loop: bool,
    continuous: bool,

    passes: u64,
    event_tx: mpsc::UnboundedSender<BlendEvent>,
}

impl InteractionController {
    /// Create a controller owning `weights` and `settings`.
    ///
    /// When normalization is enabled the weights are rescaled once up front,
    /// as they are after loading a document.
    pub fn new(
        weights: WeightSet,
        settings: SessionSettings,
        config: ControllerConfig,
    ) -> (Self, mpsc::UnboundedReceiver<BlendEvent>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let settings = settings.sanitized();
        let weights = if settings.normalize {
            normalize(&weights, None)
        } else {
            weights
        };

        let controller = Self {
            weights,
            settings,
            config,
            pending: None,
            dirty: false,
            auto_loop: false,
            continuous: false,
            passes: 0,
            event_tx,
        };

        (controller, event_rx)
    }

    pub const fn weights(&self) -> &WeightSet {
        &self.weights
    }

    pub const fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub const fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub const fn state(&self) -> EditState {
        if self.pending.is_some() {
            EditState::Pending
        } else {
            EditState::Idle
        }
    }

    /// When the pending edit will be committed, if any.
    pub fn debounce_deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    /// Number of normalization passes run so far.
    pub const fn normalization_passes(&self) -> u64 {
        self.passes
    }

    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub const fn auto_loop(&self) -> bool {
        self.auto_loop
    }

    pub const fn continuous(&self) -> bool {
        self.continuous
    }

    /// Current slider labels.
    pub fn labels(&self) -> Vec<VoiceLabel> {
        labels(&self.weights, self.settings.columns)
    }

    // ── Edits ──────────────────────────────────────────────────────

    /// Apply a raw slider write.
    ///
    /// Unknown voices fail with [`BlendError::UnknownVoice`] and leave the
    /// controller untouched.
    pub fn edit(&mut self, edit: SliderEdit, now: Instant) -> Result<(), BlendError> {
        self.weights.set_weight(edit.voice.as_str(), edit.units)?;

        match edit.source {
            EditSource::User => {
                let deadline = now + self.config.debounce;
                tracing::trace!(voice = %edit.voice, units = edit.units, "Slider edit pending");
                self.pending = Some(PendingEdit {
                    voice: edit.voice,
                    deadline,
                });
            }
            EditSource::Programmatic => self.refresh_labels(),
        }
        Ok(())
    }

    /// Commit the pending edit if its deadline has passed.
    ///
    /// Returns whether an edit was committed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match &self.pending {
            Some(pending) if pending.deadline <= now => self.flush(),
            _ => false,
        }
    }

    /// Commit the pending edit immediately, regardless of its deadline.
    pub fn flush(&mut self) -> bool {
        let Some(pending) = self.pending.take() else {
            return false;
        };

        if self.settings.normalize {
            if let Some(units) = self.weights.weight(pending.voice.as_str()) {
                let pivot = Pivot::from_units(pending.voice, units);
                self.apply_normalize(Some(&pivot));
            }
        }
        self.refresh_labels();
        true
    }

    // ── Bulk operations ────────────────────────────────────────────

    /// Zero every slider.
    pub fn reset(&mut self) {
        self.pending = None;
        self.weights.reset_all();
        self.refresh_labels();
    }

    /// Replace the mix with `count` random voices.
    pub fn randomize<R: Rng + ?Sized>(&mut self, count: usize, rng: &mut R) {
        self.pending = None;
        voxblend_core::randomize(&mut self.weights, count, self.settings.normalize, rng);
        self.apply_normalize(None);
        self.refresh_labels();
    }

    /// Redraw the weights of the currently active voices.
    pub fn refresh<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), BlendError> {
        self.flush();
        voxblend_core::refresh(&mut self.weights, self.settings.normalize, rng)?;
        self.apply_normalize(None);
        self.refresh_labels();
        Ok(())
    }

    /// Swap in a loaded session.
    pub fn replace(&mut self, weights: WeightSet, settings: SessionSettings) {
        self.pending = None;
        self.weights = weights;
        self.settings = settings.sanitized();
        self.apply_normalize(None);
        self.emit(BlendEvent::SettingsChanged(self.settings));
        self.refresh_labels();
    }

    // ── Settings ───────────────────────────────────────────────────

    /// Toggle normalization. Turning it on rescales the current mix.
    pub fn set_normalize(&mut self, enabled: bool) {
        self.settings.normalize = enabled;
        self.apply_normalize(None);
        self.emit(BlendEvent::SettingsChanged(self.settings));
        self.refresh_labels();
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.settings.set_speed(speed);
        self.emit(BlendEvent::SettingsChanged(self.settings));
    }

    /// Change the grid width; labels are re-laid out.
    pub fn set_columns(&mut self, columns: u32) {
        self.settings.set_columns(columns);
        self.emit(BlendEvent::SettingsChanged(self.settings));
        self.emit(BlendEvent::LabelsChanged(self.labels()));
    }

    // ── Auto-preview gating ────────────────────────────────────────

    /// Turn auto-preview on or off. Turning it off also clears continuous
    /// mode; turning it on forces a preview on the next tick.
    pub fn set_auto_loop(&mut self, enabled: bool) {
        self.auto_loop = enabled;
        if enabled {
            self.dirty = true;
        } else {
            self.continuous = false;
        }
        tracing::debug!(enabled, "Auto-preview toggled");
        self.emit_loop_state();
    }

    /// Preview on every tick, not only after changes. Ignored while
    /// auto-preview is off.
    pub fn set_continuous(&mut self, enabled: bool) {
        self.continuous = enabled && self.auto_loop;
        self.emit_loop_state();
    }

    /// Decide whether an auto-preview tick should fire.
    ///
    /// Fires when auto-preview is on, there is something to play (continuous
    /// mode or changes since the last preview) and nothing is playing. A
    /// firing tick clears the dirty flag.
    pub fn tick(&mut self, playback_busy: bool) -> bool {
        if !self.auto_loop || (!self.continuous && !self.dirty) {
            return false;
        }
        if playback_busy {
            tracing::trace!("Auto-preview deferred, playback busy");
            return false;
        }
        self.dirty = false;
        true
    }

    // ── Internal helpers ───────────────────────────────────────────

    /// Run a normalization pass if normalization is enabled.
    fn apply_normalize(&mut self, pivot: Option<&Pivot>) {
        if !self.settings.normalize {
            return;
        }
        self.weights = normalize(&self.weights, pivot);
        self.passes += 1;
        tracing::debug!(
            pivot = pivot.map(|p| p.voice.as_str()),
            sum = self.weights.sum(),
            "Normalization pass"
        );
        self.emit(BlendEvent::Normalized {
            pivot: pivot.map(|p| p.voice.clone()),
        });
    }

    fn refresh_labels(&mut self) {
        self.dirty = true;
        self.emit(BlendEvent::LabelsChanged(self.labels()));
    }

    fn emit_loop_state(&self) {
        self.emit(BlendEvent::AutoLoopChanged {
            enabled: self.auto_loop,
            continuous: self.continuous,
        });
    }

    /// Emit an event (best-effort; the receiver may have been dropped).
    pub(crate) fn emit(&self, event: BlendEvent) {
        if self.event_tx.send(event).is_err() {
            tracing::trace!("Blend event receiver dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use voxblend_core::VoiceCatalog;

    use super::*;

    type Events = mpsc::UnboundedReceiver<BlendEvent>;

    fn controller(values: &[(&str, i32)]) -> (InteractionController, Events) {
        let catalog = Arc::new(VoiceCatalog::new(["a", "b", "c"]).unwrap());
        let mut weights = WeightSet::new(catalog);
        for (voice, value) in values {
            weights.set_weight(voice, *value).unwrap();
        }
        InteractionController::new(
            weights,
            SessionSettings::default(),
            ControllerConfig::default(),
        )
    }

    fn drain(rx: &mut Events) -> Vec<BlendEvent> {
        let mut events = Vec::new();
        while let Ok(e) = rx.try_recv() {
            events.push(e);
        }
        events
    }

    fn units(controller: &InteractionController) -> Vec<u8> {
        controller.weights().iter().map(|(_, u)| u).collect()
    }

    #[test]
    fn new_rescales_when_normalizing() {
        let (controller, _rx) = controller(&[("a", 40), ("b", 20)]);
        assert_eq!(units(&controller), [67, 33, 0]);
        assert_eq!(controller.state(), EditState::Idle);
    }

    #[test]
    fn edit_is_pending_until_deadline() {
        let (mut controller, _rx) = controller(&[("a", 50), ("b", 50)]);
        let t0 = Instant::now();

        controller.edit(SliderEdit::user("a", 20), t0).unwrap();
        assert_eq!(controller.state(), EditState::Pending);
        assert_eq!(controller.debounce_deadline(), Some(t0 + DEFAULT_DEBOUNCE));
        // Raw value shows immediately, but nothing is normalized yet.
        assert_eq!(units(&controller), [20, 50, 0]);

        assert!(!controller.poll(t0 + Duration::from_millis(99)));
        assert!(controller.poll(t0 + DEFAULT_DEBOUNCE));
        assert_eq!(units(&controller), [20, 80, 0]);
        assert_eq!(controller.state(), EditState::Idle);
    }

    #[test]
    fn rapid_edits_coalesce_into_one_pass() {
        let (mut controller, mut rx) = controller(&[("a", 50), ("b", 50)]);
        let passes_before = controller.normalization_passes();
        drain(&mut rx);

        let t0 = Instant::now();
        controller.edit(SliderEdit::user("a", 10), t0).unwrap();
        controller
            .edit(SliderEdit::user("a", 30), t0 + Duration::from_millis(40))
            .unwrap();
        controller
            .edit(SliderEdit::user("a", 70), t0 + Duration::from_millis(80))
            .unwrap();

        // The deadline was re-armed by the last edit.
        assert!(!controller.poll(t0 + Duration::from_millis(150)));
        assert!(controller.poll(t0 + Duration::from_millis(180)));

        assert_eq!(controller.normalization_passes(), passes_before + 1);
        assert_eq!(units(&controller), [70, 30, 0]);
        let normalized: Vec<_> = drain(&mut rx)
            .into_iter()
            .filter(|e| matches!(e, BlendEvent::Normalized { .. }))
            .collect();
        assert_eq!(
            normalized,
            [BlendEvent::Normalized {
                pivot: Some("a".into())
            }]
        );
    }

    #[test]
    fn programmatic_edits_never_normalize() {
        let (mut controller, _rx) = controller(&[("a", 50), ("b", 50)]);
        let passes = controller.normalization_passes();

        controller
            .edit(SliderEdit::programmatic("c", 40), Instant::now())
            .unwrap();
        assert_eq!(controller.state(), EditState::Idle);
        assert_eq!(controller.normalization_passes(), passes);
        assert_eq!(units(&controller), [50, 50, 40]);
    }

    #[test]
    fn unknown_voice_is_rejected_without_state_change() {
        let (mut controller, _rx) = controller(&[("a", 100)]);
        let err = controller
            .edit(SliderEdit::user("zz", 10), Instant::now())
            .unwrap_err();
        assert_eq!(err, BlendError::UnknownVoice("zz".into()));
        assert_eq!(controller.state(), EditState::Idle);
    }

    #[test]
    fn edits_without_normalization_only_refresh_labels() {
        let (mut controller, mut rx) = controller(&[]);
        controller.set_normalize(false);
        drain(&mut rx);

        let t0 = Instant::now();
        controller.edit(SliderEdit::user("a", 40), t0).unwrap();
        controller.edit(SliderEdit::user("b", 20), t0).unwrap();
        assert!(controller.flush());

        assert_eq!(units(&controller), [40, 20, 0]);
        let events = drain(&mut rx);
        assert!(!events.iter().any(|e| matches!(e, BlendEvent::Normalized { .. })));
        assert!(events.iter().any(|e| matches!(e, BlendEvent::LabelsChanged(_))));
    }

    #[test]
    fn enabling_normalization_rescales() {
        let (mut controller, _rx) = controller(&[]);
        controller.set_normalize(false);
        let t0 = Instant::now();
        controller.edit(SliderEdit::user("a", 40), t0).unwrap();
        controller.edit(SliderEdit::user("b", 20), t0).unwrap();
        controller.flush();

        controller.set_normalize(true);
        assert_eq!(units(&controller), [67, 33, 0]);
    }

    #[test]
    fn randomize_produces_a_normalized_mix() {
        let catalog = Arc::new(VoiceCatalog::kokoro_v1());
        let (mut controller, _rx) = InteractionController::new(
            WeightSet::new(catalog),
            SessionSettings::default(),
            ControllerConfig::default(),
        );
        controller.randomize(10, &mut StdRng::seed_from_u64(11));
        assert_eq!(controller.weights().total_units(), 100);
        assert!(controller.weights().active_voices().len() <= 10);
    }

    #[test]
    fn refresh_requires_active_voices() {
        let (mut controller, _rx) = controller(&[]);
        let err = controller.refresh(&mut StdRng::seed_from_u64(0)).unwrap_err();
        assert_eq!(err, BlendError::NoActiveVoice);
    }

    #[test]
    fn reset_discards_pending_edit() {
        let (mut controller, _rx) = controller(&[("a", 100)]);
        controller.edit(SliderEdit::user("b", 30), Instant::now()).unwrap();
        controller.reset();
        assert_eq!(controller.state(), EditState::Idle);
        assert!(controller.weights().is_all_zero());
    }

    #[test]
    fn tick_requires_auto_loop_and_changes() {
        let (mut controller, _rx) = controller(&[("a", 100)]);
        assert!(!controller.tick(false));

        controller.set_auto_loop(true);
        assert!(controller.tick(false));
        // Nothing changed since.
        assert!(!controller.tick(false));

        controller.edit(SliderEdit::user("b", 30), Instant::now()).unwrap();
        controller.flush();
        assert!(!controller.tick(true), "busy playback defers the tick");
        assert!(controller.tick(false));
    }

    #[test]
    fn continuous_mode_fires_every_tick() {
        let (mut controller, _rx) = controller(&[("a", 100)]);
        controller.set_continuous(true);
        assert!(!controller.continuous(), "ignored while auto-loop is off");

        controller.set_auto_loop(true);
        controller.set_continuous(true);
        assert!(controller.tick(false));
        assert!(controller.tick(false));

        controller.set_auto_loop(false);
        assert!(!controller.continuous());
        assert!(!controller.tick(false));
    }

    #[test]
    fn columns_change_relayouts_labels() {
        let (mut controller, mut rx) = controller(&[]);
        controller.set_columns(2);
        let labels = drain(&mut rx)
            .into_iter()
            .find_map(|e| match e {
                BlendEvent::LabelsChanged(labels) => Some(labels),
                _ => None,
            })
            .unwrap();
        assert_eq!((labels[2].row, labels[2].column), (1, 0));
    }
}
