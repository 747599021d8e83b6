//! Interactive runtime for voxblend.
//!
//! - [`controller`]: debounced slider edits, normalization passes and
//!   auto-preview gating (synchronous, clock passed in)
//! - [`session`]: the async event loop driving the controller, preview
//!   synthesis and playback
//! - [`audio_thread`] / [`playback`]: `rodio` output confined to its own
//!   OS thread
//! - [`registry`]: Kokoro `.npz` voice pack loading
//! - [`wav`]: WAV export
//!
//! No speech engine or front end ships with this crate. A front end wires a
//! [`BlendSession`] to its own [`SynthesisGateway`] and, for local audio, a
//! [`LocalPlayback`], then forwards user input as [`SessionCommand`]s and
//! renders the [`BlendEvent`] stream. The `voxblend` CLI only uses the
//! [`InteractionController`] and [`load_npz`] directly.
//!
//! [`SynthesisGateway`]: voxblend_core::SynthesisGateway

#![deny(unused_crate_dependencies)]

pub mod audio_thread;
pub mod controller;
pub mod error;
pub mod playback;
pub mod preview;
pub mod registry;
pub mod session;
pub mod wav;

// Re-export key types for convenience
pub use audio_thread::LocalPlayback;
pub use controller::{
    BlendEvent, ControllerConfig, DEFAULT_DEBOUNCE, DEFAULT_PREVIEW_INTERVAL, EditSource,
    EditState, InteractionController, SliderEdit,
};
pub use error::VoiceError;
pub use preview::{PreviewKind, PreviewRequest};
pub use registry::{load_npz, missing_voices};
pub use session::{BlendSession, SessionCommand, SessionHandle, SessionOptions, SessionSnapshot};
pub use wav::write_wav;

// Fake synthesis gateways live in the integration tests.
#[cfg(test)]
use async_trait as _;
