//! CLI bootstrap - the composition root.
//!
//! Resolves the configuration directory, restores the last-used mix and
//! wraps it in an [`InteractionController`]. Handlers only ever touch the
//! mix through the controller; [`CliContext::persist`] writes it back.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc::UnboundedReceiver;
use voxblend_core::{ConfigStore, VoiceCatalog};
use voxblend_voice::{BlendEvent, ControllerConfig, InteractionController};

use crate::error::CliError;

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Explicit configuration directory; resolved from the environment or
    /// the platform config dir when `None`.
    pub config_dir: Option<PathBuf>,
}

/// Restored session plus the store it came from.
pub struct CliContext {
    pub store: ConfigStore,
    pub catalog: Arc<VoiceCatalog>,
    pub controller: InteractionController,
    events: UnboundedReceiver<BlendEvent>,
}

impl CliContext {
    /// Log controller events raised since the last call.
    pub fn drain_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            match event {
                BlendEvent::LabelsChanged(_) => {}
                other => tracing::debug!(event = ?other, "Controller event"),
            }
        }
    }

    /// Commit any pending edit and save the mix as the last-used document.
    pub fn persist(&mut self) -> Result<(), CliError> {
        self.controller.flush();
        self.drain_events();
        self.store
            .save_last(self.controller.weights(), self.controller.settings())?;
        Ok(())
    }
}

/// Bootstrap the CLI: resolve the store and restore the last-used mix.
pub fn bootstrap(config: CliConfig) -> Result<CliContext, CliError> {
    let store = match config.config_dir {
        Some(dir) => ConfigStore::new(dir),
        None => ConfigStore::resolve()?,
    };
    tracing::debug!(dir = %store.dir().display(), "Using configuration directory");

    let catalog = Arc::new(VoiceCatalog::kokoro_v1());
    let (weights, settings) = store.restore_last(&catalog);
    let (controller, events) =
        InteractionController::new(weights, settings, ControllerConfig::default());

    Ok(CliContext {
        store,
        catalog,
        controller,
        events,
    })
}
