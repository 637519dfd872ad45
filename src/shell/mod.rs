//! The interactive shell: view switching, the open panel, chat and the
//! information-unit selection.
//!
//! [`Shell`] owns the registry and the module loader and passes the registry
//! down by reference. At most one [`FeaturePanel`] is current; opening another
//! feature, the chat or the welcome view discards it and cancels its run.

pub mod chat;
pub mod loader;
pub mod panel;
pub mod registry;
pub mod render;
pub mod repl;
pub mod units;

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tokio::task::JoinHandle;

use emos_core::catalog::{self, generic_definition};
use emos_core::models::{FeatureDescriptor, FeatureId, UnitKind};

use crate::client::{BackendError, ProcessBackend};
use crate::config::Timings;
use chat::{ChatLog, ChatMessage, Sender};
use loader::{ModuleLoader, ModuleSource};
use panel::{FeaturePanel, InputError};
use registry::FeatureRegistry;
use units::UnitSelection;

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("no feature panel is open")]
    NoPanel,

    #[error("the chat is not open")]
    ChatClosed,

    #[error(transparent)]
    Input(#[from] InputError),

    #[error("unknown {kind} '{key}'")]
    UnknownUnit { kind: &'static str, key: String },

    #[error("{0} has no available implementation")]
    UnitUnavailable(&'static str),

    #[error("generator toggle rejected: {0}")]
    Toggle(#[from] BackendError),
}

/// The three mutually exclusive views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Welcome,
    FeatureOpen,
    ChatOpen,
}

pub struct Shell<S, B> {
    registry: FeatureRegistry,
    loader: ModuleLoader<S>,
    backend: Arc<B>,
    timings: Timings,
    rng: StdRng,
    view: View,
    current: Option<FeaturePanel>,
    pending: Option<JoinHandle<()>>,
    chat: ChatLog,
    units: UnitSelection,
}

impl<S: ModuleSource, B: ProcessBackend> Shell<S, B> {
    pub fn new(registry: FeatureRegistry, source: S, backend: B, timings: Timings) -> Self {
        Self {
            registry,
            loader: ModuleLoader::new(source),
            backend: Arc::new(backend),
            timings,
            rng: StdRng::from_entropy(),
            view: View::Welcome,
            current: None,
            pending: None,
            chat: ChatLog::default(),
            units: UnitSelection::new(),
        }
    }

    /// Seed the generator behind mocks and chat replies.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn with_units(mut self, units: UnitSelection) -> Self {
        self.units = units;
        self
    }

    // ============================================================
    // Accessors
    // ============================================================

    pub fn view(&self) -> View {
        self.view
    }

    pub fn registry(&self) -> &FeatureRegistry {
        &self.registry
    }

    pub fn loader(&self) -> &ModuleLoader<S> {
        &self.loader
    }

    pub fn current(&self) -> Option<&FeaturePanel> {
        self.current.as_ref()
    }

    pub fn chat(&self) -> &ChatLog {
        &self.chat
    }

    pub fn units(&self) -> &UnitSelection {
        &self.units
    }

    fn panel(&self) -> Result<&FeaturePanel, ShellError> {
        self.current.as_ref().ok_or(ShellError::NoPanel)
    }

    // ============================================================
    // View transitions
    // ============================================================

    fn discard_panel(&mut self) {
        if let Some(panel) = self.current.take() {
            tracing::debug!(feature = %panel.id(), "Discarding panel");
            panel.cancel();
        }
        self.pending = None;
    }

    /// Open the registered feature `id`, or the generic panel for unknown ids.
    pub async fn open_feature(&mut self, id: FeatureId) -> &FeaturePanel {
        let descriptor = self.registry.descriptor(id);
        self.select_feature(descriptor).await
    }

    /// Open a feature with the name and description the caller shows for it.
    ///
    /// Known ids get their module; unknown ids and failed loads get the
    /// generic panel built from `descriptor`.
    pub async fn select_feature(&mut self, descriptor: FeatureDescriptor) -> &FeaturePanel {
        self.discard_panel();

        let id = descriptor.id;
        let panel = match self.loader.resolve(&self.registry, descriptor.clone()).await {
            Ok(Some(definition)) => FeaturePanel::new(definition, false),
            Ok(None) => {
                tracing::debug!(feature = %id, "No module registered, using generic panel");
                FeaturePanel::new(generic_definition(descriptor), true)
            }
            Err(e) => {
                tracing::warn!(feature = %id, "Module load failed, using generic panel: {}", e);
                FeaturePanel::new(generic_definition(descriptor), true)
            }
        };

        self.view = View::FeatureOpen;
        self.current.insert(panel)
    }

    pub fn open_chat(&mut self) {
        self.discard_panel();
        self.view = View::ChatOpen;
    }

    /// Back to the welcome view from anywhere.
    pub fn close(&mut self) {
        self.discard_panel();
        self.view = View::Welcome;
    }

    // ============================================================
    // Panel
    // ============================================================

    pub fn set_input(&mut self, key: &str, raw: &str) -> Result<(), ShellError> {
        self.panel()?.set_input(key, raw)?;
        Ok(())
    }

    /// Trigger processing on the open panel. `Ok(false)` when a run is
    /// already going.
    pub fn start_processing(&mut self) -> Result<bool, ShellError> {
        let panel = self.current.as_ref().ok_or(ShellError::NoPanel)?;
        if panel.is_processing() {
            tracing::debug!(feature = %panel.id(), "Run already in progress, ignoring trigger");
            return Ok(false);
        }
        let seed = self.rng.gen();
        let started = panel.start(
            Arc::clone(&self.backend),
            self.units.auxiliary_inputs(),
            self.timings.clone(),
            StdRng::seed_from_u64(seed),
        );
        match started {
            Some(handle) => {
                self.pending = Some(handle);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Wait until the pending run has written its results and reset its
    /// progress indicator.
    pub async fn wait_for_processing(&mut self) {
        if let Some(handle) = self.pending.take() {
            if let Err(e) = handle.await {
                tracing::error!("Processing task failed: {}", e);
            }
        }
    }

    // ============================================================
    // Information units
    // ============================================================

    /// Flip a unit's selection and answer its new state.
    ///
    /// Generator toggles are confirmed with the backend; when the backend
    /// rejects one the selection is put back and the error returned.
    pub async fn toggle_unit(&mut self, kind: UnitKind, key: &str) -> Result<bool, ShellError> {
        let unit = catalog::unit(kind, key).ok_or_else(|| ShellError::UnknownUnit {
            kind: kind.as_str(),
            key: key.to_string(),
        })?;
        if !unit.available {
            return Err(ShellError::UnitUnavailable(unit.label));
        }

        let active = !self.units.is_active(kind, unit.key);
        self.units.set(unit, active);

        if kind == UnitKind::Generator {
            match self.backend.toggle_generator(unit.key, active).await {
                Ok(message) => tracing::info!("{}", message),
                Err(e) => {
                    tracing::warn!("Generator toggle for {} rejected: {}", unit.key, e);
                    self.units.set(unit, !active);
                    return Err(e.into());
                }
            }
        }
        Ok(active)
    }

    // ============================================================
    // Chat
    // ============================================================

    /// Post a message and wait for the canned reply. Blank messages are
    /// ignored and answer `None`.
    pub async fn send_chat(&mut self, text: &str) -> Result<Option<&ChatMessage>, ShellError> {
        if self.view != View::ChatOpen {
            return Err(ShellError::ChatClosed);
        }
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }

        self.chat.push(Sender::User, text);
        tokio::time::sleep(self.timings.chat_reply_delay()).await;
        let reply = chat::reply_for(text, &mut self.rng);
        Ok(Some(self.chat.push(Sender::Assistant, reply)))
    }

    /// Text rendering of the current view.
    pub fn render(&self) -> String {
        match self.view {
            View::Welcome => render::welcome(&self.registry, &self.units),
            View::FeatureOpen => match &self.current {
                Some(panel) => render::panel(panel),
                None => render::welcome(&self.registry, &self.units),
            },
            View::ChatOpen => render::chat(&self.chat),
        }
    }
}
