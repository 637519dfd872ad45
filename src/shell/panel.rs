//! The open feature panel and its processing lifecycle.
//!
//! A run goes `Idle -> Running -> {Succeeded, Failed} -> Idle`. It is spawned
//! onto the runtime and writes back into the shared [`PanelState`]; every
//! write checks the panel's cancellation token first, so a run outliving its
//! panel never touches it.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use rand::rngs::StdRng;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;
use uuid::Uuid;

use emos_core::catalog::{FeatureDefinition, GENERIC_RESULT_KEYS};
use emos_core::models::*;

use crate::client::ProcessBackend;
use crate::config::Timings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Idle,
    Running,
    Succeeded,
    Failed,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        }
    }
}

/// Where the results on display came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultSource {
    Backend,
    Local,
}

impl ResultSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Backend => "backend",
            Self::Local => "local",
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("unknown input '{0}'")]
    Unknown(String),

    #[error("invalid value for {label}: {reason}")]
    Invalid { label: String, reason: String },
}

/// Everything a panel shows, shared with its running task.
#[derive(Debug, Clone)]
pub struct PanelState {
    pub status: RunStatus,
    pub is_processing: bool,
    pub inputs: PanelInputs,
    pub result: Option<ProcessingResult>,
    pub source: Option<ResultSource>,
    pub logs: Vec<LogLine>,
    /// 0..=100
    pub progress: u8,
    pub progress_text: String,
    generation: u64,
}

impl PanelState {
    fn new(inputs: PanelInputs) -> Self {
        Self {
            status: RunStatus::Idle,
            is_processing: false,
            inputs,
            result: None,
            source: None,
            logs: Vec::new(),
            progress: 0,
            progress_text: String::new(),
            generation: 0,
        }
    }
}

/// An open feature panel. Dropping or cancelling it stops its pending run.
#[derive(Debug)]
pub struct FeaturePanel {
    definition: Arc<FeatureDefinition>,
    generic: bool,
    state: Arc<Mutex<PanelState>>,
    cancel: CancellationToken,
}

impl FeaturePanel {
    pub fn new(definition: FeatureDefinition, generic: bool) -> Self {
        let state = PanelState::new(definition.default_inputs());
        Self {
            definition: Arc::new(definition),
            generic,
            state: Arc::new(Mutex::new(state)),
            cancel: CancellationToken::new(),
        }
    }

    pub fn definition(&self) -> &FeatureDefinition {
        &self.definition
    }

    pub fn id(&self) -> FeatureId {
        self.definition.id()
    }

    /// Whether this is the data-only fallback panel.
    pub fn is_generic(&self) -> bool {
        self.generic
    }

    fn lock(&self) -> MutexGuard<'_, PanelState> {
        self.state.lock().expect("panel state lock poisoned")
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> PanelState {
        self.lock().clone()
    }

    pub fn status(&self) -> RunStatus {
        self.lock().status
    }

    pub fn is_processing(&self) -> bool {
        self.lock().is_processing
    }

    pub fn result(&self) -> Option<ProcessingResult> {
        self.lock().result.clone()
    }

    /// Parse `raw` for the field `key` and store it.
    pub fn set_input(&self, key: &str, raw: &str) -> Result<(), InputError> {
        let field = self
            .definition
            .inputs
            .iter()
            .find(|f| f.key.eq_ignore_ascii_case(key))
            .ok_or_else(|| InputError::Unknown(key.to_string()))?;
        let value = field.parse_value(raw).map_err(|reason| InputError::Invalid {
            label: field.label.to_string(),
            reason,
        })?;
        self.lock().inputs.insert(field.key, value);
        Ok(())
    }

    /// Stop the pending run, if any. Idempotent.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Start a run. `None` when a run is already in progress.
    ///
    /// `auxiliary` is merged over the panel inputs before submitting.
    pub fn start<B: ProcessBackend>(
        &self,
        backend: Arc<B>,
        auxiliary: PanelInputs,
        timings: Timings,
        rng: StdRng,
    ) -> Option<JoinHandle<()>> {
        let mut state = self.lock();
        if state.is_processing {
            tracing::debug!(feature = %self.id(), "Run already in progress, ignoring trigger");
            return None;
        }

        state.generation += 1;
        state.is_processing = true;
        state.status = RunStatus::Running;
        state.result = None;
        state.source = None;
        state.logs.clear();
        state.progress = 10;
        state.progress_text = format!("Processing {}...", self.definition.descriptor.name);

        let mut inputs = state.inputs.clone();
        for (key, value) in auxiliary.iter() {
            inputs.insert(key.clone(), value.clone());
        }

        let run = Run {
            generation: state.generation,
            state: Arc::clone(&self.state),
            definition: Arc::clone(&self.definition),
            backend,
            inputs,
            timings,
            rng,
            cancel: self.cancel.clone(),
        };
        drop(state);

        let span = tracing::info_span!("run", feature = %self.id(), run_id = %Uuid::new_v4());
        let generic = self.generic;
        Some(tokio::spawn(
            async move {
                tracing::info!(generic, "Run started");
                if generic {
                    run.reveal_staged().await
                } else {
                    run.process().await
                }
            }
            .instrument(span),
        ))
    }
}

impl Drop for FeaturePanel {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

struct Run<B> {
    generation: u64,
    state: Arc<Mutex<PanelState>>,
    definition: Arc<FeatureDefinition>,
    backend: Arc<B>,
    inputs: PanelInputs,
    timings: Timings,
    rng: StdRng,
    cancel: CancellationToken,
}

impl<B: ProcessBackend> Run<B> {
    /// Apply `f` unless the panel was discarded or a newer run started.
    fn update(&self, f: impl FnOnce(&mut PanelState)) -> bool {
        let mut state = self.state.lock().expect("panel state lock poisoned");
        if self.cancel.is_cancelled() || state.generation != self.generation {
            return false;
        }
        f(&mut state);
        true
    }

    /// `false` when cancelled before the delay elapsed.
    async fn sleep(&self, delay: Duration) -> bool {
        tokio::select! {
            _ = self.cancel.cancelled() => false,
            _ = tokio::time::sleep(delay) => true,
        }
    }

    async fn process(mut self) {
        let id = self.definition.id();

        let remote = tokio::select! {
            _ = self.cancel.cancelled() => return,
            response = self.backend.submit(id, &self.inputs) => response,
        };

        let outcome = match remote {
            Ok(response) => {
                tracing::info!(feature = %id, "Backend answered");
                let (results, logs) = response.into_parts();
                Ok((results, logs, ResultSource::Backend))
            }
            Err(e) => {
                tracing::warn!(feature = %id, "Backend failed, using local results: {}", e);
                self.update(|s| {
                    s.progress = 50;
                    s.progress_text = "Backend unavailable, computing locally...".to_string();
                });
                if !self.sleep(self.timings.fallback_delay()).await {
                    return;
                }
                self.definition
                    .compute(&self.inputs, &mut self.rng)
                    .map(|results| (results, Vec::new(), ResultSource::Local))
            }
        };

        let written = self.update(|s| {
            match outcome {
                Ok((results, logs, source)) => {
                    s.logs.extend(logs);
                    s.result = Some(ProcessingResult::Fields(results));
                    s.source = Some(source);
                    s.status = RunStatus::Succeeded;
                    s.progress_text = "Complete".to_string();
                }
                Err(e) => {
                    tracing::error!(feature = %id, "Processing failed: {}", e);
                    s.result = Some(ProcessingResult::Error(e.to_string()));
                    s.status = RunStatus::Failed;
                    s.progress_text = "Failed".to_string();
                }
            }
            s.progress = 100;
            s.is_processing = false;
        });
        if written {
            self.finish().await;
        }
    }

    /// Data-only panels never call the backend; their results appear one by
    /// one.
    async fn reveal_staged(mut self) {
        let results = match self.definition.compute(&self.inputs, &mut self.rng) {
            Ok(results) => results,
            Err(e) => {
                self.update(|s| {
                    s.result = Some(ProcessingResult::Error(e.to_string()));
                    s.status = RunStatus::Failed;
                    s.is_processing = false;
                });
                self.finish().await;
                return;
            }
        };

        self.update(|s| s.result = Some(ProcessingResult::Fields(ResultFields::new())));
        let stages = GENERIC_RESULT_KEYS.len();
        for (i, (key, delay)) in GENERIC_RESULT_KEYS
            .iter()
            .zip(self.timings.reveal_delays())
            .enumerate()
        {
            if !self.sleep(delay).await {
                return;
            }
            let value = results.get(*key).cloned().unwrap_or_default();
            self.update(|s| {
                if let Some(ProcessingResult::Fields(fields)) = &mut s.result {
                    fields.insert(key.to_string(), value);
                }
                s.progress = ((i + 1) * 100 / stages) as u8;
            });
        }

        let written = self.update(|s| {
            s.status = RunStatus::Succeeded;
            s.source = Some(ResultSource::Local);
            s.progress_text = "Complete".to_string();
            s.is_processing = false;
        });
        if written {
            self.finish().await;
        }
    }

    /// Reset the progress indicator after the post-run delay.
    async fn finish(&self) {
        if !self.sleep(self.timings.reset_delay()).await {
            return;
        }
        self.update(|s| {
            s.status = RunStatus::Idle;
            s.progress = 0;
            s.progress_text.clear();
        });
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;
    use crate::client::{BackendError, Offline};
    use emos_core::catalog::{self, generic_definition};

    struct Answering;

    impl ProcessBackend for Answering {
        async fn submit(
            &self,
            _: FeatureId,
            inputs: &PanelInputs,
        ) -> Result<ProcessResponse, BackendError> {
            let mut results = ResultFields::new();
            results.insert("echo".into(), inputs.len().to_string());
            Ok(ProcessResponse::Detailed {
                results,
                logs: vec![LogLine::info("one"), LogLine::warning("two")],
            })
        }

        async fn toggle_generator(&self, _: &str, _: bool) -> Result<String, BackendError> {
            Ok(String::new())
        }
    }

    fn panel(id: u32) -> FeaturePanel {
        let entry = catalog::lookup(FeatureId(id)).unwrap();
        FeaturePanel::new(entry.definition(), false)
    }

    #[tokio::test(start_paused = true)]
    async fn backend_results_and_logs_land_in_order() {
        let panel = panel(7);
        let mut auxiliary = PanelInputs::new();
        auxiliary.insert("active_databases", InputValue::Selections(vec![]));

        let handle = panel
            .start(Arc::new(Answering), auxiliary, Timings::default(), StdRng::seed_from_u64(0))
            .unwrap();
        handle.await.unwrap();

        let state = panel.snapshot();
        assert_eq!(state.status, RunStatus::Idle);
        assert_eq!(state.source, Some(ResultSource::Backend));
        assert_eq!(state.logs, vec![LogLine::info("one"), LogLine::warning("two")]);
        // four panel inputs plus the auxiliary group
        assert_eq!(state.result.unwrap().field("echo"), Some("5"));
    }

    #[tokio::test(start_paused = true)]
    async fn second_trigger_is_ignored() {
        let panel = panel(1);
        let backend = Arc::new(Offline);
        let first = panel.start(
            backend.clone(),
            PanelInputs::new(),
            Timings::default(),
            StdRng::seed_from_u64(0),
        );
        assert!(first.is_some());
        assert!(panel
            .start(backend, PanelInputs::new(), Timings::default(), StdRng::seed_from_u64(0))
            .is_none());
        first.unwrap().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_run_leaves_the_panel_alone() {
        let panel = panel(1);
        let handle = panel
            .start(Arc::new(Offline), PanelInputs::new(), Timings::default(), StdRng::seed_from_u64(0))
            .unwrap();
        panel.cancel();
        handle.await.unwrap();

        let state = panel.snapshot();
        assert_eq!(state.status, RunStatus::Running);
        assert!(state.result.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn generic_panel_reveals_in_stages() {
        let panel = FeaturePanel::new(
            generic_definition(FeatureDescriptor::placeholder(FeatureId(50))),
            true,
        );
        let handle = panel
            .start(Arc::new(Offline), PanelInputs::new(), Timings::default(), StdRng::seed_from_u64(0))
            .unwrap();

        tokio::time::sleep(Duration::from_millis(2100)).await;
        let state = panel.snapshot();
        let result = state.result.unwrap();
        assert_eq!(result.field("result1"), Some("Analysis complete - 98.5% accuracy"));
        assert_eq!(result.field("result2"), None);
        assert!(state.is_processing);

        handle.await.unwrap();
        let state = panel.snapshot();
        assert_eq!(state.status, RunStatus::Idle);
        assert_eq!(
            state.result.unwrap().field("result3"),
            Some("Results generated and saved")
        );
    }

    #[test]
    fn set_input_validates_against_the_field() {
        let panel = panel(12);
        panel.set_input("kPoints", "8").unwrap();
        panel.set_input("spinorbit", "on").unwrap();
        assert_eq!(
            panel.snapshot().inputs.get("spinOrbit"),
            Some(&InputValue::Flag(true))
        );

        assert_eq!(
            panel.set_input("nope", "1"),
            Err(InputError::Unknown("nope".into()))
        );
        assert!(matches!(
            panel.set_input("bandCalculationType", "lda"),
            Err(InputError::Invalid { .. })
        ));
    }
}
