// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! One-shot execution of a package on a selected backend.
//!
//! ## Lifecycle
//! ```text
//! Created --execute--> Running --+--> Completed
//!                                +--> Failed
//! ```
//! A processor is created by [`ProcessorFactory`](crate::engine::ProcessorFactory)
//! with its backend already chosen. Callers bind data with
//! [`add_data`](PackageProcessor::add_data), check
//! [`is_feasible`](PackageProcessor::is_feasible) and call
//! [`execute`](PackageProcessor::execute) exactly once.
//!
//! ## Guarantees
//! - A rejected `execute` (already executed, not feasible, workspace allocation
//!   failure) leaves the state untouched.
//! - Outputs are committed all together, and only after a successful run; a failed,
//!   timed out or cancelled run leaves every output slot content-absent.
//! - The run's workspace is removed on every exit path unless retention was
//!   requested. That includes an `execute` future dropped mid-run, which also
//!   leaves the processor `Failed`.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::config::consts::BACKEND_STOP_GRACE;
use crate::config::BackendDescriptor;
use crate::data::{BindingTable, MediaPayload};
use crate::engine::workspace::Workspace;
use crate::errors::{BackendError, BindingError, EngineError, EngineResult, WorkspaceError};
use crate::observability::messages::processor::{
    BindingRejected, DataBound, RunAbandoned, RunCompleted, RunFailed, RunStarted,
};
use crate::observability::messages::StructuredLog;
use crate::package::{PackageDescriptor, ParameterId};
use crate::traits::{Backend, Invocation, StagedParameter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Created,
    Running,
    Completed,
    Failed,
}

enum RunOutcome {
    Finished(Result<(), BackendError>),
    TimedOut(Duration),
    Cancelled,
}

/// Holds the processor in `Running` for one run. Dropped before
/// [`finish`](Self::finish), i.e. when the `execute` future is abandoned, it
/// leaves the processor `Failed`.
struct RunningGuard<'a> {
    state: &'a mut RunState,
    package: &'a str,
    backend_id: &'a str,
}

impl<'a> RunningGuard<'a> {
    fn enter(state: &'a mut RunState, package: &'a str, backend_id: &'a str) -> Self {
        *state = RunState::Running;
        Self {
            state,
            package,
            backend_id,
        }
    }

    fn finish(mut self, outcome: RunState) {
        *self.state = outcome;
    }
}

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        if *self.state == RunState::Running {
            *self.state = RunState::Failed;
            RunAbandoned {
                package: self.package,
                backend_id: self.backend_id,
            }
            .log();
        }
    }
}

/// Everything one run reads, borrowed from the processor.
struct RunContext<'a> {
    package: &'a PackageDescriptor,
    backend: &'a BackendDescriptor,
    driver: &'a dyn Backend,
    table: &'a BindingTable,
    workspace: &'a Path,
}

pub struct PackageProcessor {
    package: Arc<PackageDescriptor>,
    backend: Arc<BackendDescriptor>,
    driver: Arc<dyn Backend>,
    table: BindingTable,
    state: RunState,
    retain_workspace: bool,
    leaked_workspace: Option<PathBuf>,
}

impl PackageProcessor {
    pub fn new(
        package: Arc<PackageDescriptor>,
        backend: Arc<BackendDescriptor>,
        driver: Arc<dyn Backend>,
    ) -> Self {
        let table = BindingTable::new(package.clone());
        Self {
            package,
            backend,
            driver,
            table,
            state: RunState::Created,
            retain_workspace: false,
            leaked_workspace: None,
        }
    }

    /// Keep the run directory after execution instead of removing it.
    pub fn retain_workspace(mut self, retain: bool) -> Self {
        self.retain_workspace = retain;
        self
    }

    pub fn package(&self) -> &PackageDescriptor {
        &self.package
    }

    pub fn backend(&self) -> &BackendDescriptor {
        &self.backend
    }

    pub fn backend_id(&self) -> &str {
        &self.backend.id
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn table(&self) -> &BindingTable {
        &self.table
    }

    /// Workspace left on disk because removing it failed after the run.
    pub fn leaked_workspace(&self) -> Option<&Path> {
        self.leaked_workspace.as_deref()
    }

    /// Bind `payload` to `id`, reporting why a binding was refused.
    pub fn try_add_data<I: Into<ParameterId>>(
        &mut self,
        id: I,
        payload: MediaPayload,
    ) -> Result<(), BindingError> {
        let id = id.into();
        let label = self.package.label();

        let result = if self.state != RunState::Created {
            Err(BindingError::RunStarted {
                parameter: id.to_string(),
            })
        } else {
            let parameter = id.to_string();
            let mime_type = payload.mime_type().to_string();
            let has_content = payload.has_content();
            self.table.bind(id, payload).map(|()| {
                DataBound {
                    package: &label,
                    parameter: &parameter,
                    mime_type: &mime_type,
                    has_content,
                }
                .log();
            })
        };

        if let Err(error) = &result {
            BindingRejected {
                package: &label,
                error,
            }
            .log();
        }
        result
    }

    /// Bind `payload` to `id`. Returns false, leaving the table untouched, when the
    /// identity is undeclared, the MIME type is not permitted or a run has started.
    pub fn add_data<I: Into<ParameterId>>(&mut self, id: I, payload: MediaPayload) -> bool {
        self.try_add_data(id, payload).is_ok()
    }

    pub fn is_feasible(&self) -> bool {
        self.table.is_feasible()
    }

    pub fn missing_parameters(&self) -> Vec<ParameterId> {
        self.table.missing_parameters()
    }

    /// Current payload of a slot: a declaration before completion, produced data after.
    pub fn payload<I: Into<ParameterId>>(&self, id: I) -> Option<&MediaPayload> {
        self.table.get(&id.into())
    }

    pub fn outputs(&self) -> impl Iterator<Item = (&ParameterId, &MediaPayload)> {
        self.table.outputs()
    }

    /// Run the package once. `None` or a zero timeout means unbounded.
    pub async fn execute(&mut self, timeout: Option<Duration>) -> EngineResult<()> {
        self.execute_with_cancellation(timeout, CancellationToken::new())
            .await
    }

    /// Run the package once, stopping early when `cancel` fires.
    pub async fn execute_with_cancellation(
        &mut self,
        timeout: Option<Duration>,
        cancel: CancellationToken,
    ) -> EngineResult<()> {
        if self.state != RunState::Created {
            return Err(EngineError::AlreadyExecuted {
                package: self.package.label(),
            });
        }
        if !self.is_feasible() {
            return Err(EngineError::NotFeasible {
                package: self.package.label(),
                missing: self
                    .missing_parameters()
                    .iter()
                    .map(ToString::to_string)
                    .collect(),
            });
        }

        let workspace =
            Workspace::allocate(&self.backend.workspace_template, self.retain_workspace).await?;

        let label = self.package.label();
        let guard = RunningGuard::enter(&mut self.state, &label, &self.backend.id);
        let started = Instant::now();

        let context = RunContext {
            package: &self.package,
            backend: &self.backend,
            driver: self.driver.as_ref(),
            table: &self.table,
            workspace: workspace.path(),
        };
        let result = context.run(timeout, cancel).await;

        // Cleanup failures are logged by the workspace; the run's outcome stands.
        if let Err(WorkspaceError::Cleanup { path, .. }) = workspace.release().await {
            self.leaked_workspace = Some(path);
        }

        match result {
            Ok(produced) => {
                let output_count = produced.len();
                let output_bytes = produced
                    .iter()
                    .filter_map(|(_, payload)| payload.bytes())
                    .map(<[u8]>::len)
                    .sum();
                self.table.commit_outputs(produced);
                guard.finish(RunState::Completed);
                RunCompleted {
                    package: &label,
                    backend_id: &self.backend.id,
                    output_count,
                    output_bytes,
                    duration: started.elapsed(),
                }
                .log();
                Ok(())
            }
            Err(error) => {
                guard.finish(RunState::Failed);
                RunFailed {
                    package: &label,
                    backend_id: &self.backend.id,
                    error: &error,
                    duration: started.elapsed(),
                }
                .log();
                Err(error)
            }
        }
    }
}

impl RunContext<'_> {
    async fn run(
        &self,
        timeout: Option<Duration>,
        cancel: CancellationToken,
    ) -> EngineResult<Vec<(ParameterId, MediaPayload)>> {
        let workspace = self.workspace;

        let mut inputs = Vec::new();
        for (parameter, payload) in self.table.bound_inputs() {
            let path = self
                .driver
                .stage_input(workspace, parameter, payload)
                .await?;
            inputs.push(StagedParameter {
                id: parameter.id.clone(),
                path,
                mime_type: payload.mime_type().to_string(),
                prefix: parameter.prefix.clone(),
            });
        }

        let outputs: Vec<StagedParameter> = self
            .table
            .declared_outputs()
            .map(|(parameter, payload)| StagedParameter {
                id: parameter.id.clone(),
                path: self.driver.output_path(workspace, parameter),
                mime_type: payload.mime_type().to_string(),
                prefix: parameter.prefix.clone(),
            })
            .collect();

        let label = self.package.label();
        let started = RunStarted {
            package: &label,
            backend_id: &self.backend.id,
            workspace,
            input_count: inputs.len(),
        };
        started.log();
        let span = started.span(self.driver.name());

        let invocation = Invocation {
            package: self.package,
            backend: self.backend,
            workspace,
            inputs: &inputs,
            outputs: &outputs,
        };

        let run_token = cancel.child_token();
        let run = self
            .driver
            .run(&invocation, run_token.clone())
            .instrument(span);
        tokio::pin!(run);

        let deadline = async {
            match timeout {
                Some(limit) if !limit.is_zero() => {
                    tokio::time::sleep(limit).await;
                    limit
                }
                _ => std::future::pending().await,
            }
        };

        let outcome = tokio::select! {
            result = &mut run => RunOutcome::Finished(result),
            limit = deadline => RunOutcome::TimedOut(limit),
            _ = cancel.cancelled() => RunOutcome::Cancelled,
        };

        match outcome {
            RunOutcome::Finished(Ok(())) => {}
            RunOutcome::Finished(Err(BackendError::Cancelled)) => return Err(EngineError::Cancelled),
            RunOutcome::Finished(Err(error)) => return Err(error.into()),
            RunOutcome::TimedOut(limit) => {
                run_token.cancel();
                let _ = tokio::time::timeout(BACKEND_STOP_GRACE, &mut run).await;
                return Err(EngineError::TimeoutExceeded(limit));
            }
            RunOutcome::Cancelled => {
                let _ = tokio::time::timeout(BACKEND_STOP_GRACE, &mut run).await;
                return Err(EngineError::Cancelled);
            }
        }

        let mut produced = Vec::with_capacity(outputs.len());
        for staged in &outputs {
            let bytes = self.driver.collect_output(staged).await?;
            produced.push((
                staged.id.clone(),
                MediaPayload::from_bytes(bytes, staged.mime_type.clone()),
            ));
        }
        Ok(produced)
    }
}

impl std::fmt::Debug for PackageProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PackageProcessor")
            .field("package", &self.package.label())
            .field("backend_id", &self.backend.id)
            .field("driver", &self.driver.name())
            .field("state", &self.state)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::stub::{
        ClobberingBackend, ConcatBackend, FailingBackend, HangingBackend, SilentBackend,
    };
    use crate::engine::test_support::{backend_in, ndvi_package, tiff};
    use crate::errors::ErrorKind;
    use crate::package::{ContainerKind, ParameterDescriptor};
    use tokio::io::AsyncWriteExt;
    use std::sync::atomic::Ordering;

    fn processor_with(driver: Arc<dyn Backend>, dir: &std::path::Path) -> PackageProcessor {
        PackageProcessor::new(ndvi_package(), backend_in(dir, "python3"), driver)
    }

    fn bind_ndvi_inputs(processor: &mut PackageProcessor) {
        assert!(processor.add_data("NIR", tiff(b"nir")));
        assert!(processor.add_data("RED", tiff(b"red")));
        assert!(processor.add_data("NDVI", MediaPayload::declaration("image/tiff")));
    }

    fn workspace_root_is_empty(dir: &std::path::Path) -> bool {
        match std::fs::read_dir(dir.join("runs")) {
            Ok(mut entries) => entries.next().is_none(),
            Err(_) => true,
        }
    }

    #[test]
    fn test_add_data_rejects_unknown_and_mismatched_bindings() {
        let dir = tempfile::tempdir().unwrap();
        let mut processor = processor_with(Arc::new(ConcatBackend::new()), dir.path());

        assert!(!processor.add_data("BLUE", tiff(b"blue")));
        assert!(processor.payload("BLUE").is_none());

        let err = processor
            .try_add_data("NIR", MediaPayload::from_bytes(vec![], "text/csv"))
            .unwrap_err();
        assert!(matches!(err, BindingError::MimeTypeMismatch { .. }));
        assert!(processor.payload("NIR").is_none());
    }

    #[tokio::test]
    async fn test_execute_on_infeasible_leaves_state_and_creates_no_workspace() {
        let dir = tempfile::tempdir().unwrap();
        let driver = Arc::new(ConcatBackend::new());
        let mut processor = processor_with(driver.clone(), dir.path());
        processor.add_data("NIR", tiff(b"nir"));
        processor.add_data("RED", tiff(b"red"));

        let err = processor.execute(None).await.unwrap_err();
        match &err {
            EngineError::NotFeasible { missing, .. } => assert_eq!(missing, &vec!["NDVI".to_string()]),
            other => panic!("expected NotFeasible, got {:?}", other),
        }
        assert_eq!(err.kind(), ErrorKind::Infeasible);
        assert_eq!(processor.state(), RunState::Created);
        assert_eq!(driver.recorder.runs(), 0);
        assert!(workspace_root_is_empty(dir.path()));
    }

    #[tokio::test]
    async fn test_successful_run_commits_outputs_and_removes_workspace() {
        let dir = tempfile::tempdir().unwrap();
        let driver = Arc::new(ConcatBackend::new());
        let mut processor = processor_with(driver.clone(), dir.path());
        bind_ndvi_inputs(&mut processor);

        processor.execute(Some(Duration::from_secs(10))).await.unwrap();

        assert_eq!(processor.state(), RunState::Completed);
        let ndvi = processor.payload("NDVI").unwrap();
        assert_eq!(ndvi.mime_type(), "image/tiff");
        assert_eq!(ndvi.bytes(), Some(&b"nirred"[..]));

        let workspace = driver.recorder.last_workspace().unwrap();
        assert!(workspace.starts_with(dir.path()));
        assert!(!workspace.exists());
    }

    #[tokio::test]
    async fn test_second_execute_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let driver = Arc::new(ConcatBackend::new());
        let mut processor = processor_with(driver.clone(), dir.path());
        bind_ndvi_inputs(&mut processor);
        processor.execute(None).await.unwrap();

        let err = processor.execute(None).await.unwrap_err();
        assert!(matches!(err, EngineError::AlreadyExecuted { .. }));
        assert_eq!(processor.state(), RunState::Completed);
        assert_eq!(driver.recorder.runs(), 1);

        let rebind = processor.try_add_data("NIR", tiff(b"again")).unwrap_err();
        assert!(matches!(rebind, BindingError::RunStarted { .. }));
    }

    #[tokio::test]
    async fn test_backend_failure_leaves_outputs_absent() {
        let dir = tempfile::tempdir().unwrap();
        let driver = Arc::new(FailingBackend::default());
        let mut processor = processor_with(driver.clone(), dir.path());
        bind_ndvi_inputs(&mut processor);

        let err = processor.execute(None).await.unwrap_err();

        assert!(matches!(
            err,
            EngineError::BackendExecution(BackendError::NonZeroExit { code: Some(1), .. })
        ));
        assert_eq!(err.kind(), ErrorKind::RunFailed);
        assert_eq!(processor.state(), RunState::Failed);
        assert!(!processor.payload("NDVI").unwrap().has_content());
        assert!(!driver.recorder.last_workspace().unwrap().exists());
    }

    #[tokio::test]
    async fn test_missing_declared_output_fails_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let mut processor = processor_with(Arc::new(SilentBackend::default()), dir.path());
        bind_ndvi_inputs(&mut processor);

        let err = processor.execute(None).await.unwrap_err();

        assert!(matches!(
            err,
            EngineError::BackendExecution(BackendError::MissingOutput { .. })
        ));
        assert_eq!(processor.state(), RunState::Failed);
        assert!(!processor.payload("NDVI").unwrap().has_content());
    }

    #[tokio::test]
    async fn test_timeout_cancels_backend_and_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let driver = Arc::new(HangingBackend::default());
        let mut processor = processor_with(driver.clone(), dir.path());
        bind_ndvi_inputs(&mut processor);

        let err = processor
            .execute(Some(Duration::from_millis(50)))
            .await
            .unwrap_err();

        assert!(matches!(err, EngineError::TimeoutExceeded(_)));
        assert_eq!(processor.state(), RunState::Failed);
        assert!(driver.saw_cancel.load(Ordering::SeqCst));
        assert!(!processor.payload("NDVI").unwrap().has_content());
        assert!(!driver.recorder.last_workspace().unwrap().exists());
    }

    #[tokio::test]
    async fn test_zero_timeout_is_unbounded() {
        let dir = tempfile::tempdir().unwrap();
        let driver = Arc::new(ConcatBackend::with_delay(Duration::from_millis(20)));
        let mut processor = processor_with(driver, dir.path());
        bind_ndvi_inputs(&mut processor);

        processor.execute(Some(Duration::ZERO)).await.unwrap();
        assert_eq!(processor.state(), RunState::Completed);
    }

    #[tokio::test]
    async fn test_caller_cancellation_fails_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let driver = Arc::new(HangingBackend::default());
        let mut processor = processor_with(driver.clone(), dir.path());
        bind_ndvi_inputs(&mut processor);

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(30)).await;
            trigger.cancel();
        });

        let err = processor
            .execute_with_cancellation(None, cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, EngineError::Cancelled));
        assert_eq!(processor.state(), RunState::Failed);
        assert!(driver.saw_cancel.load(Ordering::SeqCst));
        assert!(!driver.recorder.last_workspace().unwrap().exists());
    }

    #[tokio::test]
    async fn test_retained_workspace_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let driver = Arc::new(ConcatBackend::new());
        let mut processor = processor_with(driver.clone(), dir.path()).retain_workspace(true);
        bind_ndvi_inputs(&mut processor);

        processor.execute(None).await.unwrap();

        let workspace = driver.recorder.last_workspace().unwrap();
        assert!(workspace.join("inputs").join("NIR").is_file());
        assert!(workspace.join("outputs").join("NDVI").is_file());
    }

    #[test]
    fn test_outputs_lists_output_slots_before_run() {
        let dir = tempfile::tempdir().unwrap();
        let processor = processor_with(Arc::new(ConcatBackend::new()), dir.path());

        let outputs: Vec<_> = processor.outputs().map(|(id, _)| id.to_string()).collect();
        assert_eq!(outputs, vec!["NDVI"]);
        assert_eq!(processor.backend_id(), "python3");
    }

    #[tokio::test]
    async fn test_workspace_allocation_failure_leaves_processor_created() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("runs"), b"blocks the workspace root").unwrap();
        let driver = Arc::new(ConcatBackend::new());
        let mut processor = processor_with(driver.clone(), dir.path());
        bind_ndvi_inputs(&mut processor);

        let err = processor.execute(None).await.unwrap_err();

        assert!(matches!(
            err,
            EngineError::Workspace(WorkspaceError::Create { .. })
        ));
        assert_eq!(err.kind(), ErrorKind::Infeasible);
        assert_eq!(processor.state(), RunState::Created);
        assert_eq!(driver.recorder.runs(), 0);
        assert!(processor.is_feasible());
    }

    #[tokio::test]
    async fn test_failed_run_cannot_be_retried_or_rebound() {
        let dir = tempfile::tempdir().unwrap();
        let driver = Arc::new(FailingBackend::default());
        let mut processor = processor_with(driver.clone(), dir.path());
        bind_ndvi_inputs(&mut processor);
        processor.execute(None).await.unwrap_err();

        let err = processor.execute(None).await.unwrap_err();
        assert!(matches!(err, EngineError::AlreadyExecuted { .. }));
        assert_eq!(processor.state(), RunState::Failed);

        let rebind = processor.try_add_data("RED", tiff(b"again")).unwrap_err();
        assert!(matches!(rebind, BindingError::RunStarted { .. }));
        assert_eq!(processor.payload("RED").unwrap().bytes(), Some(&b"red"[..]));
        assert_eq!(driver.recorder.runs(), 1);
    }

    #[tokio::test]
    async fn test_dropped_execute_fails_processor_and_removes_workspace() {
        let dir = tempfile::tempdir().unwrap();
        let driver = Arc::new(HangingBackend::default());
        let mut processor = processor_with(driver.clone(), dir.path());
        bind_ndvi_inputs(&mut processor);

        let abandoned =
            tokio::time::timeout(Duration::from_millis(50), processor.execute(None)).await;
        assert!(abandoned.is_err());

        assert_eq!(processor.state(), RunState::Failed);
        assert!(!processor.payload("NDVI").unwrap().has_content());
        assert!(!driver.recorder.last_workspace().unwrap().exists());
        assert!(workspace_root_is_empty(dir.path()));

        let err = processor.execute(None).await.unwrap_err();
        assert!(matches!(err, EngineError::AlreadyExecuted { .. }));
        assert_eq!(driver.recorder.runs(), 1);
    }

    #[tokio::test]
    async fn test_cleanup_failure_keeps_run_error_and_reports_leaked_workspace() {
        let dir = tempfile::tempdir().unwrap();
        let driver = Arc::new(ClobberingBackend::default());
        let mut processor = processor_with(driver.clone(), dir.path());
        bind_ndvi_inputs(&mut processor);

        let err = processor.execute(None).await.unwrap_err();

        assert!(matches!(
            err,
            EngineError::BackendExecution(BackendError::NonZeroExit { code: Some(2), .. })
        ));
        assert_eq!(processor.state(), RunState::Failed);
        let workspace = driver.recorder.last_workspace().unwrap();
        assert_eq!(processor.leaked_workspace(), Some(workspace.as_path()));
        assert!(workspace.is_file());
    }

    #[tokio::test]
    async fn test_successful_run_reports_no_leaked_workspace() {
        let dir = tempfile::tempdir().unwrap();
        let mut processor = processor_with(Arc::new(ConcatBackend::new()), dir.path());
        bind_ndvi_inputs(&mut processor);

        processor.execute(None).await.unwrap();
        assert!(processor.leaked_workspace().is_none());
    }

    #[tokio::test]
    async fn test_similar_parameter_names_stage_to_distinct_files() {
        let dir = tempfile::tempdir().unwrap();
        let package = Arc::new(PackageDescriptor {
            name: "names".to_string(),
            version: "1.0.0".to_string(),
            entry_point: "names.py".into(),
            root: None,
            containers: vec![ContainerKind::PythonScript],
            platforms: vec![],
            parameters: vec![
                ParameterDescriptor::input("a b", &["text/plain"]),
                ParameterDescriptor::input("a_b", &["text/plain"]),
                ParameterDescriptor::output("OUT", &["text/plain"]),
            ],
        });
        let driver = Arc::new(ConcatBackend::new());
        let mut processor =
            PackageProcessor::new(package, backend_in(dir.path(), "python3"), driver.clone())
                .retain_workspace(true);

        let text = |s: &str| MediaPayload::from_bytes(s.as_bytes().to_vec(), "text/plain");
        assert!(processor.add_data("a b", text("FIRST")));
        assert!(processor.add_data("a_b", text("SECOND")));
        assert!(processor.add_data("OUT", MediaPayload::declaration("text/plain")));

        processor.execute(None).await.unwrap();

        assert_eq!(
            processor.payload("OUT").unwrap().bytes(),
            Some(&b"FIRSTSECOND"[..])
        );
        let inputs = driver.recorder.last_workspace().unwrap().join("inputs");
        assert_eq!(std::fs::read_dir(inputs).unwrap().count(), 2);
    }

    #[tokio::test]
    async fn test_stream_input_is_staged() {
        let dir = tempfile::tempdir().unwrap();
        let mut processor = processor_with(Arc::new(ConcatBackend::new()), dir.path());

        let (mut writer, reader) = tokio::io::duplex(64);
        tokio::spawn(async move {
            writer.write_all(b"streamed-nir").await.unwrap();
        });

        assert!(processor.add_data("NIR", MediaPayload::from_reader(reader, "image/tiff")));
        assert!(processor.add_data("RED", tiff(b"+red")));
        assert!(processor.add_data("NDVI", MediaPayload::declaration("image/tiff")));

        processor.execute(None).await.unwrap();

        assert_eq!(
            processor.payload("NDVI").unwrap().bytes(),
            Some(&b"streamed-nir+red"[..])
        );
    }
}
