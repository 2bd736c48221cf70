// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Simulated backends for exercising the processor lifecycle without spawning
//! real processes.

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::errors::BackendError;
use crate::traits::{Backend, Invocation};

/// Remembers the workspace of the most recent run so tests can check cleanup.
#[derive(Default)]
pub struct RunRecorder {
    runs: AtomicUsize,
    workspace: Mutex<Option<PathBuf>>,
}

impl RunRecorder {
    fn record(&self, invocation: &Invocation<'_>) {
        self.runs.fetch_add(1, Ordering::SeqCst);
        *self.workspace.lock().unwrap() = Some(invocation.workspace.to_path_buf());
    }

    pub fn runs(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }

    pub fn last_workspace(&self) -> Option<PathBuf> {
        self.workspace.lock().unwrap().clone()
    }
}

/// Succeeds after writing the concatenation of all staged inputs to every output.
#[derive(Default)]
pub struct ConcatBackend {
    pub recorder: RunRecorder,
    pub delay: Option<Duration>,
}

impl ConcatBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }
}

#[async_trait]
impl Backend for ConcatBackend {
    fn name(&self) -> &'static str {
        "concat"
    }

    async fn run(
        &self,
        invocation: &Invocation<'_>,
        _cancel: CancellationToken,
    ) -> Result<(), BackendError> {
        self.recorder.record(invocation);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let mut combined = Vec::new();
        for staged in invocation.inputs {
            combined.extend(tokio::fs::read(&staged.path).await?);
        }
        for staged in invocation.outputs {
            if let Some(parent) = staged.path.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(&staged.path, &combined).await?;
        }
        Ok(())
    }
}

/// Writes a partial output, then fails as a non-zero exit.
#[derive(Default)]
pub struct FailingBackend {
    pub recorder: RunRecorder,
}

#[async_trait]
impl Backend for FailingBackend {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn run(
        &self,
        invocation: &Invocation<'_>,
        _cancel: CancellationToken,
    ) -> Result<(), BackendError> {
        self.recorder.record(invocation);
        for staged in invocation.outputs {
            if let Some(parent) = staged.path.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(&staged.path, b"partial").await?;
        }
        Err(BackendError::NonZeroExit {
            code: Some(1),
            stderr: "Simulated backend failure".to_string(),
        })
    }
}

/// Never finishes on its own; returns only once cancelled.
#[derive(Default)]
pub struct HangingBackend {
    pub recorder: RunRecorder,
    pub saw_cancel: AtomicBool,
}

#[async_trait]
impl Backend for HangingBackend {
    fn name(&self) -> &'static str {
        "hanging"
    }

    async fn run(
        &self,
        invocation: &Invocation<'_>,
        cancel: CancellationToken,
    ) -> Result<(), BackendError> {
        self.recorder.record(invocation);
        cancel.cancelled().await;
        self.saw_cancel.store(true, Ordering::SeqCst);
        Err(BackendError::Cancelled)
    }
}

/// Reports success without producing any output.
#[derive(Default)]
pub struct SilentBackend {
    pub recorder: RunRecorder,
}

#[async_trait]
impl Backend for SilentBackend {
    fn name(&self) -> &'static str {
        "silent"
    }

    async fn run(
        &self,
        invocation: &Invocation<'_>,
        _cancel: CancellationToken,
    ) -> Result<(), BackendError> {
        self.recorder.record(invocation);
        Ok(())
    }
}

/// Replaces its workspace directory with a regular file, then fails. Removing
/// the workspace afterwards fails with `ENOTDIR`.
#[derive(Default)]
pub struct ClobberingBackend {
    pub recorder: RunRecorder,
}

#[async_trait]
impl Backend for ClobberingBackend {
    fn name(&self) -> &'static str {
        "clobbering"
    }

    async fn run(
        &self,
        invocation: &Invocation<'_>,
        _cancel: CancellationToken,
    ) -> Result<(), BackendError> {
        self.recorder.record(invocation);
        tokio::fs::remove_dir_all(invocation.workspace).await?;
        tokio::fs::write(invocation.workspace, b"not a directory").await?;
        Err(BackendError::NonZeroExit {
            code: Some(2),
            stderr: "Simulated backend failure".to_string(),
        })
    }
}
