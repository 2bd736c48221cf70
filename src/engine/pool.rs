// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Bounded parallel execution of independent processors.
//!
//! Each submitted processor runs on its own tokio task; a semaphore caps how many
//! of them are inside `execute` at once. Processors never share a binding table or
//! a workspace, so the only coordination needed is the permit.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::ExecutorOptions;
use crate::engine::processor::PackageProcessor;
use crate::errors::{EngineError, EngineResult};

#[derive(Debug, Clone)]
pub struct ExecutionPool {
    permits: Arc<Semaphore>,
    max_concurrency: usize,
    timeout: Option<Duration>,
}

impl ExecutionPool {
    /// Pool running at most `max_concurrency` processors at a time (at least one).
    pub fn new(max_concurrency: usize) -> Self {
        let max_concurrency = max_concurrency.max(1);
        Self {
            permits: Arc::new(Semaphore::new(max_concurrency)),
            max_concurrency,
            timeout: None,
        }
    }

    pub fn from_options(options: &ExecutorOptions) -> Self {
        Self::new(options.max_concurrency()).with_timeout(options.timeout())
    }

    /// Timeout applied to every run submitted afterwards.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    pub fn available_permits(&self) -> usize {
        self.permits.available_permits()
    }

    /// Stop admitting work. Runs still waiting for a permit end as `Cancelled`.
    pub fn close(&self) {
        self.permits.close();
    }

    /// Run `processor` once a permit is free, handing it back with its result.
    ///
    /// Cancelling `cancel` while the run waits for a permit ends it without
    /// executing; once running it is forwarded to
    /// [`execute_with_cancellation`](PackageProcessor::execute_with_cancellation).
    pub fn submit(
        &self,
        mut processor: PackageProcessor,
        cancel: CancellationToken,
    ) -> JoinHandle<(PackageProcessor, EngineResult<()>)> {
        let permits = self.permits.clone();
        let timeout = self.timeout;

        tokio::spawn(async move {
            let permit = tokio::select! {
                permit = permits.acquire_owned() => permit.ok(),
                _ = cancel.cancelled() => None,
            };
            let Some(_permit) = permit else {
                return (processor, Err(EngineError::Cancelled));
            };

            let result = processor.execute_with_cancellation(timeout, cancel).await;
            (processor, result)
        })
    }
}
