// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors returned by the processor factory and the processor lifecycle.

use std::time::Duration;
use thiserror::Error;

use super::{BackendError, WorkspaceError};

/// Why `add_data` refused a payload.
///
/// Binding failures are routine caller mistakes, so `add_data` reports them as
/// `false`; `try_add_data` hands back this reason instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BindingError {
    #[error("Parameter '{parameter}' is not declared by the package")]
    UnknownParameter { parameter: String },

    #[error("MIME type '{mime_type}' is not permitted for '{parameter}' (permitted: {})", .permitted.join(", "))]
    MimeTypeMismatch {
        parameter: String,
        mime_type: String,
        permitted: Vec<String>,
    },

    #[error("Parameter '{parameter}' cannot be rebound once a run has started")]
    RunStarted { parameter: String },
}

/// Broad classification callers use to tell outcomes apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Nothing was attempted: no backend, not feasible, already used, or no
    /// workspace could be allocated.
    Infeasible,
    /// A run started and failed.
    RunFailed,
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("No compatible backend for package '{package}' on platform '{platform}'")]
    NoCompatibleBackend { package: String, platform: String },

    #[error("Package '{package}' is not feasible; missing or invalid: {}", .missing.join(", "))]
    NotFeasible { package: String, missing: Vec<String> },

    #[error("Processor for package '{package}' has already executed")]
    AlreadyExecuted { package: String },

    #[error("Workspace error: {0}")]
    Workspace(#[from] WorkspaceError),

    #[error("Execution timed out after {0:?}")]
    TimeoutExceeded(Duration),

    #[error("Execution was cancelled")]
    Cancelled,

    #[error("Backend execution failed: {0}")]
    BackendExecution(#[from] BackendError),
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::NoCompatibleBackend { .. }
            | EngineError::NotFeasible { .. }
            | EngineError::AlreadyExecuted { .. }
            | EngineError::Workspace(WorkspaceError::Create { .. })
            | EngineError::Workspace(WorkspaceError::EmptyTemplate(_)) => ErrorKind::Infeasible,
            EngineError::Workspace(WorkspaceError::Cleanup { .. })
            | EngineError::TimeoutExceeded(_)
            | EngineError::Cancelled
            | EngineError::BackendExecution(_) => ErrorKind::RunFailed,
        }
    }
}

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
