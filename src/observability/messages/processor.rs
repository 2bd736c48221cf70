// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for parameter binding and the run lifecycle.
//!
//! This module contains message types for logging events related to:
//! * Binding accepted or rejected
//! * Run start, completion and failure
//! * Runs abandoned mid-flight

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::time::Duration;
use tracing::Span;

/// A payload was bound to a parameter.
///
/// # Log Level
/// `debug!` - Routine detail
pub struct DataBound<'a> {
    pub package: &'a str,
    pub parameter: &'a str,
    pub mime_type: &'a str,
    pub has_content: bool,
}

impl Display for DataBound<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let kind = if self.has_content { "data" } else { "declaration" };
        write!(
            f,
            "Bound {} '{}' to parameter '{}' of '{}'",
            kind, self.mime_type, self.parameter, self.package
        )
    }
}

impl StructuredLog for DataBound<'_> {
    fn log(&self) {
        tracing::debug!(
            package = self.package,
            parameter = self.parameter,
            mime_type = self.mime_type,
            has_content = self.has_content,
            "{}", self
        );
    }
}

/// A binding was refused.
///
/// # Log Level
/// `debug!` - Rejections are routine caller input errors, reported through the return value
pub struct BindingRejected<'a> {
    pub package: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for BindingRejected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Rejected binding for '{}': {}", self.package, self.error)
    }
}

impl StructuredLog for BindingRejected<'_> {
    fn log(&self) {
        tracing::debug!(package = self.package, error = %self.error, "{}", self);
    }
}

/// A run entered the `Running` state.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use the_codepack::observability::messages::processor::RunStarted;
/// use std::path::Path;
///
/// let msg = RunStarted {
///     package: "ndvi@1.0.0",
///     backend_id: "python3",
///     workspace: Path::new("/tmp/codepack/0b5c"),
///     input_count: 2,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct RunStarted<'a> {
    pub package: &'a str,
    pub backend_id: &'a str,
    pub workspace: &'a Path,
    pub input_count: usize,
}

impl Display for RunStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Running package '{}' on backend '{}' in '{}' with {} inputs",
            self.package,
            self.backend_id,
            self.workspace.display(),
            self.input_count
        )
    }
}

impl StructuredLog for RunStarted<'_> {
    fn log(&self) {
        tracing::info!(
            package = self.package,
            backend_id = self.backend_id,
            workspace = %self.workspace.display(),
            input_count = self.input_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "run",
            span_name = name,
            package = self.package,
            backend_id = self.backend_id,
            workspace = %self.workspace.display(),
        )
    }
}

/// A run finished and its outputs were committed.
///
/// # Log Level
/// `info!` - Important operational event
pub struct RunCompleted<'a> {
    pub package: &'a str,
    pub backend_id: &'a str,
    pub output_count: usize,
    pub output_bytes: usize,
    pub duration: Duration,
}

impl Display for RunCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Package '{}' completed on '{}': {} outputs, {} bytes, duration={:?}",
            self.package, self.backend_id, self.output_count, self.output_bytes, self.duration
        )
    }
}

impl StructuredLog for RunCompleted<'_> {
    fn log(&self) {
        tracing::info!(
            package = self.package,
            backend_id = self.backend_id,
            output_count = self.output_count,
            output_bytes = self.output_bytes,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }
}

/// A run failed after it started.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use the_codepack::observability::messages::processor::RunFailed;
/// use std::time::Duration;
///
/// let error = std::io::Error::new(std::io::ErrorKind::Other, "exit status 1");
/// let msg = RunFailed {
///     package: "ndvi@1.0.0",
///     backend_id: "python3",
///     error: &error,
///     duration: Duration::from_secs(3),
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct RunFailed<'a> {
    pub package: &'a str,
    pub backend_id: &'a str,
    pub error: &'a dyn std::error::Error,
    pub duration: Duration,
}

impl Display for RunFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Package '{}' failed on '{}' after {:?}: {}",
            self.package, self.backend_id, self.duration, self.error
        )
    }
}

impl StructuredLog for RunFailed<'_> {
    fn log(&self) {
        tracing::error!(
            package = self.package,
            backend_id = self.backend_id,
            error = %self.error,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }
}

/// The `execute` future was dropped while the run was in flight.
///
/// # Log Level
/// `warn!` - The processor is left `Failed`; the caller never sees a result
pub struct RunAbandoned<'a> {
    pub package: &'a str,
    pub backend_id: &'a str,
}

impl Display for RunAbandoned<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Run of package '{}' on '{}' was abandoned before it finished",
            self.package, self.backend_id
        )
    }
}

impl StructuredLog for RunAbandoned<'_> {
    fn log(&self) {
        tracing::warn!(
            package = self.package,
            backend_id = self.backend_id,
            "{}", self
        );
    }
}
