// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for workspace allocation and removal.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::path::Path;

/// # Log Level
/// `debug!` - Routine detail
pub struct WorkspaceAllocated<'a> {
    pub path: &'a Path,
}

impl Display for WorkspaceAllocated<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Allocated workspace '{}'", self.path.display())
    }
}

impl StructuredLog for WorkspaceAllocated<'_> {
    fn log(&self) {
        tracing::debug!(path = %self.path.display(), "{}", self);
    }
}

/// # Log Level
/// `debug!` - Routine detail
pub struct WorkspaceRemoved<'a> {
    pub path: &'a Path,
}

impl Display for WorkspaceRemoved<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Removed workspace '{}'", self.path.display())
    }
}

impl StructuredLog for WorkspaceRemoved<'_> {
    fn log(&self) {
        tracing::debug!(path = %self.path.display(), "{}", self);
    }
}

/// Retention was requested, so the directory stays for inspection.
///
/// # Log Level
/// `info!` - The operator needs the path
pub struct WorkspaceRetained<'a> {
    pub path: &'a Path,
}

impl Display for WorkspaceRetained<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Retaining workspace '{}'", self.path.display())
    }
}

impl StructuredLog for WorkspaceRetained<'_> {
    fn log(&self) {
        tracing::info!(path = %self.path.display(), "{}", self);
    }
}

/// # Log Level
/// `warn!` - Disk space may leak; the run result itself is unaffected
pub struct WorkspaceCleanupFailed<'a> {
    pub path: &'a Path,
    pub error: &'a dyn std::error::Error,
}

impl Display for WorkspaceCleanupFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Failed to remove workspace '{}': {}",
            self.path.display(),
            self.error
        )
    }
}

impl StructuredLog for WorkspaceCleanupFailed<'_> {
    fn log(&self) {
        tracing::warn!(path = %self.path.display(), error = %self.error, "{}", self);
    }
}
