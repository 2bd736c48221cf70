// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for backend selection.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};

/// A backend was chosen for a package.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use the_codepack::observability::messages::factory::BackendSelected;
///
/// let msg = BackendSelected {
///     package: "ndvi@1.0.0",
///     backend_id: "python3",
///     candidate_count: 2,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct BackendSelected<'a> {
    pub package: &'a str,
    pub backend_id: &'a str,
    pub candidate_count: usize,
}

impl Display for BackendSelected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Selected backend '{}' for package '{}' ({} compatible candidates)",
            self.backend_id, self.package, self.candidate_count
        )
    }
}

impl StructuredLog for BackendSelected<'_> {
    fn log(&self) {
        tracing::info!(
            package = self.package,
            backend_id = self.backend_id,
            candidate_count = self.candidate_count,
            "{}", self
        );
    }
}

/// No registered backend supports the package on this platform.
///
/// # Log Level
/// `warn!` - The caller asked for something this host cannot run
pub struct NoCompatibleBackend<'a> {
    pub package: &'a str,
    pub platform: &'a str,
    pub registered: &'a [&'a str],
}

impl Display for NoCompatibleBackend<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "No compatible backend for package '{}' on '{}' (registered: [{}])",
            self.package,
            self.platform,
            self.registered.join(", ")
        )
    }
}

impl StructuredLog for NoCompatibleBackend<'_> {
    fn log(&self) {
        tracing::warn!(
            package = self.package,
            platform = self.platform,
            registered = self.registered.len(),
            "{}", self
        );
    }
}

/// A compatible backend was skipped because no driver is available for it.
///
/// # Log Level
/// `warn!` - Potential issue or degraded behavior
pub struct DriverUnavailable<'a> {
    pub backend_id: &'a str,
    pub backend_type: &'a str,
}

impl Display for DriverUnavailable<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Skipping backend '{}': no driver registered for type '{}'",
            self.backend_id, self.backend_type
        )
    }
}

impl StructuredLog for DriverUnavailable<'_> {
    fn log(&self) {
        tracing::warn!(
            backend_id = self.backend_id,
            backend_type = self.backend_type,
            "{}", self
        );
    }
}
