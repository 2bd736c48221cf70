// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Per-run scratch directories.
//!
//! Every run gets a directory of its own, resolved from the backend's workspace
//! template. The [`RANDOM_DIR_TOKEN`] in the template is replaced by a fresh
//! UUID; a template without the token gets a UUID directory appended. Two
//! concurrent runs can therefore never share a workspace.
//!
//! A [`Workspace`] removes its directory when released or dropped, unless it was
//! allocated with `retain` set.

use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::config::consts::RANDOM_DIR_TOKEN;
use crate::errors::WorkspaceError;
use crate::observability::messages::workspace::{
    WorkspaceAllocated, WorkspaceCleanupFailed, WorkspaceRemoved, WorkspaceRetained,
};
use crate::observability::messages::StructuredLog;

/// Resolve a template to a concrete, not yet created, directory path.
pub fn resolve_template(template: &str) -> Result<PathBuf, WorkspaceError> {
    if template.trim().is_empty() {
        return Err(WorkspaceError::EmptyTemplate(template.to_string()));
    }

    let unique = Uuid::new_v4().simple().to_string();
    if template.contains(RANDOM_DIR_TOKEN) {
        Ok(PathBuf::from(template.replace(RANDOM_DIR_TOKEN, &unique)))
    } else {
        Ok(Path::new(template).join(unique))
    }
}

#[derive(Debug)]
pub struct Workspace {
    path: PathBuf,
    retain: bool,
    released: bool,
}

impl Workspace {
    /// Create a fresh directory for one run.
    ///
    /// The final path component must not exist yet; a collision is reported
    /// rather than silently sharing someone else's directory.
    pub async fn allocate(template: &str, retain: bool) -> Result<Self, WorkspaceError> {
        let path = resolve_template(template)?;
        let create_error = |source| WorkspaceError::Create {
            path: path.clone(),
            source,
        };

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(create_error)?;
        }
        tokio::fs::create_dir(&path).await.map_err(create_error)?;

        WorkspaceAllocated { path: &path }.log();
        Ok(Self {
            path,
            retain,
            released: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_retained(&self) -> bool {
        self.retain
    }

    /// Remove the directory now, or keep it when retention was requested.
    pub async fn release(mut self) -> Result<(), WorkspaceError> {
        self.released = true;

        if self.retain {
            WorkspaceRetained { path: &self.path }.log();
            return Ok(());
        }

        match tokio::fs::remove_dir_all(&self.path).await {
            Ok(()) => {
                WorkspaceRemoved { path: &self.path }.log();
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => {
                let error = WorkspaceError::Cleanup {
                    path: self.path.clone(),
                    source,
                };
                WorkspaceCleanupFailed {
                    path: &self.path,
                    error: &error,
                }
                .log();
                Err(error)
            }
        }
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if self.retain {
            WorkspaceRetained { path: &self.path }.log();
            return;
        }

        // Best effort; Drop cannot report failures.
        match std::fs::remove_dir_all(&self.path) {
            Ok(()) => WorkspaceRemoved { path: &self.path }.log(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => WorkspaceCleanupFailed {
                path: &self.path,
                error: &e,
            }
            .log(),
        }
    }
}
