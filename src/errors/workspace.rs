// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::path::PathBuf;
use thiserror::Error;

/// Failures allocating or removing a run's isolated directory.
#[derive(Error, Debug)]
pub enum WorkspaceError {
    #[error("Failed to create workspace '{path}': {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to remove workspace '{path}': {source}")]
    Cleanup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Workspace template '{0}' resolves to an empty path")]
    EmptyTemplate(String),
}
