// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by a backend driver while staging, running or collecting.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Failed to stage input '{parameter}': {source}")]
    Staging {
        parameter: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to launch '{program}': {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Backend exited with {}: {stderr}", exit_label(.code))]
    NonZeroExit { code: Option<i32>, stderr: String },

    #[error("Backend run was cancelled")]
    Cancelled,

    #[error("Output '{parameter}' was not produced at '{}'", .path.display())]
    MissingOutput { parameter: String, path: PathBuf },

    #[error("Failed to collect output '{parameter}': {source}")]
    Collect {
        parameter: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Driver-specific failure that fits no other variant.
    #[error("{0}")]
    Failed(String),
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "no status (terminated by signal)".to_string(),
    }
}
