// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Runs a package's entry point as an operating system process.
//!
//! ## Command line
//! ```text
//! [interpreter] <entry point> [args...] [prefix] <staged path> ...
//! ```
//! Staged parameters follow the package's declaration order; a parameter's
//! `prefix` (e.g. `--nir`) is emitted right before its path.
//!
//! ## Backend properties
//! - `interpreter` - program that runs the entry point (`python3`, `Rscript`, ...);
//!   without it the entry point itself is executed
//! - `args` - extra whitespace separated arguments placed after the entry point
//! - `env.<NAME>` - exported to the process as environment variable `NAME`
//!
//! The process runs with the workspace as its working directory. Standard output
//! and error are captured to log files in the workspace; the tail of standard
//! error is quoted when the process exits unsuccessfully.

use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;

use crate::config::consts::{OUTPUTS_DIR, STDERR_LOG, STDERR_TAIL_BYTES, STDOUT_LOG};
use crate::errors::BackendError;
use crate::traits::{Backend, Invocation};

pub const INTERPRETER_PROPERTY: &str = "interpreter";
pub const ARGS_PROPERTY: &str = "args";
pub const ENV_PROPERTY_PREFIX: &str = "env.";

#[derive(Debug, Default, Clone)]
pub struct ProcessBackend;

impl ProcessBackend {
    pub fn new() -> Self {
        Self
    }

    /// Program and argument vector for an invocation, without spawning anything.
    pub fn command_line(invocation: &Invocation<'_>) -> (String, Vec<String>) {
        let entry_point = invocation
            .package
            .entry_point_path()
            .to_string_lossy()
            .into_owned();

        let (program, mut args) = match invocation.property(INTERPRETER_PROPERTY) {
            Some(interpreter) => (interpreter.to_string(), vec![entry_point]),
            None => (entry_point, Vec::new()),
        };

        if let Some(extra) = invocation.property(ARGS_PROPERTY) {
            args.extend(extra.split_whitespace().map(str::to_string));
        }

        for staged in invocation.arguments() {
            if let Some(prefix) = &staged.prefix {
                args.push(prefix.clone());
            }
            args.push(staged.path.to_string_lossy().into_owned());
        }

        (program, args)
    }

    fn build_command(invocation: &Invocation<'_>) -> Result<(String, Command), BackendError> {
        let (program, args) = Self::command_line(invocation);
        let workspace = invocation.workspace;

        let stdout = std::fs::File::create(workspace.join(STDOUT_LOG))?;
        let stderr = std::fs::File::create(workspace.join(STDERR_LOG))?;

        let mut command = Command::new(&program);
        command
            .args(&args)
            .current_dir(workspace)
            .stdin(Stdio::null())
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::from(stderr))
            .kill_on_drop(true);

        for (key, value) in invocation.properties() {
            if let Some(name) = key.strip_prefix(ENV_PROPERTY_PREFIX) {
                command.env(name, value);
            }
        }

        Ok((program, command))
    }
}

/// Last `STDERR_TAIL_BYTES` of the captured standard error, lossily decoded.
async fn stderr_tail(workspace: &Path) -> String {
    match tokio::fs::read(workspace.join(STDERR_LOG)).await {
        Ok(bytes) => {
            let start = bytes.len().saturating_sub(STDERR_TAIL_BYTES);
            String::from_utf8_lossy(&bytes[start..]).trim().to_string()
        }
        Err(_) => String::new(),
    }
}

#[async_trait]
impl Backend for ProcessBackend {
    fn name(&self) -> &'static str {
        "process"
    }

    async fn run(
        &self,
        invocation: &Invocation<'_>,
        cancel: CancellationToken,
    ) -> Result<(), BackendError> {
        tokio::fs::create_dir_all(invocation.workspace.join(OUTPUTS_DIR)).await?;

        let (program, mut command) = Self::build_command(invocation)?;
        let mut child = command
            .spawn()
            .map_err(|source| BackendError::Launch { program, source })?;

        let finished = tokio::select! {
            status = child.wait() => Some(status),
            _ = cancel.cancelled() => None,
        };

        let status = match finished {
            Some(status) => status?,
            None => {
                if let Err(e) = child.kill().await {
                    tracing::warn!("Failed to kill cancelled backend process: {}", e);
                }
                return Err(BackendError::Cancelled);
            }
        };

        if status.success() {
            Ok(())
        } else {
            Err(BackendError::NonZeroExit {
                code: status.code(),
                stderr: stderr_tail(invocation.workspace).await,
            })
        }
    }
}
