// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The uniform interface every execution backend implements.
//!
//! How inputs are laid out on disk and how outputs are discovered is up to each
//! driver. The processor only calls these four operations, in this order:
//!
//! ```text
//! stage_input (per bound input) → output_path (per declared output)
//!     → run (cancellable) → collect_output (per declared output, success only)
//! ```

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;

use crate::config::consts::{INPUTS_DIR, OUTPUTS_DIR};
use crate::config::BackendDescriptor;
use crate::data::{Content, MediaPayload};
use crate::errors::BackendError;
use crate::package::{PackageDescriptor, ParameterDescriptor, ParameterId};

/// A parameter's location inside the workspace.
#[derive(Debug, Clone, PartialEq)]
pub struct StagedParameter {
    pub id: ParameterId,
    pub path: PathBuf,
    pub mime_type: String,
    pub prefix: Option<String>,
}

/// Everything a backend needs to perform one run.
pub struct Invocation<'a> {
    pub package: &'a PackageDescriptor,
    pub backend: &'a BackendDescriptor,
    pub workspace: &'a Path,
    pub inputs: &'a [StagedParameter],
    pub outputs: &'a [StagedParameter],
}

impl Invocation<'_> {
    pub fn properties(&self) -> &HashMap<String, String> {
        &self.backend.properties
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.backend.properties.get(key).map(String::as_str)
    }

    /// Staged inputs and outputs together, in the package's declaration order.
    pub fn arguments(&self) -> Vec<&StagedParameter> {
        self.package
            .parameters
            .iter()
            .filter_map(|parameter| {
                self.inputs
                    .iter()
                    .chain(self.outputs.iter())
                    .find(|staged| staged.id == parameter.id)
            })
            .collect()
    }
}

#[async_trait]
pub trait Backend: Send + Sync {
    fn name(&self) -> &'static str;

    /// Copy an input payload into the workspace and return where it landed.
    ///
    /// The default writes `inputs/<parameter>`, keeping the extension of a
    /// file-backed payload so tools that sniff extensions still work.
    async fn stage_input(
        &self,
        workspace: &Path,
        parameter: &ParameterDescriptor,
        payload: &MediaPayload,
    ) -> Result<PathBuf, BackendError> {
        let staging_error = |source| BackendError::Staging {
            parameter: parameter.id.to_string(),
            source,
        };

        let dir = workspace.join(INPUTS_DIR);
        tokio::fs::create_dir_all(&dir).await.map_err(staging_error)?;

        let mut file_name = parameter.id.file_stem();
        if let Some(Content::File(source)) = payload.content() {
            if let Some(extension) = source.extension().and_then(|e| e.to_str()) {
                file_name = format!("{}.{}", file_name, extension);
            }
        }
        let path = dir.join(file_name);

        let mut reader = payload.reader().await.map_err(staging_error)?;
        let mut file = tokio::fs::File::create(&path).await.map_err(staging_error)?;
        tokio::io::copy(&mut reader, &mut file)
            .await
            .map_err(staging_error)?;
        Ok(path)
    }

    /// Where the backend is expected to leave an output artifact.
    fn output_path(&self, workspace: &Path, parameter: &ParameterDescriptor) -> PathBuf {
        workspace.join(OUTPUTS_DIR).join(parameter.id.file_stem())
    }

    /// Perform the run. Implementations must stop promptly once `cancel` fires.
    async fn run(
        &self,
        invocation: &Invocation<'_>,
        cancel: CancellationToken,
    ) -> Result<(), BackendError>;

    /// Read a produced output back into memory.
    async fn collect_output(&self, staged: &StagedParameter) -> Result<Vec<u8>, BackendError> {
        match tokio::fs::read(&staged.path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(BackendError::MissingOutput {
                parameter: staged.id.to_string(),
                path: staged.path.clone(),
            }),
            Err(source) => Err(BackendError::Collect {
                parameter: staged.id.to_string(),
                source,
            }),
        }
    }
}
