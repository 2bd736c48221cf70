// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Shared fixtures for engine tests.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::consts::RANDOM_DIR_TOKEN;
use crate::config::{BackendDescriptor, BackendType};
use crate::data::MediaPayload;
use crate::package::{ContainerKind, PackageDescriptor, ParameterDescriptor};

/// NDVI package: two required image inputs, an optional scale factor and one
/// image output.
pub fn ndvi_package() -> Arc<PackageDescriptor> {
    Arc::new(PackageDescriptor {
        name: "ndvi".to_string(),
        version: "1.0.0".to_string(),
        entry_point: PathBuf::from("ndvi.py"),
        root: None,
        containers: vec![ContainerKind::PythonScript],
        platforms: vec![],
        parameters: vec![
            ParameterDescriptor::input("NIR", &["image/*"]),
            ParameterDescriptor::input("RED", &["image/*"]),
            ParameterDescriptor::input("SCALE", &["text/plain"]).optional(),
            ParameterDescriptor::output("NDVI", &["image/*"]),
        ],
    })
}

/// Unrestricted python backend whose runs land under `<dir>/runs`.
pub fn backend_in(dir: &Path, id: &str) -> Arc<BackendDescriptor> {
    Arc::new(BackendDescriptor {
        id: id.to_string(),
        backend: BackendType::Process,
        supported_containers: HashSet::from([ContainerKind::PythonScript]),
        supported_platforms: None,
        workspace_template: format!("{}/runs/{}", dir.display(), RANDOM_DIR_TOKEN),
        properties: HashMap::new(),
    })
}

pub fn tiff(bytes: &[u8]) -> MediaPayload {
    MediaPayload::from_bytes(bytes.to_vec(), "image/tiff")
}
