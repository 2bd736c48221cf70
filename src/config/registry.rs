// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Read-only backend registry.
//!
//! The registry is built once from a [`RegistryConfig`] and then shared by `Arc`
//! between the factory and every processor it creates. Nothing mutates it after
//! construction, so concurrent runs need no synchronization to read it.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use crate::config::consts::{DEFAULT_WORKSPACE_DIR, RANDOM_DIR_TOKEN};
use crate::config::loader::{load_config, BackendType, ExecutorOptions, RegistryConfig};
use crate::config::validation::validate_registry;
use crate::errors::ConfigError;
use crate::package::{ContainerKind, Platform};

/// A backend entry with defaults already applied.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendDescriptor {
    pub id: String,
    pub backend: BackendType,
    pub supported_containers: HashSet<ContainerKind>,
    /// `None` means the backend runs on any platform.
    pub supported_platforms: Option<HashSet<Platform>>,
    /// May contain [`RANDOM_DIR_TOKEN`].
    pub workspace_template: String,
    pub properties: HashMap<String, String>,
}

impl BackendDescriptor {
    /// Whether any of the package's container kinds is supported here.
    pub fn supports_any_container(&self, kinds: &[ContainerKind]) -> bool {
        kinds.iter().any(|kind| self.supported_containers.contains(kind))
    }

    pub fn supports_platform(&self, platform: Option<Platform>) -> bool {
        match (&self.supported_platforms, platform) {
            (None, _) => true,
            (Some(platforms), Some(platform)) => platforms.contains(&platform),
            (Some(_), None) => false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BackendRegistry {
    /// Declaration order is preserved; it is the selection tie-break.
    backends: Vec<Arc<BackendDescriptor>>,
    default_workspace_template: String,
    executor_options: ExecutorOptions,
}

impl BackendRegistry {
    /// Apply defaults to every entry and validate the result.
    pub fn from_config(cfg: RegistryConfig) -> Result<Self, ConfigError> {
        let RegistryConfig {
            defaults,
            executor_options,
            backends,
        } = cfg;

        let default_workspace_template = defaults
            .temp_workspace
            .filter(|ws| !ws.trim().is_empty())
            .unwrap_or_else(system_workspace_template);
        let default_platforms = defaults
            .available_platforms
            .map(|p| p.into_vec().into_iter().collect::<HashSet<_>>());

        let backends = backends
            .into_iter()
            .map(|entry| {
                let mut properties = defaults.properties.clone();
                properties.extend(entry.properties);

                Arc::new(BackendDescriptor {
                    id: entry.id,
                    backend: entry.backend,
                    supported_containers: entry.supported_containers.into_vec().into_iter().collect(),
                    supported_platforms: entry
                        .available_platforms
                        .map(|p| p.into_vec().into_iter().collect())
                        .or_else(|| default_platforms.clone()),
                    workspace_template: entry
                        .temp_workspace
                        .filter(|ws| !ws.trim().is_empty())
                        .unwrap_or_else(|| default_workspace_template.clone()),
                    properties,
                })
            })
            .collect::<Vec<_>>();

        let registry = Self {
            backends,
            default_workspace_template,
            executor_options,
        };
        validate_registry(&registry).map_err(ConfigError::Invalid)?;
        Ok(registry)
    }

    pub fn lookup(&self, backend_id: &str) -> Option<&BackendDescriptor> {
        self.backends
            .iter()
            .find(|b| b.id == backend_id)
            .map(|b| b.as_ref())
    }

    /// Backends in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<BackendDescriptor>> {
        self.backends.iter()
    }

    pub fn backend_ids(&self) -> Vec<&str> {
        self.backends.iter().map(|b| b.id.as_str()).collect()
    }

    pub fn default_workspace_template(&self) -> &str {
        &self.default_workspace_template
    }

    pub fn executor_options(&self) -> &ExecutorOptions {
        &self.executor_options
    }
}

fn system_workspace_template() -> String {
    std::env::temp_dir()
        .join(DEFAULT_WORKSPACE_DIR)
        .join(RANDOM_DIR_TOKEN)
        .to_string_lossy()
        .into_owned()
}

/// Load, resolve and validate a registry document.
pub fn load_registry<P: AsRef<Path>>(path: P) -> Result<BackendRegistry, ConfigError> {
    BackendRegistry::from_config(load_config(path)?)
}
