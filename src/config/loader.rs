// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::errors::ConfigError;
use crate::package::{ContainerKind, Platform};

/// Backend registry document.
///
/// Loaded once at process start and turned into a [`BackendRegistry`](crate::config::BackendRegistry).
/// YAML, JSON and TOML are accepted; the format follows the file extension.
///
/// # Example
/// ```yaml
/// defaults:
///   temp_workspace: /tmp/codepack/$TEMP$
///   available_platforms: [linux, windows]
///   properties:
///     env.LC_ALL: C
/// executor_options:
///   max_concurrency: 4
///   timeout_seconds: 600
/// backends:
///   - id: python3
///     type: process
///     supported_containers: [python-script]
///     properties:
///       interpreter: python3
///   - id: arcgis
///     supported_containers: arc-toolbox
///     available_platforms: windows
/// ```
#[derive(Debug, Deserialize)]
pub struct RegistryConfig {
    #[serde(default)]
    pub defaults: BackendDefaults,
    #[serde(default)]
    pub executor_options: ExecutorOptions,
    pub backends: Vec<BackendConfig>,
}

/// Settings every backend inherits unless it overrides them.
#[derive(Debug, Deserialize, Default)]
pub struct BackendDefaults {
    pub temp_workspace: Option<String>,
    #[serde(default)]
    pub available_platforms: Option<OneOrMany<Platform>>,
    #[serde(default)]
    pub properties: HashMap<String, String>,
}

/// Executor-specific configuration options.
///
/// # Fields
/// * `max_concurrency` - Maximum number of runs an `ExecutionPool` allows at once (optional)
/// * `timeout_seconds` - Default run timeout; zero or absent means unbounded (optional)
/// * `retain_workspace` - Keep run directories after completion for inspection
#[derive(Debug, Deserialize, Default, Clone)]
pub struct ExecutorOptions {
    pub max_concurrency: Option<usize>,
    pub timeout_seconds: Option<u64>,
    #[serde(default)]
    pub retain_workspace: bool,
}

impl ExecutorOptions {
    pub fn timeout(&self) -> Option<std::time::Duration> {
        self.timeout_seconds
            .filter(|secs| *secs > 0)
            .map(std::time::Duration::from_secs)
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
            .unwrap_or_else(|| {
                std::thread::available_parallelism()
                    .map(|n| n.get())
                    .unwrap_or(4)
            })
            .max(1)
    }
}

/// Driver implementation behind a backend entry.
///
/// # Variants
/// * `Process` - Runs the package entry point as an operating system process
#[derive(Debug, Deserialize, PartialEq, Eq, Hash, Clone, Copy, Default)]
#[serde(rename_all = "snake_case")]
pub enum BackendType {
    #[default]
    Process,
}

impl std::fmt::Display for BackendType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendType::Process => write!(f, "process"),
        }
    }
}

/// One backend entry as written in the registry document.
#[derive(Debug, Deserialize)]
pub struct BackendConfig {
    pub id: String,
    #[serde(rename = "type", default)]
    pub backend: BackendType,
    pub supported_containers: OneOrMany<ContainerKind>,
    #[serde(default)]
    pub available_platforms: Option<OneOrMany<Platform>>,
    #[serde(default)]
    pub temp_workspace: Option<String>,
    #[serde(default)]
    pub properties: HashMap<String, String>,
}

/// A field that may be written as a single value or as a list.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(value) => vec![value],
            OneOrMany::Many(values) => values,
        }
    }
}

/// Deserialize a document, picking the parser from the file extension (YAML by default).
pub fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    let document = match extension.as_deref() {
        Some("json") => serde_json::from_str(&content)?,
        Some("toml") => toml::from_str(&content)?,
        _ => serde_yaml::from_str(&content)?,
    };
    Ok(document)
}

/// Load a registry document without validating it
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<RegistryConfig, ConfigError> {
    read_document(path.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_basic_config() {
        let yaml = r#"
backends:
  - id: python3
    supported_containers: [python-script]
    properties:
      interpreter: python3
  - id: arcgis
    type: process
    supported_containers: arc-toolbox
    available_platforms: windows
"#;

        let cfg: RegistryConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.backends.len(), 2);
        assert_eq!(cfg.backends[0].backend, BackendType::Process);
        assert_eq!(
            cfg.backends[1].supported_containers.clone().into_vec(),
            vec![ContainerKind::ArcToolbox]
        );
        assert_eq!(
            cfg.backends[1].available_platforms,
            Some(OneOrMany::One(Platform::Windows))
        );
        assert!(cfg.defaults.temp_workspace.is_none());
        assert!(!cfg.executor_options.retain_workspace);
    }

    #[test]
    fn test_executor_options_timeout() {
        let unbounded = ExecutorOptions {
            timeout_seconds: Some(0),
            ..Default::default()
        };
        assert_eq!(unbounded.timeout(), None);

        let bounded = ExecutorOptions {
            timeout_seconds: Some(30),
            ..Default::default()
        };
        assert_eq!(bounded.timeout(), Some(std::time::Duration::from_secs(30)));
    }

    #[test]
    fn test_max_concurrency_is_at_least_one() {
        let options = ExecutorOptions {
            max_concurrency: Some(0),
            ..Default::default()
        };
        assert_eq!(options.max_concurrency(), 1);
        assert!(ExecutorOptions::default().max_concurrency() >= 1);
    }

    #[test]
    fn test_read_document_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let json = dir.path().join("registry.json");
        std::fs::write(
            &json,
            r#"{"backends": [{"id": "sh", "supported_containers": ["shell-script"]}]}"#,
        )
        .unwrap();
        assert_eq!(load_config(&json).unwrap().backends[0].id, "sh");

        let toml_path = dir.path().join("registry.toml");
        std::fs::write(
            &toml_path,
            "[[backends]]\nid = \"r\"\nsupported_containers = [\"r-script\"]\n",
        )
        .unwrap();
        assert_eq!(load_config(&toml_path).unwrap().backends[0].id, "r");

        let missing = load_config(dir.path().join("missing.yaml"));
        assert!(matches!(missing, Err(ConfigError::Io { .. })));
    }
}
