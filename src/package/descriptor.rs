// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Read-only view of a code package's description document.
//!
//! The package archive format lives elsewhere; this crate only needs the parsed
//! description: identity, entry point, declared parameters and the capability
//! tags used for backend selection. Descriptors are immutable once built and are
//! shared between processors through `Arc`.
//!
//! # Example
//! ```yaml
//! name: ndvi
//! version: "1.0.0"
//! entry_point: ndvi.py
//! containers: [python-script]
//! platforms: [linux, windows]
//! parameters:
//!   - id: NIR
//!     direction: input
//!     mime_types: ["image/*"]
//!   - id: RED
//!     direction: input
//!     mime_types: ["image/*"]
//!   - id: NDVI
//!     direction: output
//!     mime_types: ["image/*"]
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::read_document;
use crate::data::mime;
use crate::errors::{ConfigError, ValidationError};
use crate::package::capability::{ContainerKind, Platform};

/// Identity of a parameter within one package.
///
/// Integers deserialize to `Position`, strings to `Name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterId {
    Position(u32),
    Name(String),
}

impl ParameterId {
    /// File-system safe rendering used for staged input and output file names.
    ///
    /// Distinct identities always give distinct stems. Positions render as
    /// `param-<n>`. Names keep ASCII letters and digits, write `_` as `__` and every
    /// other byte as `_<hex>`, so a name stem never contains `-`.
    pub fn file_stem(&self) -> String {
        match self {
            ParameterId::Position(position) => format!("param-{}", position),
            ParameterId::Name(name) => {
                let mut stem = String::with_capacity(name.len());
                for byte in name.bytes() {
                    match byte {
                        b'_' => stem.push_str("__"),
                        b if b.is_ascii_alphanumeric() => stem.push(b as char),
                        b => stem.push_str(&format!("_{:02x}", b)),
                    }
                }
                stem
            }
        }
    }
}

impl fmt::Display for ParameterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterId::Position(position) => write!(f, "#{}", position),
            ParameterId::Name(name) => f.write_str(name),
        }
    }
}

impl From<u32> for ParameterId {
    fn from(position: u32) -> Self {
        ParameterId::Position(position)
    }
}

impl From<&str> for ParameterId {
    fn from(name: &str) -> Self {
        ParameterId::Name(name.to_string())
    }
}

impl From<String> for ParameterId {
    fn from(name: String) -> Self {
        ParameterId::Name(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Input,
    Output,
}

fn default_required() -> bool {
    true
}

/// A single declared input or output slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    pub id: ParameterId,
    pub direction: Direction,
    /// Permitted MIME types; `type/*` and `*/*` wildcards are allowed.
    pub mime_types: Vec<String>,
    #[serde(default = "default_required")]
    pub required: bool,
    /// Command-line flag emitted before the staged path, e.g. `--nir`.
    #[serde(default)]
    pub prefix: Option<String>,
}

impl ParameterDescriptor {
    pub fn input<I: Into<ParameterId>>(id: I, mime_types: &[&str]) -> Self {
        Self::new(id.into(), Direction::Input, mime_types)
    }

    pub fn output<I: Into<ParameterId>>(id: I, mime_types: &[&str]) -> Self {
        Self::new(id.into(), Direction::Output, mime_types)
    }

    fn new(id: ParameterId, direction: Direction, mime_types: &[&str]) -> Self {
        Self {
            id,
            direction,
            mime_types: mime_types.iter().map(|m| m.to_string()).collect(),
            required: true,
            prefix: None,
        }
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = Some(prefix.to_string());
        self
    }

    pub fn is_input(&self) -> bool {
        self.direction == Direction::Input
    }

    pub fn is_output(&self) -> bool {
        self.direction == Direction::Output
    }

    /// Whether a payload of `mime_type` may occupy this slot.
    pub fn permits(&self, mime_type: &str) -> bool {
        self.mime_types
            .iter()
            .any(|pattern| mime::matches(pattern, mime_type))
    }
}

/// Parsed, immutable description of a code package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageDescriptor {
    pub name: String,
    pub version: String,
    /// Bundled executable or script, relative to `root` when one is set.
    pub entry_point: PathBuf,
    /// Directory the package archive was extracted to.
    #[serde(default)]
    pub root: Option<PathBuf>,
    pub containers: Vec<ContainerKind>,
    #[serde(default)]
    pub platforms: Vec<Platform>,
    pub parameters: Vec<ParameterDescriptor>,
}

impl PackageDescriptor {
    pub fn parameter(&self, id: &ParameterId) -> Option<&ParameterDescriptor> {
        self.parameters.iter().find(|p| &p.id == id)
    }

    pub fn inputs(&self) -> impl Iterator<Item = &ParameterDescriptor> {
        self.parameters.iter().filter(|p| p.is_input())
    }

    pub fn outputs(&self) -> impl Iterator<Item = &ParameterDescriptor> {
        self.parameters.iter().filter(|p| p.is_output())
    }

    /// Absolute (or root-relative) path of the bundled entry point.
    pub fn entry_point_path(&self) -> PathBuf {
        match &self.root {
            Some(root) => root.join(&self.entry_point),
            None => self.entry_point.clone(),
        }
    }

    /// `name@version`, used in log lines and errors.
    pub fn label(&self) -> String {
        format!("{}@{}", self.name, self.version)
    }

    /// Check the structural invariants the engine relies on.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        let package = self.label();

        if self.entry_point.as_os_str().is_empty() {
            errors.push(ValidationError::EmptyEntryPoint {
                package: package.clone(),
            });
        }

        if self.containers.is_empty() {
            errors.push(ValidationError::NoContainerKinds {
                package: package.clone(),
            });
        }

        let mut seen = HashSet::new();
        for parameter in &self.parameters {
            if !seen.insert(&parameter.id) {
                errors.push(ValidationError::DuplicateParameterId {
                    package: package.clone(),
                    parameter: parameter.id.to_string(),
                });
            }
            if parameter.mime_types.is_empty() {
                errors.push(ValidationError::NoPermittedMimeTypes {
                    package: package.clone(),
                    parameter: parameter.id.to_string(),
                });
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Load a descriptor from YAML, JSON or TOML (chosen by extension) and validate it.
///
/// A relative `root` (or a missing one) is resolved against the descriptor's directory,
/// which is itself made absolute against the current directory.
pub fn load_package_descriptor<P: AsRef<Path>>(path: P) -> Result<PackageDescriptor, ConfigError> {
    let path = path.as_ref();
    let mut descriptor: PackageDescriptor = read_document(path)?;

    let mut base = path.parent().map(Path::to_path_buf).unwrap_or_default();
    // Runs execute inside their workspace, so the entry point must not stay relative.
    if base.is_relative() {
        let cwd = std::env::current_dir().map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        base = cwd.join(base);
    }
    descriptor.root = Some(match descriptor.root.take() {
        Some(root) if root.is_absolute() => root,
        Some(root) => base.join(root),
        None => base,
    });

    descriptor.validate().map_err(ConfigError::Invalid)?;
    Ok(descriptor)
}
