// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Structural problems found in a backend registry or a package descriptor
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Two registry entries share an id
    DuplicateBackendId {
        backend_id: String,
    },
    /// A backend declares no container kinds, so nothing could ever select it
    NoSupportedContainers {
        backend_id: String,
    },
    /// The resolved workspace template is not an absolute path
    RelativeWorkspace {
        backend_id: String,
        template: String,
    },
    /// A package declares the same parameter identity twice
    DuplicateParameterId {
        package: String,
        parameter: String,
    },
    /// A parameter permits no MIME type at all
    NoPermittedMimeTypes {
        package: String,
        parameter: String,
    },
    /// A package declares no container kind
    NoContainerKinds {
        package: String,
    },
    EmptyEntryPoint {
        package: String,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::DuplicateBackendId { backend_id } => {
                write!(f, "Duplicate backend ID: '{}'", backend_id)
            }
            ValidationError::NoSupportedContainers { backend_id } => {
                write!(f, "Backend '{}' declares no supported containers", backend_id)
            }
            ValidationError::RelativeWorkspace {
                backend_id,
                template,
            } => {
                write!(
                    f,
                    "Backend '{}' uses relative workspace template '{}'; an absolute path is required",
                    backend_id, template
                )
            }
            ValidationError::DuplicateParameterId { package, parameter } => {
                write!(f, "Package '{}' declares parameter '{}' more than once", package, parameter)
            }
            ValidationError::NoPermittedMimeTypes { package, parameter } => {
                write!(
                    f,
                    "Parameter '{}' of package '{}' permits no MIME types",
                    parameter, package
                )
            }
            ValidationError::NoContainerKinds { package } => {
                write!(f, "Package '{}' declares no container kinds", package)
            }
            ValidationError::EmptyEntryPoint { package } => {
                write!(f, "Package '{}' has an empty entry point", package)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Errors raised while reading registry or descriptor documents.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration validation failed:\n{}", join_lines(.0))]
    Invalid(Vec<ValidationError>),
}

fn join_lines(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
