// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Registry validation.
//!
//! Every check runs and every problem is reported, so a broken registry file can
//! be fixed in one pass:
//!
//! 1. **Uniqueness**: backend ids must be unique, otherwise `lookup` is ambiguous
//! 2. **Selectability**: a backend must support at least one container kind
//! 3. **Workspace**: the resolved template must be an absolute path

use std::collections::HashSet;
use std::path::Path;

use crate::config::registry::BackendRegistry;
use crate::errors::ValidationError;

pub fn validate_registry(registry: &BackendRegistry) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for backend in registry.iter() {
        if !seen.insert(backend.id.as_str()) {
            errors.push(ValidationError::DuplicateBackendId {
                backend_id: backend.id.clone(),
            });
        }

        if backend.supported_containers.is_empty() {
            errors.push(ValidationError::NoSupportedContainers {
                backend_id: backend.id.clone(),
            });
        }

        if !Path::new(&backend.workspace_template).is_absolute() {
            errors.push(ValidationError::RelativeWorkspace {
                backend_id: backend.id.clone(),
                template: backend.workspace_template.clone(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RegistryConfig;
    use crate::errors::ConfigError;

    fn errors_for(yaml: &str) -> Vec<ValidationError> {
        let cfg: RegistryConfig = serde_yaml::from_str(yaml).unwrap();
        match BackendRegistry::from_config(cfg) {
            Ok(_) => vec![],
            Err(ConfigError::Invalid(errors)) => errors,
            Err(other) => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_valid_registry_has_no_errors() {
        let errors = errors_for(
            r#"
backends:
  - id: python3
    supported_containers: [python-script]
  - id: rscript
    supported_containers: [r-script]
"#,
        );
        assert!(errors.is_empty());
    }

    #[test]
    fn test_relative_workspace_is_rejected() {
        let errors = errors_for(
            r#"
backends:
  - id: python3
    supported_containers: [python-script]
    temp_workspace: runs/$TEMP$
"#,
        );
        assert_eq!(
            errors,
            vec![ValidationError::RelativeWorkspace {
                backend_id: "python3".to_string(),
                template: "runs/$TEMP$".to_string(),
            }]
        );
    }

    #[test]
    fn test_all_problems_are_reported() {
        let errors = errors_for(
            r#"
backends:
  - id: a
    supported_containers: []
  - id: a
    supported_containers: [python-script]
"#,
        );
        assert_eq!(errors.len(), 2);
        assert!(errors.contains(&ValidationError::DuplicateBackendId {
            backend_id: "a".to_string()
        }));
        assert!(errors.contains(&ValidationError::NoSupportedContainers {
            backend_id: "a".to_string()
        }));
    }
}
