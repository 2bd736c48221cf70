// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Backend selection and processor construction.
//!
//! The factory owns the shared registry and the drivers that back each registry
//! entry. Drivers are resolved by backend type, with per-backend overrides taking
//! precedence so a single entry can be pointed at a custom driver.

use std::collections::HashMap;
use std::sync::Arc;

use crate::backends::ProcessBackend;
use crate::config::{BackendDescriptor, BackendRegistry, BackendType};
use crate::engine::processor::PackageProcessor;
use crate::errors::{EngineError, EngineResult};
use crate::observability::messages::factory::{
    BackendSelected, DriverUnavailable, NoCompatibleBackend,
};
use crate::observability::messages::StructuredLog;
use crate::package::{PackageDescriptor, Platform};
use crate::traits::Backend;

pub struct ProcessorFactory {
    registry: Arc<BackendRegistry>,
    type_drivers: HashMap<BackendType, Arc<dyn Backend>>,
    backend_drivers: HashMap<String, Arc<dyn Backend>>,
    platform: Option<Platform>,
}

impl ProcessorFactory {
    /// Factory with the built-in drivers, selecting for the host platform.
    pub fn new(registry: Arc<BackendRegistry>) -> Self {
        Self::empty(registry).with_type_driver(BackendType::Process, Arc::new(ProcessBackend::new()))
    }

    /// Factory with no drivers at all; every backend is skipped until one is registered.
    pub fn empty(registry: Arc<BackendRegistry>) -> Self {
        Self {
            registry,
            type_drivers: HashMap::new(),
            backend_drivers: HashMap::new(),
            platform: Platform::current(),
        }
    }

    pub fn with_type_driver(mut self, backend_type: BackendType, driver: Arc<dyn Backend>) -> Self {
        self.type_drivers.insert(backend_type, driver);
        self
    }

    pub fn with_backend_driver<S: Into<String>>(mut self, backend_id: S, driver: Arc<dyn Backend>) -> Self {
        self.backend_drivers.insert(backend_id.into(), driver);
        self
    }

    /// Select as if running on `platform`. `None` matches only unrestricted backends.
    pub fn with_platform(mut self, platform: Option<Platform>) -> Self {
        self.platform = platform;
        self
    }

    pub fn registry(&self) -> &Arc<BackendRegistry> {
        &self.registry
    }

    pub fn platform(&self) -> Option<Platform> {
        self.platform
    }

    /// Backends able to run `package` here, in declaration order.
    pub fn compatible_backends<'a>(
        &'a self,
        package: &'a PackageDescriptor,
    ) -> impl Iterator<Item = &'a Arc<BackendDescriptor>> + 'a {
        self.registry.iter().filter(move |backend| {
            backend.supports_any_container(&package.containers)
                && backend.supports_platform(self.platform)
        })
    }

    fn driver_for(&self, backend: &BackendDescriptor) -> Option<Arc<dyn Backend>> {
        self.backend_drivers
            .get(&backend.id)
            .or_else(|| self.type_drivers.get(&backend.backend))
            .cloned()
    }

    /// Pick the first compatible backend with a driver and bind a fresh processor to it.
    pub fn new_processor(&self, package: Arc<PackageDescriptor>) -> EngineResult<PackageProcessor> {
        let label = package.label();
        let candidates: Vec<&Arc<BackendDescriptor>> = self.compatible_backends(&package).collect();

        for backend in &candidates {
            let Some(driver) = self.driver_for(backend) else {
                DriverUnavailable {
                    backend_id: &backend.id,
                    backend_type: &backend.backend.to_string(),
                }
                .log();
                continue;
            };

            BackendSelected {
                package: &label,
                backend_id: &backend.id,
                candidate_count: candidates.len(),
            }
            .log();

            let retain = self.registry.executor_options().retain_workspace;
            return Ok(
                PackageProcessor::new(package.clone(), Arc::clone(backend), driver)
                    .retain_workspace(retain),
            );
        }

        let platform = self
            .platform
            .map(|p| p.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        let registered = self.registry.backend_ids();
        NoCompatibleBackend {
            package: &label,
            platform: &platform,
            registered: &registered,
        }
        .log();

        Err(EngineError::NoCompatibleBackend {
            package: label,
            platform,
        })
    }
}
