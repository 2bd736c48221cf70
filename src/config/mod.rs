// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod loader;
mod registry;
mod validation;

pub mod consts;

pub use loader::{
    load_config, read_document, BackendConfig, BackendDefaults, BackendType, ExecutorOptions,
    OneOrMany, RegistryConfig,
};
pub use registry::{load_registry, BackendDescriptor, BackendRegistry};
pub use validation::validate_registry;
