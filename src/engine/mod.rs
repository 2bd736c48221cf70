// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Package execution engine.
//!
//! * `factory` - Chooses a backend for a package and builds its processor
//! * `processor` - Binds data and drives a single run through its lifecycle
//! * `workspace` - Per-run scratch directories
//! * `pool` - Bounded parallel execution of independent processors

pub mod factory;
pub mod pool;
pub mod processor;
pub mod workspace;
#[cfg(test)]
pub(crate) mod test_support;

pub use factory::ProcessorFactory;
pub use pool::ExecutionPool;
pub use processor::{PackageProcessor, RunState};
pub use workspace::Workspace;
