// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod backend;
mod config;
mod engine;
mod workspace;

pub use backend::BackendError;
pub use config::{ConfigError, ValidationError};
pub use engine::{BindingError, EngineError, EngineResult, ErrorKind};
pub use workspace::WorkspaceError;
