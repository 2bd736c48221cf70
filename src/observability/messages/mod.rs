// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! * `factory` - Backend selection and driver resolution
//! * `processor` - Parameter binding and run lifecycle
//! * `workspace` - Workspace allocation, retention and removal

use tracing::Span;

pub mod factory;
pub mod processor;
pub mod workspace;

/// A message that knows its own log level and structured fields.
pub trait StructuredLog {
    /// Emit the message at its documented level with structured fields attached.
    fn log(&self);

    /// A span carrying the same fields, for scoping work under this event.
    fn span(&self, name: &str) -> Span {
        tracing::info_span!("event", span_name = name)
    }
}
