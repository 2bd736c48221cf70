// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! Every diagnostic line the engine emits is a message struct implementing
//! `Display`, so wording lives in one place instead of being scattered through
//! the code as string literals.
//!
//! Messages are organized by subsystem:
//! * `messages::factory` - Backend selection
//! * `messages::processor` - Binding and run lifecycle events
//! * `messages::workspace` - Run directory allocation and removal
//!
//! # Usage
//!
//! ```rust
//! use the_codepack::observability::messages::processor::RunStarted;
//! use the_codepack::observability::messages::StructuredLog;
//!
//! let msg = RunStarted {
//!     package: "ndvi@1.0.0",
//!     backend_id: "python3",
//!     workspace: std::path::Path::new("/tmp/codepack/run"),
//!     input_count: 2,
//! };
//!
//! msg.log();
//! ```

pub mod messages;
