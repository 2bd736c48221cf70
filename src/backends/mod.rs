// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Backend drivers.
//!
//! A driver implements [`Backend`](crate::traits::Backend) and is attached to
//! registry entries by their `type`. Drivers are stateless and shared by `Arc`
//! between every processor that selects a backend of that type.
//!
//! # Available Backends
//!
//! ## Process Backend
//! Runs the package entry point as a child process, optionally through an
//! interpreter taken from the backend's properties.
//!
//! ## Stub Backends (Test-Only)
//! Simulated drivers for lifecycle tests (only available in test builds):
//! - **ConcatBackend**: succeeds and writes every output
//! - **FailingBackend**: fails after writing partial output
//! - **HangingBackend**: runs until cancelled
//! - **SilentBackend**: succeeds without writing outputs
//! - **ClobberingBackend**: fails and leaves a workspace that cannot be removed

pub mod process;
#[cfg(test)]
pub mod stub;

pub use process::ProcessBackend;
