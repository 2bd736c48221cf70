// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod backends;   // backend drivers
pub mod config;     // registry loading + validation
pub mod data;       // payloads and binding tables
pub mod engine;     // factory, processor, workspace, pool
pub mod errors;     // error handling
pub mod observability;
pub mod package;    // package descriptors and capability tags
pub mod traits;     // backend abstraction
