// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod mime;
mod payload;
mod table;

pub use payload::{Content, MediaPayload};
pub use table::BindingTable;
