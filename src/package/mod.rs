// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod capability;
mod descriptor;

pub use capability::{ContainerKind, Platform};
pub use descriptor::{
    load_package_descriptor, Direction, PackageDescriptor, ParameterDescriptor, ParameterId,
};
