// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Capability tags used to match packages against backends.
//!
//! Both tags are closed sets. Backend selection is a set intersection over these
//! values, never a free-form string comparison.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of executable a code package bundles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContainerKind {
    PythonScript,
    RScript,
    ShellScript,
    NativeExecutable,
    ArcToolbox,
    JavaArchive,
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ContainerKind::PythonScript => "python-script",
            ContainerKind::RScript => "r-script",
            ContainerKind::ShellScript => "shell-script",
            ContainerKind::NativeExecutable => "native-executable",
            ContainerKind::ArcToolbox => "arc-toolbox",
            ContainerKind::JavaArchive => "java-archive",
        };
        f.write_str(name)
    }
}

/// Operating system family a backend can run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Linux,
    Windows,
    Macos,
    Freebsd,
}

impl Platform {
    /// Platform of the running process, or `None` on an OS outside the closed set.
    pub fn current() -> Option<Self> {
        match std::env::consts::OS {
            "linux" => Some(Platform::Linux),
            "windows" => Some(Platform::Windows),
            "macos" => Some(Platform::Macos),
            "freebsd" => Some(Platform::Freebsd),
            _ => None,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Platform::Linux => "linux",
            Platform::Windows => "windows",
            Platform::Macos => "macos",
            Platform::Freebsd => "freebsd",
        };
        f.write_str(name)
    }
}
