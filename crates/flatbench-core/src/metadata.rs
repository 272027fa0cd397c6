// Dweve Flatbench - Benchmark aggregation and comparison plots
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Run metadata: commit, platform and toolchain.
//!
//! Stored next to the aggregated results so runs on different machines or
//! compilers are not compared blindly.

use crate::error::{FlatbenchError, Result};
use crate::history::{run_command, CommitHistory};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::process::Command;
use sysinfo::System;
use tracing::info;

/// File name of the metadata document inside a commit's results directory.
pub const METADATA_FILE: &str = "metadata.json";

/// `rustc --version --verbose` output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RustcInfo {
    /// Everything after `rustc` on the first line, e.g. `1.81.0 (eeb90cda1 2024-09-04)`.
    pub version: String,
    /// The `key: value` lines (`binary`, `commit-hash`, `host`, `LLVM version`, ...).
    #[serde(flatten)]
    pub fields: BTreeMap<String, String>,
}

/// Parse verbose rustc version output.
///
/// ```text
/// rustc 1.81.0 (eeb90cda1 2024-09-04)
/// binary: rustc
/// host: x86_64-unknown-linux-gnu
/// LLVM version: 18.1.7
/// ```
pub fn parse_rustc_verbose(output: &str) -> Result<RustcInfo> {
    let source = Path::new("rustc --version --verbose");
    let mut lines = output.lines().map(str::trim).filter(|l| !l.is_empty());

    let version = lines
        .next()
        .and_then(|first| first.split_once(char::is_whitespace))
        .map(|(_, rest)| rest.trim().to_string())
        .ok_or_else(|| FlatbenchError::malformed(source, "missing version line"))?;

    let mut fields = BTreeMap::new();
    for line in lines {
        let (key, value) = line
            .split_once(':')
            .ok_or_else(|| FlatbenchError::malformed(source, format!("unexpected line '{}'", line)))?;
        fields.insert(key.trim().to_string(), value.trim().to_string());
    }

    Ok(RustcInfo { version, fields })
}

/// Source of compiler information.
pub trait ToolchainProbe {
    /// Describe the compiler that built the benchmarks.
    fn rustc_info(&self) -> Result<RustcInfo>;
}

/// Runs `rustc [+toolchain] --version --verbose`.
#[derive(Debug, Clone)]
pub struct RustcCli {
    rustc: String,
    toolchain: Option<String>,
}

impl RustcCli {
    /// Probe the given compiler, optionally through a rustup toolchain.
    pub fn new(rustc: impl Into<String>, toolchain: Option<String>) -> Self {
        Self {
            rustc: rustc.into(),
            toolchain,
        }
    }
}

impl Default for RustcCli {
    fn default() -> Self {
        Self::new("rustc", None)
    }
}

impl ToolchainProbe for RustcCli {
    fn rustc_info(&self) -> Result<RustcInfo> {
        let mut command = Command::new(&self.rustc);
        if let Some(toolchain) = &self.toolchain {
            command.arg(format!("+{}", toolchain));
        }
        command.args(["--version", "--verbose"]);
        parse_rustc_verbose(&run_command(&mut command)?)
    }
}

/// Host platform description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformInfo {
    /// Operating system, e.g. `linux`.
    pub system: String,
    /// CPU architecture, e.g. `x86_64`.
    pub machine: String,
    /// OS family, e.g. `unix`.
    pub family: String,
    /// CPU brand string, when the OS reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processor: Option<String>,
    /// Kernel release, e.g. `6.8.0-45-generic`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release: Option<String>,
    /// OS version, e.g. `22.04` or `14.5`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl PlatformInfo {
    /// The platform this binary runs on.
    pub fn current() -> Self {
        let mut system = System::new();
        system.refresh_cpu();
        let processor = system
            .cpus()
            .first()
            .map(|cpu| cpu.brand().trim().to_string())
            .filter(|brand| !brand.is_empty());

        Self {
            system: std::env::consts::OS.to_string(),
            machine: std::env::consts::ARCH.to_string(),
            family: std::env::consts::FAMILY.to_string(),
            processor,
            release: System::kernel_version(),
            version: System::os_version(),
        }
    }
}

/// The metadata document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Short hash of the benchmarked commit.
    pub commit: String,
    /// Host platform.
    pub platform: PlatformInfo,
    /// Compiler information.
    pub rust: RustcInfo,
}

impl Metadata {
    /// Gather metadata from the collaborators.
    pub fn collect(history: &dyn CommitHistory, toolchain: &dyn ToolchainProbe) -> Result<Self> {
        Ok(Self {
            commit: history.head()?,
            platform: PlatformInfo::current(),
            rust: toolchain.rustc_info()?,
        })
    }

    /// Write the document as pretty JSON, creating parent directories.
    pub fn write(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| FlatbenchError::io_error(parent, e))?;
        }
        fs::write(path, json).map_err(|e| FlatbenchError::io_error(path, e))?;
        info!(path = %path.display(), commit = %self.commit, "wrote metadata");
        Ok(())
    }
}
