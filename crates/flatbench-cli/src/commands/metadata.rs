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

//! Metadata command

use super::{default_results_dir, target_history};
use flatbench_core::metadata::METADATA_FILE;
use flatbench_core::{Metadata, Result, RustcCli};
use std::path::{Path, PathBuf};

/// Write commit, platform and compiler information.
///
/// The commit is the head of the repository containing `target`. Without
/// `output` the document goes to `results/<commit>/metadata.json`.
pub fn metadata(
    target: &Path,
    output: Option<PathBuf>,
    rustc: &str,
    toolchain: Option<String>,
) -> Result<PathBuf> {
    let history = target_history(target);
    let document = Metadata::collect(&history, &RustcCli::new(rustc, toolchain))?;

    let output = match output {
        Some(path) => path,
        None => default_results_dir(target)?.join(METADATA_FILE),
    };
    document.write(&output)?;
    Ok(output)
}
