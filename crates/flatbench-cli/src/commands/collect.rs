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

//! Collect command - copy raw criterion output

use super::default_results_dir;
use flatbench_core::{copy_profile, Result};
use std::path::{Path, PathBuf};

/// Copy the `profile` directories under `target` to `output`, or to
/// `results/<commit>` when no output is given.
///
/// Returns the destination directory.
pub fn collect(target: &Path, profile: &str, output: Option<PathBuf>) -> Result<PathBuf> {
    let output = match output {
        Some(path) => path,
        None => default_results_dir(target)?,
    };
    copy_profile(target, profile, &output)?;
    Ok(output)
}
