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

//! Aggregate command - pivot criterion estimates into one document

use super::default_results_dir;
use flatbench_core::stats::AGGREGATE_FILE;
use flatbench_core::{aggregate as pivot, load_estimates, Result};
use std::path::{Path, PathBuf};

/// Aggregate the `profile` estimates under `target` and write the document.
///
/// Without `output` the document goes to `results/<commit>/flatbench.json`,
/// where the commit is the head of the repository containing `target`.
///
/// Returns the path written.
///
/// # Errors
///
/// Fails without writing anything if any estimates file is unreadable or
/// malformed, or if the head commit cannot be determined.
pub fn aggregate(target: &Path, profile: &str, output: Option<PathBuf>) -> Result<PathBuf> {
    let estimates = load_estimates(target, profile)?;
    let stats = pivot(estimates);

    let output = match output {
        Some(path) => path,
        None => default_results_dir(target)?.join(AGGREGATE_FILE),
    };
    stats.write(&output)?;
    Ok(output)
}
