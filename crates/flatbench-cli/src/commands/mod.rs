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

//! CLI command implementations

mod aggregate;
mod collect;
mod metadata;
mod plot;

pub use aggregate::aggregate;
pub use collect::collect;
pub use metadata::metadata;
pub use plot::plot;

use flatbench_core::config::DEFAULT_RESULTS;
use flatbench_core::{CommitHistory, GitHistory, Result};
use std::path::{Path, PathBuf};

/// History of the repository containing the criterion target directory.
pub(crate) fn target_history(target: &Path) -> GitHistory {
    match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => GitHistory::new(parent),
        _ => GitHistory::new("."),
    }
}

/// `results/<head commit>`, used when no output is given.
pub(crate) fn default_results_dir(target: &Path) -> Result<PathBuf> {
    let commit = target_history(target).head()?;
    Ok(Path::new(DEFAULT_RESULTS).join(commit))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_history_uses_parent() {
        assert_eq!(
            target_history(Path::new("/work/lexical/target")).repository(),
            Path::new("/work/lexical")
        );
    }

    #[test]
    fn test_target_history_relative_target() {
        assert_eq!(target_history(Path::new("target")).repository(), Path::new("."));
    }
}
