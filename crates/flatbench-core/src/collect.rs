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

//! Copying raw criterion output for one profile.
//!
//! Criterion data is large, so the aggregated document is usually all that
//! is kept. This keeps the raw files when they are needed later.

use crate::error::{FlatbenchError, Result};
use crate::stats::find_estimates;
use std::fs;
use std::path::Path;
use tracing::info;

/// Copy every file of each `<group>/<bench>/<profile>/` directory to
/// `<output>/<group>/<bench>/`.
///
/// Returns the number of files copied. Subdirectories of the profile
/// directory are not copied.
pub fn copy_profile(target: &Path, profile: &str, output: &Path) -> Result<usize> {
    let mut copied = 0;
    for location in find_estimates(target, profile)? {
        let source = location.directory();
        let destination = output.join(&location.group).join(&location.name);
        fs::create_dir_all(&destination).map_err(|e| FlatbenchError::io_error(&destination, e))?;

        let entries = fs::read_dir(source).map_err(|e| FlatbenchError::io_error(source, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| FlatbenchError::io_error(source, e))?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let to = destination.join(entry.file_name());
            fs::copy(&path, &to).map_err(|e| FlatbenchError::io_error(&path, e))?;
            copied += 1;
        }
    }

    info!(output = %output.display(), files = copied, "copied criterion results");
    Ok(copied)
}
