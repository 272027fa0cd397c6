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

//! Plot command - render comparison charts

use flatbench_core::{run_plot, CommitHistory, Config, FlatbenchError, GitHistory, Result};
use std::io::{self, Write};

/// Render the charts selected by `config`.
///
/// The repository history is only read when no commit is given. With
/// `show` set, each chart path is printed to stdout.
pub fn plot(config: &Config) -> Result<()> {
    let git = config.repository.as_ref().map(GitHistory::new);
    let history = git.as_ref().map(|git| git as &dyn CommitHistory);
    let charts = run_plot(config, history)?;

    if config.show {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        for chart in &charts {
            writeln!(out, "{}", chart.path.display())
                .map_err(|e| FlatbenchError::io_error("<stdout>", e))?;
        }
    }
    Ok(())
}
