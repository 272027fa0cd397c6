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

//! Run configuration.
//!
//! Everything a run needs is passed explicitly through [`Config`]; nothing
//! is read from process-wide state.

use crate::chart::PlotStyle;
use crate::error::{FlatbenchError, Result};
use crate::grouping::GroupingOptions;
use crate::stats::AGGREGATE_FILE;
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Default criterion target directory.
pub const DEFAULT_TARGET: &str = "target";

/// Default directory holding per-commit results.
pub const DEFAULT_RESULTS: &str = "results";

/// Default criterion profile (baseline name).
pub const DEFAULT_PROFILE: &str = "base";

/// Name of the chart directory inside a results directory.
pub const PLOT_DIR: &str = "plot";

/// What a plot run compares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Compare libraries at the newest commit that has results.
    Latest,
    /// Compare libraries at one commit.
    Libraries {
        /// Short commit hash.
        commit: String,
    },
    /// Compare one library across commits.
    Commits {
        /// The library to follow.
        library: String,
        /// Commits to compare, as given.
        commits: Vec<String>,
    },
}

/// Flatbench configuration.
///
/// # Example
///
/// ```no_run
/// use flatbench_core::config::{Config, Selection};
///
/// let config = Config::default()
///     .with_commits(vec!["abc1234".to_string()])
///     .with_show(true);
/// assert_eq!(
///     config.selection().unwrap(),
///     Selection::Libraries { commit: "abc1234".to_string() }
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Cargo target directory containing `criterion/`.
    pub target: PathBuf,
    /// Directory of per-commit results to read.
    pub input: PathBuf,
    /// Directory to write results and charts to.
    pub output: PathBuf,
    /// Criterion profile to read.
    pub profile: String,
    /// Chart palette.
    pub style: PlotStyle,
    /// Repository whose history orders the results.
    pub repository: Option<PathBuf>,
    /// Explicit commits to plot.
    pub commits: Vec<String>,
    /// Library to follow across commits.
    pub library: Option<String>,
    /// Report each written chart.
    pub show: bool,
    /// Warn about benchmarks whose names cannot be classified.
    pub warn_skipped: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target: PathBuf::from(DEFAULT_TARGET),
            input: PathBuf::from(DEFAULT_RESULTS),
            output: PathBuf::from(DEFAULT_RESULTS),
            profile: DEFAULT_PROFILE.to_string(),
            style: PlotStyle::Pastel,
            repository: None,
            commits: Vec::new(),
            library: None,
            show: false,
            warn_skipped: false,
        }
    }
}

impl Config {
    /// Sets the criterion target directory.
    pub fn with_target(mut self, target: impl Into<PathBuf>) -> Self {
        self.target = target.into();
        self
    }

    /// Sets the results input directory.
    pub fn with_input(mut self, input: impl Into<PathBuf>) -> Self {
        self.input = input.into();
        self
    }

    /// Sets the output directory.
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    /// Sets the criterion profile.
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = profile.into();
        self
    }

    /// Sets the plotting style.
    pub fn with_style(mut self, style: PlotStyle) -> Self {
        self.style = style;
        self
    }

    /// Sets the repository path.
    pub fn with_repository(mut self, repository: impl Into<PathBuf>) -> Self {
        self.repository = Some(repository.into());
        self
    }

    /// Sets the explicit commit list.
    pub fn with_commits(mut self, commits: Vec<String>) -> Self {
        self.commits = commits;
        self
    }

    /// Sets the library to follow across commits.
    pub fn with_library(mut self, library: impl Into<String>) -> Self {
        self.library = Some(library.into());
        self
    }

    /// Sets the show flag.
    pub fn with_show(mut self, show: bool) -> Self {
        self.show = show;
        self
    }

    /// Enables warnings for unclassifiable benchmark names.
    pub fn with_warn_skipped(mut self, warn_skipped: bool) -> Self {
        self.warn_skipped = warn_skipped;
        self
    }

    /// Options for the grouping pass.
    pub fn grouping_options(&self) -> GroupingOptions {
        GroupingOptions {
            warn_skipped: self.warn_skipped,
        }
    }

    /// Aggregated document of `commit` under the input directory.
    pub fn aggregate_path(&self, commit: &str) -> PathBuf {
        self.input.join(commit).join(AGGREGATE_FILE)
    }

    /// Decide what to plot.
    ///
    /// With no commit given the newest commit is used, so a library alone
    /// would select one commit and one library, which is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`FlatbenchError::Config`] when:
    /// - a single commit and a library are both given
    /// - a library is given without at least two commits
    /// - several commits are given without a library
    /// - a commit is listed twice
    pub fn selection(&self) -> Result<Selection> {
        let unique: BTreeSet<&String> = self.commits.iter().collect();
        if unique.len() != self.commits.len() {
            return Err(FlatbenchError::config("a commit is listed more than once"));
        }

        match (self.commits.as_slice(), &self.library) {
            ([_], Some(_)) => Err(FlatbenchError::config(
                "cannot provide both a single commit and a single library",
            )),
            ([commit], None) => Ok(Selection::Libraries {
                commit: commit.clone(),
            }),
            ([], None) => Ok(Selection::Latest),
            ([], Some(_)) => Err(FlatbenchError::config(
                "comparing a library requires at least two commits",
            )),
            (commits, Some(library)) => Ok(Selection::Commits {
                library: library.clone(),
                commits: commits.to_vec(),
            }),
            (_, None) => Err(FlatbenchError::config(
                "must provide either a single commit or a single library",
            )),
        }
    }
}
