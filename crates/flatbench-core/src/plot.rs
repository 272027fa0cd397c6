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

//! Plot runs.
//!
//! Two comparisons are supported:
//!
//! - **libraries**: every library at one commit, charts written to
//!   `<output>/<commit>/plot/`
//! - **commits**: one library across several commits, charts written to
//!   `<output>/<c1,c2,...>-<library>/plot/`
//!
//! Chart names are derived from the bucket and its labels, so a rerun
//! replaces charts left by an interrupted run.

use crate::chart::{chart_file_name, chart_title, render_chart, ChartSpec};
use crate::config::{Config, Selection, PLOT_DIR};
use crate::error::{FlatbenchError, Result};
use crate::grouping::{group_by_mean, GroupedBenchmarks, GroupingEngine};
use crate::history::{latest_commit, CommitHistory};
use crate::stats::PivotedStats;
use crate::units::TimeUnit;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// A chart written by a plot run.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedChart {
    /// Where the chart was written.
    pub path: PathBuf,
    /// Unit of the y axis.
    pub unit: TimeUnit,
}

/// Run the plot selected by `config`.
///
/// `history` is only consulted when no commit is given.
pub fn run_plot(config: &Config, history: Option<&dyn CommitHistory>) -> Result<Vec<RenderedChart>> {
    match config.selection()? {
        Selection::Latest => {
            let history = history.ok_or_else(|| {
                FlatbenchError::config("a repository is required to find the latest commit")
            })?;
            let commit = latest_commit(history, &config.input)?;
            plot_libraries(config, &commit)
        }
        Selection::Libraries { commit } => plot_libraries(config, &commit),
        Selection::Commits { library, commits } => plot_commits(config, &library, &commits),
    }
}

/// Chart every library of one commit against each other.
pub fn plot_libraries(config: &Config, commit: &str) -> Result<Vec<RenderedChart>> {
    let stats = PivotedStats::read(&config.aggregate_path(commit))?;
    let grouped = group_by_mean(&stats.mean, config.grouping_options())?;
    let directory = config.output.join(commit).join(PLOT_DIR);
    info!(commit, buckets = bucket_count(&grouped), "plotting libraries");
    render_all(config, &grouped, &directory)
}

/// Chart one library across commits.
///
/// Every commit must have a result for every benchmark of the library that
/// any other commit has, otherwise the series is incomplete.
pub fn plot_commits(config: &Config, library: &str, commits: &[String]) -> Result<Vec<RenderedChart>> {
    let documents = commits
        .iter()
        .map(|commit| -> Result<_> {
            Ok((commit, PivotedStats::read(&config.aggregate_path(commit))?))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut engine = GroupingEngine::new(config.grouping_options());
    for (commit, stats) in &documents {
        for (group, benches) in &stats.mean {
            for (name, &value) in benches {
                let Some(key) = engine.classify(group, name)? else {
                    continue;
                };
                if key.library == library {
                    engine.push(group, &key, value, (*commit).clone());
                }
            }
        }
    }

    let grouped = engine.finish()?;
    if grouped.is_empty() {
        return Err(FlatbenchError::config(format!(
            "library '{}' has no results in commits {}",
            library,
            commits.join(",")
        )));
    }

    let directory = config
        .output
        .join(format!("{}-{}", commits.join(","), library))
        .join(PLOT_DIR);
    info!(library, commits = commits.len(), buckets = bucket_count(&grouped), "plotting commits");
    render_all(config, &grouped, &directory)
}

fn bucket_count(grouped: &GroupedBenchmarks) -> usize {
    grouped
        .values()
        .flat_map(|operations| operations.values())
        .map(|kinds| kinds.len())
        .sum()
}

fn render_all(config: &Config, grouped: &GroupedBenchmarks, directory: &Path) -> Result<Vec<RenderedChart>> {
    fs::create_dir_all(directory).map_err(|e| FlatbenchError::io_error(directory, e))?;

    let mut charts = Vec::new();
    for (group, operations) in grouped {
        for (operation, kinds) in operations {
            for (&kind, series) in kinds {
                let path = directory.join(chart_file_name(group, operation, kind, series.labels()));
                let title = chart_title(group, operation, kind);
                let spec = ChartSpec {
                    series,
                    title: &title,
                    style: config.style,
                };
                let unit = render_chart(&spec, &path)?;
                info!(path = %path.display(), unit = unit.symbol(), "wrote chart");
                charts.push(RenderedChart { path, unit });
            }
        }
    }
    Ok(charts)
}
