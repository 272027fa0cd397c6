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

//! Criterion result aggregation and comparison charts.
//!
//! The pipeline has four stages:
//!
//! 1. [`stats`] walks a criterion target directory and pivots every
//!    `estimates.json` of one profile into a single document
//! 2. [`classify`] splits benchmark names of the form
//!    `<operation>_<numeric type>_<library>`
//! 3. [`grouping`] buckets the classified means by group, operation and
//!    numeric kind into aligned bar series
//! 4. [`chart`] renders each series as a grouped bar chart, with the time
//!    unit picked by [`units`]
//!
//! [`plot`] drives stages 2 to 4 for one commit or across commits, and
//! [`history`] resolves which commit is the newest one with results.
//!
//! # Example
//!
//! ```no_run
//! use flatbench_core::{aggregate, load_estimates, run_plot, Config};
//! use std::path::Path;
//!
//! # fn main() -> flatbench_core::Result<()> {
//! let estimates = load_estimates(Path::new("target"), "base")?;
//! aggregate(estimates).write(Path::new("results/abc1234/flatbench.json"))?;
//!
//! let config = Config::default().with_commits(vec!["abc1234".to_string()]);
//! for chart in run_plot(&config, None)? {
//!     println!("{}", chart.path.display());
//! }
//! # Ok(())
//! # }
//! ```

pub mod chart;
pub mod classify;
pub mod collect;
pub mod config;
mod error;
pub mod grouping;
pub mod history;
pub mod metadata;
pub mod plot;
pub mod stats;
pub mod units;

pub use chart::{render_chart, ChartSpec, PlotStyle};
pub use classify::{classify, BenchmarkKey, Kind, NumericType};
pub use collect::copy_profile;
pub use config::{Config, Selection};
pub use error::{FlatbenchError, Result};
pub use grouping::{group_by_mean, GroupedBenchmarks, GroupedSeries, GroupingEngine, GroupingOptions};
pub use history::{latest_commit, CommitHistory, GitHistory};
pub use metadata::{Metadata, RustcCli, ToolchainProbe};
pub use plot::{run_plot, RenderedChart};
pub use stats::{aggregate, load_estimates, PivotedStats, StatRecord};
pub use units::{select_unit, TimeUnit};
