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

//! Criterion estimate loading and pivoting.
//!
//! Criterion stores one `estimates.json` per benchmark and profile:
//!
//! ```text
//! target/criterion/<group>/<bench>/<profile>/estimates.json
//! ```
//!
//! [`load_estimates`] reads all of them for one profile and [`aggregate`]
//! pivots them into the five tables of [`PivotedStats`].

use crate::error::{FlatbenchError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// File name criterion uses for point estimates.
pub const ESTIMATES_FILE: &str = "estimates.json";

/// File name of the aggregated document inside a commit's results directory.
pub const AGGREGATE_FILE: &str = "flatbench.json";

/// One statistic table: group → benchmark name → value.
pub type StatTable = BTreeMap<String, BTreeMap<String, f64>>;

/// Confidence interval of a criterion estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    /// Lower bound in nanoseconds.
    pub lower_bound: f64,
    /// Upper bound in nanoseconds.
    pub upper_bound: f64,
    /// Confidence level, e.g. `0.95`.
    pub confidence_level: f64,
}

/// The mean estimate with its confidence interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeanEstimate {
    /// Point estimate in nanoseconds.
    pub point_estimate: f64,
    /// Confidence interval around the point estimate.
    pub confidence_interval: ConfidenceInterval,
}

/// An estimate where only the point value is used.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointEstimate {
    /// Point estimate in nanoseconds.
    pub point_estimate: f64,
}

/// The parts of a criterion `estimates.json` that flatbench consumes.
///
/// Criterion writes more estimates (median, slope, MAD); those are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatRecord {
    /// Mean estimate.
    pub mean: MeanEstimate,
    /// Standard deviation estimate.
    pub std_dev: PointEstimate,
}

impl StatRecord {
    /// Parse a record from the text of an estimates file.
    ///
    /// # Errors
    ///
    /// Returns [`FlatbenchError::MalformedInput`] if the document is not
    /// JSON or lacks one of the required statistics.
    pub fn from_json(path: &Path, text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| FlatbenchError::malformed(path, e.to_string()))
    }
}

/// A record together with the benchmark it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct EstimateFile {
    /// Benchmark group, e.g. `parse`.
    pub group: String,
    /// Benchmark name, e.g. `parse_u8_core`.
    pub name: String,
    /// Where the record was read from.
    pub path: PathBuf,
    /// The parsed statistics.
    pub record: StatRecord,
}

/// Location of one profile directory in the criterion tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EstimateLocation {
    /// Benchmark group.
    pub group: String,
    /// Benchmark name.
    pub name: String,
    /// The `estimates.json` file.
    pub path: PathBuf,
}

impl EstimateLocation {
    /// The profile directory holding the estimates and criterion's other files.
    pub fn directory(&self) -> &Path {
        self.path.parent().unwrap_or(&self.path)
    }
}

/// Pivoted statistics: five parallel tables keyed by group then benchmark.
///
/// Field order is the serialized key order of the aggregated document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PivotedStats {
    /// Mean point estimates.
    pub mean: StatTable,
    /// Lower bounds of the mean's confidence interval.
    pub lower: StatTable,
    /// Upper bounds of the mean's confidence interval.
    pub upper: StatTable,
    /// Confidence levels of the mean's confidence interval.
    pub confidence: StatTable,
    /// Standard deviation point estimates.
    pub std_dev: StatTable,
}

impl PivotedStats {
    /// Create empty tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Write one record into all five tables.
    ///
    /// A second record for the same `(group, name)` replaces the first.
    pub fn insert(&mut self, group: &str, name: &str, record: &StatRecord) {
        let ci = &record.mean.confidence_interval;
        put(&mut self.mean, group, name, record.mean.point_estimate);
        put(&mut self.lower, group, name, ci.lower_bound);
        put(&mut self.upper, group, name, ci.upper_bound);
        put(&mut self.confidence, group, name, ci.confidence_level);
        put(&mut self.std_dev, group, name, record.std_dev.point_estimate);
    }

    /// Number of benchmarks in the mean table.
    pub fn len(&self) -> usize {
        self.mean.values().map(BTreeMap::len).sum()
    }

    /// Returns `true` if no benchmark was recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Serialize to pretty JSON with two-space indentation.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse an aggregated document.
    ///
    /// # Errors
    ///
    /// Returns [`FlatbenchError::MalformedInput`] if any of the five tables
    /// is missing or holds a non-numeric value.
    pub fn from_json(path: &Path, text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| FlatbenchError::malformed(path, e.to_string()))
    }

    /// Read an aggregated document from disk.
    pub fn read(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| FlatbenchError::io_error(path, e))?;
        Self::from_json(path, &text)
    }

    /// Write the aggregated document, creating parent directories.
    pub fn write(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| FlatbenchError::io_error(parent, e))?;
        }
        fs::write(path, json).map_err(|e| FlatbenchError::io_error(path, e))?;
        info!(path = %path.display(), benchmarks = self.len(), "wrote aggregated results");
        Ok(())
    }
}

fn put(table: &mut StatTable, group: &str, name: &str, value: f64) {
    table
        .entry(group.to_string())
        .or_default()
        .insert(name.to_string(), value);
}

/// Pivot loaded estimates into [`PivotedStats`].
pub fn aggregate<I>(estimates: I) -> PivotedStats
where
    I: IntoIterator<Item = EstimateFile>,
{
    let mut stats = PivotedStats::new();
    for estimate in estimates {
        stats.insert(&estimate.group, &estimate.name, &estimate.record);
    }
    stats
}

/// Find every `estimates.json` of `profile` below `<target>/criterion`.
///
/// The group is the directory two levels above the profile directory and
/// the benchmark name the directory directly above it. Results are ordered
/// by path so repeated runs see the same sequence.
///
/// # Errors
///
/// Returns [`FlatbenchError::Io`] if the criterion directory is missing or
/// cannot be traversed.
pub fn find_estimates(target: &Path, profile: &str) -> Result<Vec<EstimateLocation>> {
    let root = target.join("criterion");
    let mut locations = Vec::new();

    for entry in WalkDir::new(&root).sort_by_file_name() {
        let entry = entry.map_err(|e| FlatbenchError::Io {
            path: e.path().unwrap_or(&root).to_path_buf(),
            message: e.to_string(),
        })?;
        // group/bench/profile/estimates.json
        if entry.depth() < 4 || !entry.file_type().is_file() {
            continue;
        }
        if entry.file_name() != ESTIMATES_FILE {
            continue;
        }

        let path = entry.path();
        let mut ancestors = path.ancestors().skip(1).map(dir_name);
        let (Some(dir), Some(name), Some(group)) =
            (ancestors.next(), ancestors.next(), ancestors.next())
        else {
            continue;
        };
        if dir != profile {
            continue;
        }

        locations.push(EstimateLocation {
            group,
            name,
            path: path.to_path_buf(),
        });
    }

    debug!(root = %root.display(), profile, count = locations.len(), "found estimates");
    Ok(locations)
}

fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Read and parse every estimates file of `profile`.
///
/// All files are parsed before anything is returned, so a malformed file
/// aborts the run before any output exists.
pub fn load_estimates(target: &Path, profile: &str) -> Result<Vec<EstimateFile>> {
    find_estimates(target, profile)?
        .into_iter()
        .map(|location| {
            let text = fs::read_to_string(&location.path)
                .map_err(|e| FlatbenchError::io_error(&location.path, e))?;
            let record = StatRecord::from_json(&location.path, &text)?;
            Ok(EstimateFile {
                group: location.group,
                name: location.name,
                path: location.path,
                record,
            })
        })
        .collect()
}
