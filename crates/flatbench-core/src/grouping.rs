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

//! Grouping of classified benchmarks into chart series.
//!
//! Every comparison benchmark lands in a bucket keyed by
//! `(group, operation, kind)`. Each bucket becomes one [`GroupedSeries`]:
//!
//! ```text
//! parse/parse/int
//!   ticks:  [u8, u16]
//!   labels: [core, lexical]
//!   values: core    -> [9.9, 12.1]
//!           lexical -> [8.8, 10.3]
//! ```
//!
//! Values are placed by tick rather than appended, and a bucket where some
//! library lacks a tick is rejected instead of being drawn shifted.

use crate::classify::{classify, BenchmarkKey, Kind, NumericType};
use crate::error::{FlatbenchError, Result};
use crate::stats::StatTable;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// Grouped output: group → operation → kind → series.
pub type GroupedBenchmarks = BTreeMap<String, BTreeMap<String, BTreeMap<Kind, GroupedSeries>>>;

/// Options for the grouping pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroupingOptions {
    /// Emit a warning for each benchmark left out for having the wrong
    /// number of key tokens. Off by default.
    pub warn_skipped: bool,
}

/// Identifies one chart.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BucketKey {
    /// Benchmark group.
    pub group: String,
    /// Operation token of the benchmark key.
    pub operation: String,
    /// Integer or float bucket.
    pub kind: Kind,
}

/// One observation inside a bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedEntry {
    /// Operand type, the chart tick.
    pub numeric_type: NumericType,
    /// Mean time in nanoseconds.
    pub value: f64,
    /// Library (or commit) the value belongs to, the legend label.
    pub label: String,
}

/// Chart-ready series for one bucket.
///
/// Built only through [`GroupedSeries::from_entries`], which guarantees:
/// ticks are unique and in numeric-type order, labels are unique and in
/// lexical order, and every label has exactly one value per tick.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedSeries {
    ticks: Vec<NumericType>,
    labels: Vec<String>,
    values: BTreeMap<String, Vec<f64>>,
}

impl GroupedSeries {
    /// Build a series from the entries of one bucket.
    ///
    /// # Errors
    ///
    /// - [`FlatbenchError::DuplicateEntry`] if a label has two values for a tick
    /// - [`FlatbenchError::IncompleteSeries`] if a label has no value for a tick
    pub fn from_entries(bucket: &BucketKey, mut entries: Vec<ClassifiedEntry>) -> Result<Self> {
        entries.sort_by(|a, b| {
            a.numeric_type
                .sort_key()
                .cmp(&b.numeric_type.sort_key())
                .then_with(|| a.label.cmp(&b.label))
        });

        let ticks: Vec<NumericType> = entries
            .iter()
            .map(|e| e.numeric_type)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let labels: Vec<String> = entries
            .iter()
            .map(|e| e.label.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut cells: BTreeMap<(&str, NumericType), f64> = BTreeMap::new();
        for entry in &entries {
            let cell = (entry.label.as_str(), entry.numeric_type);
            if cells.insert(cell, entry.value).is_some() {
                return Err(FlatbenchError::DuplicateEntry {
                    group: bucket.group.clone(),
                    operation: bucket.operation.clone(),
                    kind: bucket.kind.to_string(),
                    tick: entry.numeric_type.to_string(),
                    label: entry.label.clone(),
                });
            }
        }

        let mut values = BTreeMap::new();
        for label in &labels {
            let mut row = Vec::with_capacity(ticks.len());
            for tick in &ticks {
                let value = cells.get(&(label.as_str(), *tick)).copied().ok_or_else(|| {
                    FlatbenchError::IncompleteSeries {
                        group: bucket.group.clone(),
                        operation: bucket.operation.clone(),
                        kind: bucket.kind.to_string(),
                        tick: tick.to_string(),
                        label: label.clone(),
                    }
                })?;
                row.push(value);
            }
            values.insert(label.clone(), row);
        }

        Ok(Self {
            ticks,
            labels,
            values,
        })
    }

    /// X-axis categories in numeric-type order.
    pub fn ticks(&self) -> &[NumericType] {
        &self.ticks
    }

    /// Legend entries in lexical order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Values of one label, aligned with [`ticks`](Self::ticks).
    pub fn values(&self, label: &str) -> Option<&[f64]> {
        self.values.get(label).map(Vec::as_slice)
    }

    /// All label → values pairs in label order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Every value of the series, for unit selection.
    pub fn all_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.values().flatten().copied()
    }
}

/// Collects classified entries into buckets.
///
/// # Examples
///
/// ```
/// use flatbench_core::classify::Kind;
/// use flatbench_core::grouping::{GroupingEngine, GroupingOptions};
/// use std::collections::BTreeMap;
///
/// let mut mean = BTreeMap::new();
/// mean.insert(
///     "parse".to_string(),
///     BTreeMap::from([
///         ("parse_u8_core".to_string(), 9.9),
///         ("parse_u8_lexical".to_string(), 8.8),
///     ]),
/// );
///
/// let mut engine = GroupingEngine::new(GroupingOptions::default());
/// engine.add_table(&mean).unwrap();
/// let grouped = engine.finish().unwrap();
///
/// let series = &grouped["parse"]["parse"][&Kind::Int];
/// assert_eq!(series.labels(), ["core", "lexical"]);
/// assert_eq!(series.values("lexical"), Some(&[8.8][..]));
/// ```
#[derive(Debug, Default)]
pub struct GroupingEngine {
    options: GroupingOptions,
    buckets: BTreeMap<BucketKey, Vec<ClassifiedEntry>>,
    skipped: usize,
}

impl GroupingEngine {
    /// Create an empty engine.
    pub fn new(options: GroupingOptions) -> Self {
        Self {
            options,
            ..Default::default()
        }
    }

    /// Classify and add every benchmark of a mean table.
    ///
    /// # Errors
    ///
    /// Returns [`FlatbenchError::InvalidNumericType`] for the first key whose
    /// numeric-type token is invalid; nothing after it is added.
    pub fn add_table(&mut self, mean: &StatTable) -> Result<()> {
        for (group, benches) in mean {
            for (name, &value) in benches {
                if let Some(key) = self.classify(group, name)? {
                    let label = key.library.clone();
                    self.push(group, &key, value, label);
                }
            }
        }
        Ok(())
    }

    /// Classify one benchmark name, honouring the skip-warning option.
    pub fn classify(&mut self, group: &str, name: &str) -> Result<Option<BenchmarkKey>> {
        let key = classify(name)?;
        if key.is_none() {
            self.skipped += 1;
            if self.options.warn_skipped {
                warn!(group, benchmark = name, "skipping benchmark without three key tokens");
            }
        }
        Ok(key)
    }

    /// Add one observation under an explicit legend label.
    pub fn push(&mut self, group: &str, key: &BenchmarkKey, value: f64, label: String) {
        let bucket = BucketKey {
            group: group.to_string(),
            operation: key.operation.clone(),
            kind: key.kind(),
        };
        self.buckets.entry(bucket).or_default().push(ClassifiedEntry {
            numeric_type: key.numeric_type,
            value,
            label,
        });
    }

    /// Number of benchmarks left out so far.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Build the series of every bucket.
    pub fn finish(self) -> Result<GroupedBenchmarks> {
        debug!(buckets = self.buckets.len(), skipped = self.skipped, "grouping benchmarks");
        let mut grouped = GroupedBenchmarks::new();
        for (bucket, entries) in self.buckets {
            let series = GroupedSeries::from_entries(&bucket, entries)?;
            grouped
                .entry(bucket.group)
                .or_default()
                .entry(bucket.operation)
                .or_default()
                .insert(bucket.kind, series);
        }
        Ok(grouped)
    }
}

/// Group a mean table in one call.
pub fn group_by_mean(mean: &StatTable, options: GroupingOptions) -> Result<GroupedBenchmarks> {
    let mut engine = GroupingEngine::new(options);
    engine.add_table(mean)?;
    engine.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    fn table(group: &str, entries: &[(&str, f64)]) -> StatTable {
        let mut mean = StatTable::new();
        mean.insert(
            group.to_string(),
            entries.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        );
        mean
    }

    fn tick_names(series: &GroupedSeries) -> Vec<String> {
        series.ticks().iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_single_tick_two_libraries() {
        let mean = table("parse", &[("parse_u8_core", 9.9), ("parse_u8_lexical", 8.8)]);
        let grouped = group_by_mean(&mean, GroupingOptions::default()).unwrap();

        let series = &grouped["parse"]["parse"][&Kind::Int];
        assert_eq!(tick_names(series), vec!["u8"]);
        assert_eq!(series.labels(), ["core", "lexical"]);
        assert_eq!(series.values("core"), Some(&[9.9][..]));
        assert_eq!(series.values("lexical"), Some(&[8.8][..]));
    }

    #[test]
    fn test_ticks_follow_numeric_order() {
        let mean = table(
            "parse",
            &[
                ("parse_i8_core", 4.0),
                ("parse_u64_core", 3.0),
                ("parse_u8_core", 1.0),
                ("parse_u16_core", 2.0),
            ],
        );
        let grouped = group_by_mean(&mean, GroupingOptions::default()).unwrap();
        let series = &grouped["parse"]["parse"][&Kind::Int];

        assert_eq!(tick_names(series), vec!["u8", "u16", "u64", "i8"]);
        assert_eq!(series.values("core"), Some(&[1.0, 2.0, 3.0, 4.0][..]));
    }

    #[test]
    fn test_int_and_float_buckets_are_separate() {
        let mean = table(
            "write",
            &[
                ("write_u32_core", 10.0),
                ("write_f32_core", 20.0),
                ("write_f64_core", 30.0),
            ],
        );
        let grouped = group_by_mean(&mean, GroupingOptions::default()).unwrap();
        let kinds = &grouped["write"]["write"];

        assert_eq!(kinds.len(), 2);
        assert_eq!(tick_names(&kinds[&Kind::Int]), vec!["u32"]);
        assert_eq!(tick_names(&kinds[&Kind::Float]), vec!["f32", "f64"]);
        assert_eq!(kinds[&Kind::Float].values("core"), Some(&[20.0, 30.0][..]));
    }

    #[test]
    fn test_operations_are_separate() {
        let mean = table("parse", &[("parse_u8_core", 1.0), ("partial_u8_core", 2.0)]);
        let grouped = group_by_mean(&mean, GroupingOptions::default()).unwrap();
        assert_eq!(grouped["parse"].len(), 2);
        assert!(grouped["parse"].contains_key("partial"));
    }

    #[test]
    fn test_skipped_keys_are_dropped() {
        let mean = table(
            "parse",
            &[("onlyonetoken", 1.0), ("to_float_f32_core", 2.0), ("parse_u8_core", 3.0)],
        );
        let mut engine = GroupingEngine::new(GroupingOptions { warn_skipped: true });
        engine.add_table(&mean).unwrap();
        assert_eq!(engine.skipped(), 2);

        let grouped = engine.finish().unwrap();
        assert_eq!(grouped["parse"].len(), 1);
        assert_eq!(grouped["parse"]["parse"][&Kind::Int].labels(), ["core"]);
    }

    /// Shared buffer a test subscriber writes formatted events into.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        fn warnings(&self) -> Vec<String> {
            let bytes = self.0.lock().unwrap();
            String::from_utf8_lossy(&bytes)
                .lines()
                .filter(|line| line.contains("WARN"))
                .map(String::from)
                .collect()
        }
    }

    fn group_capturing_logs(mean: &StatTable, options: GroupingOptions) -> (usize, Vec<String>) {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .finish();

        let skipped = tracing::subscriber::with_default(subscriber, || {
            let mut engine = GroupingEngine::new(options);
            engine.add_table(mean).unwrap();
            let skipped = engine.skipped();
            engine.finish().unwrap();
            skipped
        });
        (skipped, logs.warnings())
    }

    #[test]
    fn test_skipped_keys_are_silent_by_default() {
        let mean = table(
            "parse",
            &[("onlyonetoken", 1.0), ("to_float_f32_core", 2.0), ("parse_u8_core", 3.0)],
        );
        let (skipped, warnings) = group_capturing_logs(&mean, GroupingOptions::default());
        assert_eq!(skipped, 2);
        assert!(warnings.is_empty(), "unexpected warnings: {:?}", warnings);
    }

    #[test]
    fn test_skipped_keys_warn_once_each_when_enabled() {
        let mean = table(
            "parse",
            &[("onlyonetoken", 1.0), ("to_float_f32_core", 2.0), ("parse_u8_core", 3.0)],
        );
        let (skipped, warnings) =
            group_capturing_logs(&mean, GroupingOptions { warn_skipped: true });
        assert_eq!(skipped, 2);
        assert_eq!(warnings.len(), 2, "warnings: {:?}", warnings);
        assert!(warnings.iter().any(|line| line.contains("onlyonetoken")));
        assert!(warnings.iter().any(|line| line.contains("to_float_f32_core")));
        assert!(warnings.iter().all(|line| !line.contains("parse_u8_core")));
    }

    #[test]
    fn test_only_skipped_keys_yield_nothing() {
        let mean = table("misc", &[("onlyonetoken", 1.0)]);
        let grouped = group_by_mean(&mean, GroupingOptions::default()).unwrap();
        assert!(grouped.is_empty());
    }

    #[test]
    fn test_invalid_numeric_type_aborts() {
        let mean = table("parse", &[("op_x8_lib", 1.0), ("parse_u8_core", 2.0)]);
        let err = group_by_mean(&mean, GroupingOptions::default()).unwrap_err();
        assert_eq!(err, FlatbenchError::invalid_numeric_type("x8"));
    }

    #[test]
    fn test_zero_padded_tick_does_not_merge_with_plain_tick() {
        let mean = table("parse", &[("op_u08_core", 1.0), ("op_u8_core", 2.0)]);
        let err = group_by_mean(&mean, GroupingOptions::default()).unwrap_err();
        assert_eq!(err, FlatbenchError::invalid_numeric_type("u08"));
    }

    #[test]
    fn test_missing_tick_is_rejected() {
        let mean = table(
            "parse",
            &[
                ("parse_u8_core", 1.0),
                ("parse_u16_core", 2.0),
                ("parse_u16_lexical", 3.0),
            ],
        );
        let err = group_by_mean(&mean, GroupingOptions::default()).unwrap_err();
        match err {
            FlatbenchError::IncompleteSeries { tick, label, kind, .. } => {
                assert_eq!(tick, "u8");
                assert_eq!(label, "lexical");
                assert_eq!(kind, "int");
            }
            other => panic!("Expected IncompleteSeries, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_entry_is_rejected() {
        let bucket = BucketKey {
            group: "parse".to_string(),
            operation: "parse".to_string(),
            kind: Kind::Int,
        };
        let entry = ClassifiedEntry {
            numeric_type: NumericType::Unsigned(8),
            value: 1.0,
            label: "core".to_string(),
        };
        let err = GroupedSeries::from_entries(&bucket, vec![entry.clone(), entry]).unwrap_err();
        assert!(matches!(err, FlatbenchError::DuplicateEntry { .. }));
    }

    #[test]
    fn test_push_with_custom_label() {
        let key = classify("parse_u8_lexical").unwrap().unwrap();
        let mut engine = GroupingEngine::new(GroupingOptions::default());
        engine.push("parse", &key, 5.0, "abc1234".to_string());
        engine.push("parse", &key, 4.0, "0ff1ce0".to_string());

        let grouped = engine.finish().unwrap();
        let series = &grouped["parse"]["parse"][&Kind::Int];
        assert_eq!(series.labels(), ["0ff1ce0", "abc1234"]);
        assert_eq!(series.values("abc1234"), Some(&[5.0][..]));
    }

    #[test]
    fn test_all_values() {
        let mean = table("parse", &[("parse_u8_core", 9.9), ("parse_u8_lexical", 8.8)]);
        let grouped = group_by_mean(&mean, GroupingOptions::default()).unwrap();
        let mut values: Vec<f64> = grouped["parse"]["parse"][&Kind::Int].all_values().collect();
        values.sort_by(f64::total_cmp);
        assert_eq!(values, vec![8.8, 9.9]);
    }
}
