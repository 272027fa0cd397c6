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

//! End-to-end tests: criterion tree → aggregated document → charts.

use flatbench_core::classify::{Kind, NumericType};
use flatbench_core::{
    aggregate, group_by_mean, load_estimates, run_plot, Config, FlatbenchError, GroupingOptions,
    PivotedStats, TimeUnit,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn estimates_json(mean: f64) -> String {
    format!(
        r#"{{
  "mean": {{
    "confidence_interval": {{"confidence_level": 0.95, "lower_bound": {lower}, "upper_bound": {upper}}},
    "point_estimate": {mean},
    "standard_error": 0.01
  }},
  "median": {{
    "confidence_interval": {{"confidence_level": 0.95, "lower_bound": 1.0, "upper_bound": 2.0}},
    "point_estimate": 1.5,
    "standard_error": 0.01
  }},
  "std_dev": {{
    "confidence_interval": {{"confidence_level": 0.95, "lower_bound": 0.1, "upper_bound": 0.3}},
    "point_estimate": 0.2,
    "standard_error": 0.01
  }}
}}"#,
        mean = mean,
        lower = mean - 0.5,
        upper = mean + 0.5,
    )
}

fn write_estimate(target: &Path, group: &str, name: &str, profile: &str, mean: f64) {
    let dir = target.join("criterion").join(group).join(name).join(profile);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("estimates.json"), estimates_json(mean)).unwrap();
}

fn criterion_tree(benches: &[(&str, &str, f64)]) -> TempDir {
    let target = TempDir::new().unwrap();
    for (group, name, mean) in benches {
        write_estimate(target.path(), group, name, "base", *mean);
    }
    // Criterion also writes a report directory and other profiles.
    fs::create_dir_all(target.path().join("criterion/report")).unwrap();
    write_estimate(target.path(), "parse", "parse_u8_core", "new", 1000.0);
    target
}

#[test]
fn test_aggregate_then_plot() {
    let target = criterion_tree(&[
        ("parse", "parse_u8_core", 9.9),
        ("parse", "parse_u8_lexical", 8.8),
    ]);
    let results = TempDir::new().unwrap();

    let stats = aggregate(load_estimates(target.path(), "base").unwrap());
    stats
        .write(&results.path().join("abc1234").join("flatbench.json"))
        .unwrap();

    assert_eq!(stats.mean["parse"]["parse_u8_core"], 9.9);
    assert_eq!(stats.lower["parse"]["parse_u8_lexical"], 8.8 - 0.5);
    assert_eq!(stats.confidence["parse"]["parse_u8_core"], 0.95);
    assert_eq!(stats.std_dev["parse"]["parse_u8_core"], 0.2);

    let grouped = group_by_mean(&stats.mean, GroupingOptions::default()).unwrap();
    let series = &grouped["parse"]["parse"][&Kind::Int];
    assert_eq!(series.ticks(), [NumericType::Unsigned(8)]);
    assert_eq!(series.labels(), ["core", "lexical"]);
    assert_eq!(series.values("core"), Some(&[9.9][..]));
    assert_eq!(series.values("lexical"), Some(&[8.8][..]));

    let config = Config::default()
        .with_input(results.path())
        .with_output(results.path())
        .with_commits(vec!["abc1234".to_string()]);
    let charts = run_plot(&config, None).unwrap();

    assert_eq!(charts.len(), 1);
    assert_eq!(charts[0].unit, TimeUnit::Nanos);
    let expected = results
        .path()
        .join("abc1234/plot/parse - parse int - core,lexical.svg");
    assert_eq!(charts[0].path, expected);

    let svg = fs::read_to_string(&expected).unwrap();
    assert!(svg.contains("Parse - Parse Int"));
    assert!(svg.contains("Mean Time (ns)"));
}

#[test]
fn test_aggregate_is_deterministic() {
    let target = criterion_tree(&[
        ("write", "write_f64_ryu", 40.0),
        ("parse", "parse_u16_core", 12.0),
        ("parse", "parse_u8_core", 9.0),
    ]);

    let first = aggregate(load_estimates(target.path(), "base").unwrap())
        .to_json()
        .unwrap();
    let second = aggregate(load_estimates(target.path(), "base").unwrap())
        .to_json()
        .unwrap();
    assert_eq!(first, second);

    let mean_at = first.find("\"mean\"").unwrap();
    let std_dev_at = first.find("\"std_dev\"").unwrap();
    assert!(mean_at < std_dev_at);
    assert!(first.find("\"parse\"").unwrap() < first.find("\"write\"").unwrap());
}

#[test]
fn test_aggregated_document_roundtrips_through_disk() {
    let target = criterion_tree(&[("parse", "parse_i32_core", 14.5)]);
    let results = TempDir::new().unwrap();
    let path = results.path().join("flatbench.json");

    let stats = aggregate(load_estimates(target.path(), "base").unwrap());
    stats.write(&path).unwrap();
    assert_eq!(PivotedStats::read(&path).unwrap(), stats);
}

#[test]
fn test_malformed_estimates_abort_aggregation() {
    let target = criterion_tree(&[("parse", "parse_u8_core", 9.9)]);
    let dir = target.path().join("criterion/parse/parse_u8_lexical/base");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("estimates.json"), r#"{"mean": {"point_estimate": 1.0}}"#).unwrap();

    let err = load_estimates(target.path(), "base").unwrap_err();
    assert!(matches!(err, FlatbenchError::MalformedInput { .. }));
}

#[test]
fn test_skipped_keys_do_not_produce_charts() {
    let results = TempDir::new().unwrap();
    let mut stats = PivotedStats::new();
    let target = criterion_tree(&[
        ("misc", "onlyonetoken", 3.0),
        ("misc", "to_float_f32_core", 3.0),
    ]);
    for estimate in load_estimates(target.path(), "base").unwrap() {
        stats.insert(&estimate.group, &estimate.name, &estimate.record);
    }
    stats
        .write(&results.path().join("abc1234/flatbench.json"))
        .unwrap();

    let config = Config::default()
        .with_input(results.path())
        .with_output(results.path())
        .with_commits(vec!["abc1234".to_string()])
        .with_warn_skipped(true);
    let charts = run_plot(&config, None).unwrap();
    assert!(charts.is_empty());
}

#[test]
fn test_invalid_numeric_type_is_fatal() {
    let target = criterion_tree(&[("parse", "op_x8_lib", 3.0)]);
    let stats = aggregate(load_estimates(target.path(), "base").unwrap());
    let err = group_by_mean(&stats.mean, GroupingOptions::default()).unwrap_err();
    assert!(matches!(err, FlatbenchError::InvalidNumericType { .. }));
}

#[test]
fn test_incomplete_library_is_fatal() {
    let target = criterion_tree(&[
        ("parse", "parse_u8_core", 9.0),
        ("parse", "parse_u16_core", 11.0),
        ("parse", "parse_u8_lexical", 8.0),
    ]);
    let stats = aggregate(load_estimates(target.path(), "base").unwrap());
    let err = group_by_mean(&stats.mean, GroupingOptions::default()).unwrap_err();
    match err {
        FlatbenchError::IncompleteSeries { tick, label, .. } => {
            assert_eq!(tick, "u16");
            assert_eq!(label, "lexical");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_large_values_scale_to_microseconds() {
    let target = criterion_tree(&[
        ("parse", "parse_f64_core", 25_000.0),
        ("parse", "parse_f64_lexical", 12_000.0),
    ]);
    let results = TempDir::new().unwrap();
    aggregate(load_estimates(target.path(), "base").unwrap())
        .write(&results.path().join("abc1234/flatbench.json"))
        .unwrap();

    let config = Config::default()
        .with_input(results.path())
        .with_output(results.path())
        .with_commits(vec!["abc1234".to_string()]);
    let charts = run_plot(&config, None).unwrap();
    assert_eq!(charts.len(), 1);
    assert_eq!(charts[0].unit, TimeUnit::Micros);
    assert!(charts[0].path.ends_with("parse - parse float - core,lexical.svg"));
}
