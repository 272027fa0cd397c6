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

//! Time unit selection for chart axes.
//!
//! Criterion reports nanoseconds. A chart uses the coarsest unit in which
//! its smallest value is still at least [`MIN_SCALED_VALUE`].

use std::fmt;

/// Smallest value a chart should show after scaling.
pub const MIN_SCALED_VALUE: f64 = 5.0;

/// Display unit for nanosecond measurements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    /// Seconds.
    Seconds,
    /// Milliseconds.
    Millis,
    /// Microseconds.
    Micros,
    /// Nanoseconds.
    Nanos,
}

impl TimeUnit {
    /// Unit symbol for axis labels.
    pub fn symbol(&self) -> &'static str {
        match self {
            TimeUnit::Seconds => "s",
            TimeUnit::Millis => "ms",
            TimeUnit::Micros => "μs",
            TimeUnit::Nanos => "ns",
        }
    }

    /// Nanoseconds per unit.
    pub fn divisor(&self) -> f64 {
        match self {
            TimeUnit::Seconds => 1e9,
            TimeUnit::Millis => 1e6,
            TimeUnit::Micros => 1e3,
            TimeUnit::Nanos => 1.0,
        }
    }

    /// Convert a nanosecond value into this unit.
    pub fn scale(&self, nanos: f64) -> f64 {
        nanos / self.divisor()
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Pick the unit for every value feeding one chart.
///
/// Thresholds are inclusive; no values selects nanoseconds.
///
/// # Examples
///
/// ```
/// use flatbench_core::units::{select_unit, TimeUnit};
///
/// assert_eq!(select_unit([5000.0, 90_000.0]), TimeUnit::Micros);
/// assert_eq!(select_unit([4999.0, 90_000.0]), TimeUnit::Nanos);
/// ```
pub fn select_unit<I>(values: I) -> TimeUnit
where
    I: IntoIterator<Item = f64>,
{
    let lowest = values.into_iter().fold(f64::INFINITY, f64::min);
    if !lowest.is_finite() {
        return TimeUnit::Nanos;
    }

    [TimeUnit::Seconds, TimeUnit::Millis, TimeUnit::Micros]
        .into_iter()
        .find(|unit| lowest >= MIN_SCALED_VALUE * unit.divisor())
        .unwrap_or(TimeUnit::Nanos)
}
