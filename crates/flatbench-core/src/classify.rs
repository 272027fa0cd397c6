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

//! Benchmark key classification.
//!
//! Comparison benchmarks are named `{operation}_{numeric type}_{library}`,
//! for example `parse_u8_lexical` or `write_f64_core`. This module splits
//! such names and orders numeric types unsigned, then signed, then float,
//! each by ascending width.

use crate::error::{FlatbenchError, Result};
use std::fmt;
use std::str::FromStr;

/// Separator between the tokens of a benchmark key.
pub const KEY_DELIMITER: char = '_';

/// Number of tokens in a classifiable key.
pub const KEY_TOKENS: usize = 3;

/// Coarse classification used as the secondary grouping axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Kind {
    /// Signed or unsigned integers.
    Int,
    /// Floating point numbers.
    Float,
}

impl Kind {
    /// Returns the kind as used in file names (`int`, `float`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Int => "int",
            Kind::Float => "float",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A numeric operand type such as `u8`, `i64` or `f32`.
///
/// The derived ordering is the chart tick order: all unsigned types before
/// all signed types before all floats, then by bit width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NumericType {
    /// Unsigned integer of the given bit width.
    Unsigned(u32),
    /// Signed integer of the given bit width.
    Signed(u32),
    /// Float of the given bit width.
    Float(u32),
}

impl NumericType {
    /// `(kind rank, bit width)` with rank 0 for `u`, 1 for `i`, 2 for `f`.
    pub fn sort_key(&self) -> (u8, u32) {
        match *self {
            NumericType::Unsigned(width) => (0, width),
            NumericType::Signed(width) => (1, width),
            NumericType::Float(width) => (2, width),
        }
    }

    /// The bucket this type is charted in.
    pub fn kind(&self) -> Kind {
        match self {
            NumericType::Unsigned(_) | NumericType::Signed(_) => Kind::Int,
            NumericType::Float(_) => Kind::Float,
        }
    }

    /// Bit width of the type.
    pub fn width(&self) -> u32 {
        self.sort_key().1
    }
}

impl FromStr for NumericType {
    type Err = FlatbenchError;

    /// Parse a token like `u8`. Surrounding whitespace is ignored; the width
    /// must not be zero or zero-padded.
    fn from_str(token: &str) -> Result<Self> {
        let trimmed = token.trim();
        let mut chars = trimmed.chars();
        let prefix = chars.next();
        let digits = chars.as_str();

        let invalid = || FlatbenchError::invalid_numeric_type(trimmed);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        // Widths round-trip through Display: no leading zeros.
        if digits.starts_with('0') {
            return Err(invalid());
        }
        let width: u32 = digits.parse().map_err(|_| invalid())?;

        match prefix {
            Some('u') => Ok(NumericType::Unsigned(width)),
            Some('i') => Ok(NumericType::Signed(width)),
            Some('f') => Ok(NumericType::Float(width)),
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for NumericType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericType::Unsigned(width) => write!(f, "u{}", width),
            NumericType::Signed(width) => write!(f, "i{}", width),
            NumericType::Float(width) => write!(f, "f{}", width),
        }
    }
}

/// A benchmark name split into its three tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchmarkKey {
    /// Operation, e.g. `parse`.
    pub operation: String,
    /// Operand type.
    pub numeric_type: NumericType,
    /// Library under comparison, e.g. `lexical`.
    pub library: String,
}

impl BenchmarkKey {
    /// Kind of the key's numeric type.
    pub fn kind(&self) -> Kind {
        self.numeric_type.kind()
    }
}

/// Classify a benchmark name.
///
/// Returns `Ok(None)` when the name does not have exactly three tokens;
/// such benchmarks are not comparison benchmarks and are left out.
///
/// # Errors
///
/// Returns [`FlatbenchError::InvalidNumericType`] when the key has three
/// tokens but the middle one is not a numeric type.
///
/// # Examples
///
/// ```
/// use flatbench_core::classify::{classify, Kind, NumericType};
///
/// let key = classify("parse_u8_lexical").unwrap().unwrap();
/// assert_eq!(key.operation, "parse");
/// assert_eq!(key.numeric_type, NumericType::Unsigned(8));
/// assert_eq!(key.kind(), Kind::Int);
///
/// assert!(classify("to_float_f32_core").unwrap().is_none());
/// ```
pub fn classify(key: &str) -> Result<Option<BenchmarkKey>> {
    let tokens: Vec<&str> = key.split(KEY_DELIMITER).collect();
    let [operation, numeric_type, library] = tokens.as_slice() else {
        return Ok(None);
    };

    Ok(Some(BenchmarkKey {
        operation: (*operation).to_string(),
        numeric_type: numeric_type.parse()?,
        library: (*library).to_string(),
    }))
}
