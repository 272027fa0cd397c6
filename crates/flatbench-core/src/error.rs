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

//! Structured error types for flatbench.
//!
//! Every fallible operation in this crate returns [`Result<T>`], so callers
//! get one error enum with enough context to tell a malformed estimate file
//! apart from a failing `git` invocation.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for flatbench operations.
pub type Result<T> = std::result::Result<T, FlatbenchError>;

/// Errors that can occur while aggregating or plotting benchmark results.
///
/// All variants are fatal for the run that produced them. Keys with the
/// wrong number of tokens are not errors and never surface here.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FlatbenchError {
    /// I/O operation failed (file read, write, directory creation).
    #[error("I/O error for '{path}': {message}")]
    Io {
        /// The path that caused the error
        path: PathBuf,
        /// The error message
        message: String,
    },

    /// An input document did not have the expected shape.
    ///
    /// Raised for criterion estimates missing a statistic, aggregated
    /// documents missing a table, or unparseable tool output.
    #[error("Malformed input '{path}': {message}")]
    MalformedInput {
        /// The offending file, or the tool name for subprocess output
        path: PathBuf,
        /// What was wrong with it
        message: String,
    },

    /// A numeric-type token did not start with `u`, `i` or `f` followed by
    /// a decimal bit width.
    #[error("Got an invalid numeric type of \"{token}\"")]
    InvalidNumericType {
        /// The token as it appeared in the benchmark key
        token: String,
    },

    /// A library has no observation for one of the chart ticks.
    ///
    /// Rendering such a series would shift every following bar.
    #[error("Benchmark '{group}/{operation}' ({kind}) has no '{tick}' result for '{label}'")]
    IncompleteSeries {
        /// Benchmark group
        group: String,
        /// Operation within the group
        operation: String,
        /// Kind of the bucket ("int" or "float")
        kind: String,
        /// The missing numeric type
        tick: String,
        /// The library without a value
        label: String,
    },

    /// Two entries landed on the same tick for the same library.
    #[error("Benchmark '{group}/{operation}' ({kind}) has more than one '{tick}' result for '{label}'")]
    DuplicateEntry {
        /// Benchmark group
        group: String,
        /// Operation within the group
        operation: String,
        /// Kind of the bucket ("int" or "float")
        kind: String,
        /// The duplicated numeric type
        tick: String,
        /// The library with two values
        label: String,
    },

    /// An external command could not be run or exited unsuccessfully.
    #[error("Command '{command}' failed: {message}")]
    Subprocess {
        /// The command line that was run
        command: String,
        /// Exit status or spawn error, plus captured stderr
        message: String,
    },

    /// Conflicting or missing configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// No aggregated results exist for any commit in the history.
    #[error("No benchmark results found in '{input}' for any commit in the repository history")]
    NoResults {
        /// The results directory that was searched
        input: PathBuf,
    },

    /// Chart rendering failed.
    #[error("Failed to render chart '{path}': {message}")]
    Render {
        /// The chart file being written
        path: PathBuf,
        /// The drawing backend message
        message: String,
    },

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(String),
}

impl FlatbenchError {
    /// Create an I/O error with path context.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use flatbench_core::FlatbenchError;
    ///
    /// let result = std::fs::read_to_string("flatbench.json")
    ///     .map_err(|e| FlatbenchError::io_error("flatbench.json", e));
    /// ```
    pub fn io_error(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: source.to_string(),
        }
    }

    /// Create a malformed input error.
    pub fn malformed(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::MalformedInput {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an invalid numeric type error.
    pub fn invalid_numeric_type(token: impl Into<String>) -> Self {
        Self::InvalidNumericType {
            token: token.into(),
        }
    }

    /// Create a subprocess error.
    pub fn subprocess(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Subprocess {
            command: command.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a render error.
    pub fn render(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Render {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

impl From<serde_json::Error> for FlatbenchError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}
