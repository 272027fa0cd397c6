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

//! Flatbench CLI library for argument parsing and command execution.
//!
//! # Commands
//!
//! - **aggregate**: pivot criterion estimates of one profile into
//!   `results/<commit>/flatbench.json`
//! - **collect**: copy the raw criterion files of one profile
//! - **metadata**: record commit, platform and compiler information
//! - **plot**: render grouped bar charts from aggregated results
//!
//! # Examples
//!
//! ```no_run
//! use flatbench_cli::commands::aggregate;
//! use std::path::Path;
//!
//! # fn main() -> flatbench_core::Result<()> {
//! let written = aggregate(Path::new("target"), "base", None)?;
//! println!("{}", written.display());
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod commands;
