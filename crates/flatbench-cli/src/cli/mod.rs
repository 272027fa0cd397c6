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

//! CLI command definitions and argument parsing.

use crate::commands;
use clap::Subcommand;
use flatbench_core::config::{DEFAULT_PROFILE, DEFAULT_RESULTS, DEFAULT_TARGET};
use flatbench_core::{Config, FlatbenchError, PlotStyle};
use std::path::PathBuf;

/// Top-level CLI commands.
///
/// # Examples
///
/// ```no_run
/// use clap::Parser;
/// use flatbench_cli::cli::Commands;
///
/// #[derive(Parser)]
/// struct Cli {
///     #[command(subcommand)]
///     command: Commands,
/// }
/// ```
#[derive(Subcommand)]
pub enum Commands {
    /// Aggregate criterion estimates into one document
    ///
    /// Reads every `estimates.json` of the profile below `<target>/criterion`
    /// and writes the mean, confidence bounds and standard deviation of each
    /// benchmark, keyed by group and benchmark name.
    Aggregate {
        /// Directory containing criterion's output
        #[arg(short, long, value_name = "DIR", default_value = DEFAULT_TARGET)]
        target: PathBuf,

        /// Output file (defaults to results/<commit>/flatbench.json)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Criterion profile to load the results from
        #[arg(short, long, default_value = DEFAULT_PROFILE)]
        profile: String,
    },

    /// Copy the raw criterion files of one profile
    Collect {
        /// Directory containing criterion's output
        #[arg(short, long, value_name = "DIR", default_value = DEFAULT_TARGET)]
        target: PathBuf,

        /// Output directory (defaults to results/<commit>)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Criterion profile to copy
        #[arg(short, long, default_value = DEFAULT_PROFILE)]
        profile: String,
    },

    /// Record commit, platform and compiler information
    Metadata {
        /// Directory containing criterion's output
        #[arg(short, long, value_name = "DIR", default_value = DEFAULT_TARGET)]
        target: PathBuf,

        /// Output file (defaults to results/<commit>/metadata.json)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Rustup toolchain to query, e.g. `nightly`
        #[arg(long)]
        toolchain: Option<String>,

        /// Name or path of the rustc executable
        #[arg(long, default_value = "rustc")]
        rustc: String,
    },

    /// Render comparison charts from aggregated results
    ///
    /// With one commit, every library at that commit is compared. With
    /// several commits and a library, that library is followed across the
    /// commits. With neither, the newest commit of the repository that has
    /// results is used.
    Plot {
        /// Directory holding per-commit results
        #[arg(short, long, value_name = "DIR", default_value = DEFAULT_RESULTS)]
        input: PathBuf,

        /// Directory to write charts to (defaults to the input directory)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Chart style (default, seaborn-v0_8-pastel, seaborn-v0_8-deep)
        #[arg(short, long, default_value = "seaborn-v0_8-pastel")]
        style: String,

        /// Repository whose history orders the results
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        repository: PathBuf,

        /// Commits to plot
        #[arg(short, long, num_args = 1..)]
        commits: Vec<String>,

        /// Library to follow across commits
        #[arg(short, long)]
        library: Option<String>,

        /// Print the path of each chart written
        #[arg(long)]
        show: bool,

        /// Warn about benchmarks that are not `<operation>_<type>_<library>`
        #[arg(long)]
        warn_skipped: bool,
    },
}

impl Commands {
    /// Execute the command.
    ///
    /// # Errors
    ///
    /// Returns the first [`FlatbenchError`] raised by the command; nothing
    /// after it runs.
    pub fn execute(self) -> Result<(), FlatbenchError> {
        match self {
            Commands::Aggregate {
                target,
                output,
                profile,
            } => commands::aggregate(&target, &profile, output).map(|_| ()),
            Commands::Collect {
                target,
                output,
                profile,
            } => commands::collect(&target, &profile, output).map(|_| ()),
            Commands::Metadata {
                target,
                output,
                toolchain,
                rustc,
            } => commands::metadata(&target, output, &rustc, toolchain).map(|_| ()),
            Commands::Plot {
                input,
                output,
                style,
                repository,
                commits,
                library,
                show,
                warn_skipped,
            } => {
                let style: PlotStyle = style.parse()?;
                let mut config = Config::default()
                    .with_output(output.unwrap_or_else(|| input.clone()))
                    .with_input(input)
                    .with_style(style)
                    .with_repository(repository)
                    .with_commits(commits)
                    .with_show(show)
                    .with_warn_skipped(warn_skipped);
                if let Some(library) = library {
                    config = config.with_library(library);
                }
                commands::plot(&config)
            }
        }
    }
}
