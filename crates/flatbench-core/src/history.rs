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

//! Commit history of the benchmarked repository.
//!
//! Results are stored per short commit hash. The history decides which
//! results directory is the newest when no commit is named explicitly.

use crate::error::{FlatbenchError, Result};
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::debug;

/// How many commits are inspected when ranking results directories.
pub const HISTORY_DEPTH: usize = 5000;

/// Source of commit hashes.
///
/// Implemented by [`GitHistory`]; tests substitute a fixed list.
pub trait CommitHistory {
    /// Short hash of the newest commit.
    fn head(&self) -> Result<String>;

    /// Up to `count` short hashes, newest first.
    fn log(&self, count: usize) -> Result<Vec<String>>;
}

/// Reads history by running `git` in a repository.
#[derive(Debug, Clone)]
pub struct GitHistory {
    repository: PathBuf,
}

impl GitHistory {
    /// Create a history reader for the repository at `repository`.
    pub fn new(repository: impl Into<PathBuf>) -> Self {
        Self {
            repository: repository.into(),
        }
    }

    /// Repository the commands run in.
    pub fn repository(&self) -> &Path {
        &self.repository
    }

    fn git(&self, args: &[&str]) -> Result<String> {
        let mut command = Command::new("git");
        command.args(args).current_dir(&self.repository);
        run_command(&mut command)
    }
}

impl CommitHistory for GitHistory {
    fn head(&self) -> Result<String> {
        let output = self.git(&["log", "-1", "--pretty=format:%h"])?;
        output
            .lines()
            .next()
            .map(|line| line.trim().to_string())
            .filter(|hash| !hash.is_empty())
            .ok_or_else(|| FlatbenchError::malformed(&self.repository, "git log returned no commits"))
    }

    fn log(&self, count: usize) -> Result<Vec<String>> {
        let depth = format!("-{}", count);
        let output = self.git(&["log", &depth, "--pretty=format:%h"])?;
        Ok(output
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect())
    }
}

/// Run a command to completion and return its stdout.
///
/// A non-zero exit is a [`FlatbenchError::Subprocess`] carrying stderr.
pub(crate) fn run_command(command: &mut Command) -> Result<String> {
    let shown = format!("{:?}", command);
    debug!(command = %shown, "running");
    let output = command
        .stdin(Stdio::null())
        .output()
        .map_err(|e| FlatbenchError::subprocess(&shown, e.to_string()))?;

    if !output.status.success() {
        return Err(FlatbenchError::subprocess(
            &shown,
            format!(
                "{}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        ));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Rank commits oldest-first: the oldest commit of `log` gets rank 0.
pub fn commit_ranks(log: &[String]) -> HashMap<String, usize> {
    log.iter()
        .rev()
        .enumerate()
        .map(|(rank, hash)| (hash.clone(), rank))
        .collect()
}

/// The newest commit among `available` that appears in the history.
pub fn resolve_latest(ranks: &HashMap<String, usize>, available: &BTreeSet<String>) -> Option<String> {
    available
        .iter()
        .filter_map(|commit| ranks.get(commit).map(|rank| (*rank, commit)))
        .max_by_key(|(rank, _)| *rank)
        .map(|(_, commit)| commit.clone())
}

/// Names of the per-commit result directories under `input`.
pub fn available_commits(input: &Path) -> Result<BTreeSet<String>> {
    let entries = fs::read_dir(input).map_err(|e| FlatbenchError::io_error(input, e))?;
    let mut commits = BTreeSet::new();
    for entry in entries {
        let entry = entry.map_err(|e| FlatbenchError::io_error(input, e))?;
        if entry.path().is_dir() {
            commits.insert(entry.file_name().to_string_lossy().into_owned());
        }
    }
    Ok(commits)
}

/// Resolve the newest commit that has results under `input`.
///
/// # Errors
///
/// Returns [`FlatbenchError::NoResults`] if no commit of the history has a
/// results directory, and propagates history failures.
pub fn latest_commit(history: &dyn CommitHistory, input: &Path) -> Result<String> {
    let ranks = commit_ranks(&history.log(HISTORY_DEPTH)?);
    let available = available_commits(input)?;
    let latest = resolve_latest(&ranks, &available).ok_or_else(|| FlatbenchError::NoResults {
        input: input.to_path_buf(),
    })?;
    debug!(commit = %latest, "resolved latest commit with results");
    Ok(latest)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Fixed history, newest first.
    pub(crate) struct FixedHistory(pub Vec<&'static str>);

    impl CommitHistory for FixedHistory {
        fn head(&self) -> Result<String> {
            self.0
                .first()
                .map(|s| s.to_string())
                .ok_or_else(|| FlatbenchError::config("empty history"))
        }

        fn log(&self, count: usize) -> Result<Vec<String>> {
            Ok(self.0.iter().take(count).map(|s| s.to_string()).collect())
        }
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_commit_ranks_oldest_first() {
        let ranks = commit_ranks(&strings(&["ccc", "bbb", "aaa"]));
        assert_eq!(ranks["aaa"], 0);
        assert_eq!(ranks["bbb"], 1);
        assert_eq!(ranks["ccc"], 2);
    }

    #[test]
    fn test_resolve_latest_picks_newest_available() {
        let ranks = commit_ranks(&strings(&["ccc", "bbb", "aaa"]));
        let available: BTreeSet<String> = strings(&["aaa", "bbb", "zzz"]).into_iter().collect();
        assert_eq!(resolve_latest(&ranks, &available), Some("bbb".to_string()));
    }

    #[test]
    fn test_resolve_latest_none_available() {
        let ranks = commit_ranks(&strings(&["ccc"]));
        let available: BTreeSet<String> = strings(&["zzz"]).into_iter().collect();
        assert_eq!(resolve_latest(&ranks, &available), None);
    }

    #[test]
    fn test_latest_commit_with_fixed_history() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("aaa")).unwrap();
        fs::create_dir(dir.path().join("bbb")).unwrap();
        fs::write(dir.path().join("ccc"), "not a directory").unwrap();

        let history = FixedHistory(vec!["ccc", "bbb", "aaa"]);
        assert_eq!(latest_commit(&history, dir.path()).unwrap(), "bbb");
    }

    #[test]
    fn test_latest_commit_no_results() {
        let dir = TempDir::new().unwrap();
        let history = FixedHistory(vec!["ccc"]);
        let err = latest_commit(&history, dir.path()).unwrap_err();
        assert!(matches!(err, FlatbenchError::NoResults { .. }));
    }

    #[test]
    fn test_run_command_returns_stdout() {
        let mut command = Command::new("git");
        command.arg("--version");
        let output = run_command(&mut command).unwrap();
        assert!(output.starts_with("git version"));
    }

    #[test]
    fn test_run_command_missing_program_names_command() {
        let mut command = Command::new("flatbench-no-such-program");
        match run_command(&mut command).unwrap_err() {
            FlatbenchError::Subprocess { command, .. } => {
                assert!(command.contains("flatbench-no-such-program"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_run_command_nonzero_exit_is_fatal() {
        let dir = TempDir::new().unwrap();
        // Not a repository, so git exits with an error.
        let err = GitHistory::new(dir.path()).log(5).unwrap_err();
        assert!(matches!(err, FlatbenchError::Subprocess { .. }));
    }
}
