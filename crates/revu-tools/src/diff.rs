// Copyright (c) 2025-2026 Revu Contributors
//
// SPDX-License-Identifier: MIT
//! Diff collection from a revision-control source.
//!
//! The source is abstracted behind [`DiffSource`] so the collector can be
//! tested without a git binary; [`GitCli`] is the production implementation
//! and shells out to `git` via `tokio::process`.

use std::collections::HashSet;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::process::Command;
use tracing::debug;

use crate::ToolError;

/// Identifies the repository to inspect.  Created per tool invocation.
#[derive(Debug, Clone, Deserialize)]
pub struct ChangeRequest {
    pub root_dir: String,
}

/// One changed file with its textual diff.  `diff` may be empty when the
/// revision source reports no textual delta for the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffRecord {
    pub file: String,
    pub diff: String,
}

/// Filenames never surfaced to the model.  Matched exactly against the
/// paths the revision source reports; read-only after construction.
#[derive(Debug, Clone)]
pub struct ExclusionSet {
    files: HashSet<String>,
}

impl ExclusionSet {
    pub fn new(files: impl IntoIterator<Item = String>) -> Self {
        Self { files: files.into_iter().collect() }
    }

    pub fn contains(&self, file: &str) -> bool {
        self.files.contains(file)
    }
}

impl Default for ExclusionSet {
    fn default() -> Self {
        Self::new(revu_config::ToolsConfig::default().excluded_files)
    }
}

/// The revision-control data source: a list of changed files plus a per-file
/// textual diff.  Both calls are read-only.
#[async_trait]
pub trait DiffSource: Send + Sync {
    /// Changed file paths, in the order the revision source reports them.
    async fn diff_summary(&self) -> Result<Vec<String>, ToolError>;
    /// Textual diff restricted to a single file.
    async fn diff_file(&self, file: &str) -> Result<String, ToolError>;
}

/// `DiffSource` backed by the `git` command-line tool.
#[derive(Debug)]
pub struct GitCli {
    root: PathBuf,
}

impl GitCli {
    /// Open a repository root, verifying it is inside a git work tree.
    ///
    /// Fails with [`ToolError::Repository`] when the directory does not
    /// exist or git does not recognise it.
    pub async fn open(request: &ChangeRequest) -> Result<Self, ToolError> {
        let root = PathBuf::from(&request.root_dir);
        if !root.is_dir() {
            return Err(ToolError::Repository(format!(
                "'{}' is not a directory",
                request.root_dir
            )));
        }
        let cli = Self { root };
        let inside = cli.git(&["rev-parse", "--is-inside-work-tree"]).await?;
        if inside.trim() != "true" {
            return Err(ToolError::Repository(format!(
                "'{}' is not inside a git work tree",
                request.root_dir
            )));
        }
        Ok(cli)
    }

    async fn git(&self, args: &[&str]) -> Result<String, ToolError> {
        debug!(root = %self.root.display(), ?args, "running git");
        let output = Command::new("git")
            .arg("-C")
            .arg(&self.root)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| ToolError::Repository(format!("failed to run git: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ToolError::Repository(format!(
                "git {} failed: {}",
                args.first().unwrap_or(&""),
                stderr.trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl DiffSource for GitCli {
    async fn diff_summary(&self) -> Result<Vec<String>, ToolError> {
        let out = self.git(&["diff", "--name-only"]).await?;
        Ok(out.lines().map(str::to_string).collect())
    }

    async fn diff_file(&self, file: &str) -> Result<String, ToolError> {
        self.git(&["diff", "--", file]).await
    }
}

/// In-memory `DiffSource` for tests.  Serves a fixed file→diff table and
/// counts `diff_file` calls so tests can assert that excluded files never
/// trigger a fetch.
#[derive(Default)]
pub struct MemorySource {
    files: Vec<(String, String)>,
    fetches: Arc<AtomicUsize>,
}

impl MemorySource {
    pub fn new(files: Vec<(&str, &str)>) -> Self {
        Self {
            files: files
                .into_iter()
                .map(|(f, d)| (f.to_string(), d.to_string()))
                .collect(),
            fetches: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of per-file diff fetches made against this source.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DiffSource for MemorySource {
    async fn diff_summary(&self) -> Result<Vec<String>, ToolError> {
        Ok(self.files.iter().map(|(f, _)| f.clone()).collect())
    }

    async fn diff_file(&self, file: &str) -> Result<String, ToolError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .files
            .iter()
            .find(|(f, _)| f == file)
            .map(|(_, d)| d.clone())
            .unwrap_or_default())
    }
}

/// Collects filtered, per-file diffs from a [`DiffSource`].
#[derive(Debug, Clone)]
pub struct DiffCollector {
    exclusions: ExclusionSet,
}

impl DiffCollector {
    pub fn new(exclusions: ExclusionSet) -> Self {
        Self { exclusions }
    }

    /// One record per non-excluded changed file, in the source's report
    /// order.  Exclusion is checked *before* the per-file diff fetch so an
    /// excluded file costs nothing.  Zero changed files is an empty result,
    /// not an error.
    pub async fn collect(&self, source: &dyn DiffSource) -> Result<Vec<DiffRecord>, ToolError> {
        let summary = source.diff_summary().await?;
        let mut records = Vec::new();
        for file in summary {
            if self.exclusions.contains(&file) {
                continue;
            }
            let diff = source.diff_file(&file).await?;
            records.push(DiffRecord { file, diff });
        }
        Ok(records)
    }
}

impl Default for DiffCollector {
    fn default() -> Self {
        Self { exclusions: ExclusionSet::default() }
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn collects_one_record_per_changed_file() {
        let source = MemorySource::new(vec![
            ("src/a.rs", "diff a"),
            ("src/b.rs", "diff b"),
        ]);
        let collector = DiffCollector::new(ExclusionSet::new(vec![]));
        let records = collector.collect(&source).await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], DiffRecord { file: "src/a.rs".into(), diff: "diff a".into() });
    }

    #[tokio::test]
    async fn excluded_files_filtered_and_never_fetched() {
        let source = MemorySource::new(vec![
            ("src/a.ts", "diff a"),
            ("bun.lock", "lockfile noise"),
        ]);
        let collector = DiffCollector::new(ExclusionSet::new(vec![
            "dist".to_string(),
            "bun.lock".to_string(),
        ]));
        let records = collector.collect(&source).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].file, "src/a.ts");
        // bun.lock must not have cost a diff fetch
        assert_eq!(source.fetch_count(), 1);
    }

    #[tokio::test]
    async fn empty_summary_is_empty_result_not_error() {
        let source = MemorySource::new(vec![]);
        let collector = DiffCollector::default();
        let records = collector.collect(&source).await.unwrap();
        assert!(records.is_empty());
        assert_eq!(source.fetch_count(), 0);
    }

    #[tokio::test]
    async fn source_report_order_is_preserved() {
        let source = MemorySource::new(vec![
            ("z.rs", ""),
            ("a.rs", ""),
            ("m.rs", ""),
        ]);
        let collector = DiffCollector::new(ExclusionSet::new(vec![]));
        let records = collector.collect(&source).await.unwrap();
        let order: Vec<&str> = records.iter().map(|r| r.file.as_str()).collect();
        assert_eq!(order, vec!["z.rs", "a.rs", "m.rs"]);
    }

    #[tokio::test]
    async fn empty_diff_text_is_kept() {
        let source = MemorySource::new(vec![("mode-change-only.rs", "")]);
        let collector = DiffCollector::new(ExclusionSet::new(vec![]));
        let records = collector.collect(&source).await.unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].diff.is_empty());
    }

    #[test]
    fn default_exclusions_match_config() {
        let set = ExclusionSet::default();
        assert!(set.contains("dist"));
        assert!(set.contains("bun.lock"));
        assert!(!set.contains("src/main.rs"));
    }

    #[tokio::test]
    async fn git_open_rejects_missing_directory() {
        let req = ChangeRequest { root_dir: "/definitely/not/a/dir".into() };
        let err = GitCli::open(&req).await.unwrap_err();
        assert!(matches!(err, ToolError::Repository(_)));
    }
}
