// Copyright (c) 2025-2026 Revu Contributors
//
// SPDX-License-Identifier: MIT
use std::path::PathBuf;

use serde::Deserialize;
use tracing::debug;

use crate::ToolError;

fn default_filename() -> String {
    revu_config::ToolsConfig::default().review_filename
}

/// Drives the artifact writer.  `filename` is resolved against the process
/// working directory, not the reviewed repository.
#[derive(Debug, Clone, Deserialize)]
pub struct MarkdownWriteRequest {
    pub content: String,
    #[serde(default = "default_filename")]
    pub filename: String,
    #[serde(default)]
    pub append: bool,
}

/// Confirmation of a completed write — carries the resolved absolute path so
/// callers (and the model) can report where the artifact landed.
#[derive(Debug, Clone)]
pub struct WriteReceipt {
    pub message: String,
    pub path: PathBuf,
}

/// Persists text content to a named file, overwrite or append.
#[derive(Debug, Clone, Default)]
pub struct ArtifactWriter;

impl ArtifactWriter {
    /// Write or append `content` as UTF-8 text.
    ///
    /// Overwrite mode replaces the file in full.  Append mode inserts
    /// exactly one `\n` separator between existing content and `content`;
    /// an absent or empty file receives `content` alone.  Failures surface
    /// as [`ToolError::FileSystem`] — never swallowed.
    pub async fn write(&self, req: &MarkdownWriteRequest) -> Result<WriteReceipt, ToolError> {
        let cwd = std::env::current_dir()
            .map_err(|e| ToolError::FileSystem(format!("cannot resolve working directory: {e}")))?;
        let path = cwd.join(&req.filename);

        debug!(path = %path.display(), append = req.append, "writing artifact");

        if req.append {
            let existing = match tokio::fs::read_to_string(&path).await {
                Ok(s) => s,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
                Err(e) => return Err(e.into()),
            };
            let combined = if existing.is_empty() {
                req.content.clone()
            } else {
                format!("{existing}\n{}", req.content)
            };
            tokio::fs::write(&path, combined).await?;
        } else {
            tokio::fs::write(&path, &req.content).await?;
        }

        let verb = if req.append { "Appended to" } else { "Wrote" };
        Ok(WriteReceipt {
            message: format!("{verb} {}", path.display()),
            path,
        })
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────
