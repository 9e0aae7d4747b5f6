// Copyright (c) 2025-2026 Revu Contributors
//
// SPDX-License-Identifier: MIT
use std::sync::Arc;

use tracing::debug;

use revu_model::ModelProvider;

use crate::{DiffCollector, DiffRecord, DiffSource, ToolError};

/// Returned verbatim when the diff set is empty, without a model call.
pub const NO_CHANGES_MESSAGE: &str = "No changes detected — nothing to commit.";

const INSTRUCTION_TEMPLATE: &str = "\
Write a git commit message for the following changes.

Rules:
- Use a Conventional Commits type prefix (feat, fix, docs, refactor, test, chore, ...).
- The subject line must be at most 72 characters.
- Do not put file paths in the subject line.
- Add a body only when it conveys information beyond the subject.
- Output only the commit message, nothing else.

Changes:

";

/// Turns a collected diff set into a single commit message via one
/// non-iterative model call.
pub struct CommitMessageSynthesizer {
    model: Arc<dyn ModelProvider>,
    collector: DiffCollector,
}

impl CommitMessageSynthesizer {
    pub fn new(model: Arc<dyn ModelProvider>, collector: DiffCollector) -> Self {
        Self { model, collector }
    }

    /// Collect diffs from `source` and synthesize a commit message.
    ///
    /// An empty diff set short-circuits to [`NO_CHANGES_MESSAGE`] without
    /// touching the model — no cost, no latency.  The model is called
    /// exactly once, with no tools and no retries; its text is returned
    /// verbatim.
    pub async fn synthesize(&self, source: &dyn DiffSource) -> Result<String, ToolError> {
        let records = self.collector.collect(source).await?;
        if records.is_empty() {
            return Ok(NO_CHANGES_MESSAGE.to_string());
        }

        let prompt = build_prompt(&records);
        debug!(files = records.len(), "requesting commit message");

        let text = self
            .model
            .complete_text(&prompt)
            .await
            .map_err(|e| ToolError::Generation(e.to_string()))?;
        if text.is_empty() {
            return Err(ToolError::Generation("model returned no text".into()));
        }
        Ok(text)
    }
}

/// `"File: <file>\n<diff>"` per record, joined by blank lines, appended to
/// the fixed instruction template.
fn build_prompt(records: &[DiffRecord]) -> String {
    let changes = records
        .iter()
        .map(|r| format!("File: {}\n{}", r.file, r.diff))
        .collect::<Vec<_>>()
        .join("\n\n");
    format!("{INSTRUCTION_TEMPLATE}{changes}")
}

// ─── Unit tests ──────────────────────────────────────────────────────────────
