// Copyright (c) 2025-2026 Revu Contributors
//
// SPDX-License-Identifier: MIT
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use crate::diff::{ChangeRequest, GitCli};
use crate::tool::{Tool, ToolCall, ToolOutput};
use crate::{CommitMessageSynthesizer, ToolError};

/// Built-in tool that generates a commit message for pending changes.
pub struct CommitMessageTool {
    synthesizer: CommitMessageSynthesizer,
}

impl CommitMessageTool {
    pub fn new(synthesizer: CommitMessageSynthesizer) -> Self {
        Self { synthesizer }
    }
}

#[async_trait]
impl Tool for CommitMessageTool {
    fn name(&self) -> &str {
        "commit_message"
    }

    fn description(&self) -> &str {
        "Generate a commit message for all pending changes in a directory. \
         Uses a Conventional Commits type prefix and a subject line of at most \
         72 characters. Returns a fixed no-changes notice when nothing changed."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "root_dir": {
                    "type": "string",
                    "minLength": 1,
                    "description": "The root directory of the repository to inspect"
                }
            },
            "required": ["root_dir"]
        })
    }

    async fn execute(&self, call: &ToolCall) -> ToolOutput {
        let request: ChangeRequest = match serde_json::from_value(call.args.clone()) {
            Ok(r) => r,
            Err(e) => {
                return ToolOutput::err(&call.id, ToolError::InvalidInput(e.to_string()).to_string())
            }
        };

        debug!(root_dir = %request.root_dir, "synthesizing commit message");

        let source = match GitCli::open(&request).await {
            Ok(s) => s,
            Err(e) => return ToolOutput::err(&call.id, e.to_string()),
        };
        match self.synthesizer.synthesize(&source).await {
            Ok(message) => ToolOutput::ok(&call.id, message),
            Err(e) => ToolOutput::err(&call.id, e.to_string()),
        }
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use revu_model::ScriptedMockProvider;
    use serde_json::json;

    use super::*;
    use crate::{DiffCollector, ExclusionSet};

    fn tool() -> CommitMessageTool {
        CommitMessageTool::new(CommitMessageSynthesizer::new(
            Arc::new(ScriptedMockProvider::always_text("feat: add parser")),
            DiffCollector::new(ExclusionSet::default()),
        ))
    }

    #[tokio::test]
    async fn invalid_root_dir_is_error_result() {
        let t = tool();
        let call = ToolCall {
            id: "1".into(),
            name: "commit_message".into(),
            args: json!({ "root_dir": "/no/such/repo" }),
        };
        let out = t.execute(&call).await;
        assert!(out.is_error);
        assert!(out.content.contains("repository error"));
    }

    #[test]
    fn schema_matches_change_request() {
        let schema = tool().parameters_schema();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["required"][0], "root_dir");
    }
}
