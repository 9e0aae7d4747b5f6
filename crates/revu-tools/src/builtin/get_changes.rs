// Copyright (c) 2025-2026 Revu Contributors
//
// SPDX-License-Identifier: MIT
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use crate::diff::{ChangeRequest, GitCli};
use crate::tool::{Tool, ToolCall, ToolOutput};
use crate::{DiffCollector, ToolError};

/// Built-in tool that surfaces the pending git diffs of a directory.
pub struct GetChangesTool {
    collector: DiffCollector,
}

impl GetChangesTool {
    pub fn new(collector: DiffCollector) -> Self {
        Self { collector }
    }
}

#[async_trait]
impl Tool for GetChangesTool {
    fn name(&self) -> &str {
        "get_changes"
    }

    fn description(&self) -> &str {
        "Get the git diffs for all changed files in a directory. \
         Returns a JSON array of { file, diff } objects, one per changed file, \
         in the order git reports them. Build output and lockfiles are filtered out."
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

        debug!(root_dir = %request.root_dir, "collecting diffs");

        let source = match GitCli::open(&request).await {
            Ok(s) => s,
            Err(e) => return ToolOutput::err(&call.id, e.to_string()),
        };
        let records = match self.collector.collect(&source).await {
            Ok(r) => r,
            Err(e) => return ToolOutput::err(&call.id, e.to_string()),
        };

        match serde_json::to_string_pretty(&records) {
            Ok(json) => ToolOutput::ok(&call.id, json),
            Err(e) => ToolOutput::err(&call.id, format!("failed to serialize diffs: {e}")),
        }
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::ExclusionSet;

    fn tool() -> GetChangesTool {
        GetChangesTool::new(DiffCollector::new(ExclusionSet::default()))
    }

    #[tokio::test]
    async fn invalid_root_dir_is_error_result_not_panic() {
        let t = tool();
        let call = ToolCall {
            id: "1".into(),
            name: "get_changes".into(),
            args: json!({ "root_dir": "/no/such/repo" }),
        };
        let out = t.execute(&call).await;
        assert!(out.is_error);
        assert!(out.content.contains("repository error"));
    }

    #[test]
    fn schema_requires_non_empty_root_dir() {
        let t = tool();
        let schema = t.parameters_schema();
        assert_eq!(schema["required"][0], "root_dir");
        assert_eq!(schema["properties"]["root_dir"]["minLength"], 1);
    }
}
