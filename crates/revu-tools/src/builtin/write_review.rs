// Copyright (c) 2025-2026 Revu Contributors
//
// SPDX-License-Identifier: MIT
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use crate::tool::{Tool, ToolCall, ToolOutput};
use crate::writer::{ArtifactWriter, MarkdownWriteRequest};
use crate::ToolError;

/// Built-in tool that persists review text to a Markdown file.
pub struct WriteReviewTool {
    writer: ArtifactWriter,
    default_filename: String,
}

impl WriteReviewTool {
    pub fn new(default_filename: String) -> Self {
        Self { writer: ArtifactWriter, default_filename }
    }
}

#[async_trait]
impl Tool for WriteReviewTool {
    fn name(&self) -> &str {
        "write_review"
    }

    fn description(&self) -> &str {
        "Write review text to a Markdown file in the current working directory. \
         Overwrites the file by default; set append=true to add to the end with \
         a single newline separator."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "content": {
                    "type": "string",
                    "description": "The Markdown content to persist"
                },
                "filename": {
                    "type": "string",
                    "description": "Target filename, relative to the working directory (default REVIEW.md)"
                },
                "append": {
                    "type": "boolean",
                    "description": "If true, append to existing content instead of overwriting (default false)"
                }
            },
            "required": ["content"]
        })
    }

    async fn execute(&self, call: &ToolCall) -> ToolOutput {
        let mut args = call.args.clone();
        if args.get("filename").is_none() {
            args["filename"] = Value::String(self.default_filename.clone());
        }
        let request: MarkdownWriteRequest = match serde_json::from_value(args) {
            Ok(r) => r,
            Err(e) => {
                return ToolOutput::err(&call.id, ToolError::InvalidInput(e.to_string()).to_string())
            }
        };

        debug!(filename = %request.filename, append = request.append, "writing review");

        match self.writer.write(&request).await {
            Ok(receipt) => ToolOutput::ok(&call.id, receipt.message),
            Err(e) => ToolOutput::err(&call.id, e.to_string()),
        }
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────
