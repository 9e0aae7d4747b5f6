// Copyright (c) 2025-2026 Revu Contributors
//
// SPDX-License-Identifier: MIT
use revu_tools::ToolCall;

/// Events emitted by the agent during a single invocation.
/// The consumer (the CLI event pump) subscribes to drive its output.
#[derive(Debug, Clone)]
pub enum AgentEvent {
    /// A text chunk streamed from the model, forwarded in arrival order.
    TextDelta(String),
    /// A complete text response from the model (after streaming finishes)
    TextComplete(String),
    /// The model has requested a tool call
    ToolCallStarted(ToolCall),
    /// A tool call finished
    ToolCallFinished {
        call_id: String,
        tool_name: String,
        output: String,
        is_error: bool,
    },
    /// Current token usage update
    TokenUsage { input: u32, output: u32 },
    /// The model responded without requesting tools — the invocation is done.
    TurnComplete,
    /// The step ceiling was reached while the model still wanted tools.
    /// A bounded, expected outcome, not an error; streamed text stands.
    Aborted { steps: u32 },
}
