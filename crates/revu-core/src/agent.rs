// Copyright (c) 2025-2026 Revu Contributors
//
// SPDX-License-Identifier: MIT
use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Context;
use futures::StreamExt;
use tokio::sync::mpsc;
use tracing::warn;

use revu_config::ReviewConfig;
use revu_model::{CompletionRequest, FunctionCall, Message, MessageContent, ResponseEvent, Role};
use revu_tools::{ToolCall, ToolOutput, ToolRegistry};

use crate::{events::AgentEvent, prompts::system_prompt};

/// The core agent.  Owns the conversation and drives the model ↔ tool loop.
///
/// One invocation is at most `max_steps` Requesting phases.  The loop ends
/// in one of two expected states: Done (a model response with no tool-call
/// requests) or Aborted (the ceiling was reached while the model still
/// wanted tools).  Only systemic failures produce an `Err`.
pub struct Agent {
    messages: Vec<Message>,
    tools: Arc<ToolRegistry>,
    model: Arc<dyn revu_model::ModelProvider>,
    config: Arc<ReviewConfig>,
}

impl Agent {
    pub fn new(
        model: Arc<dyn revu_model::ModelProvider>,
        tools: Arc<ToolRegistry>,
        config: Arc<ReviewConfig>,
    ) -> Self {
        Self { messages: Vec::new(), tools, model, config }
    }

    /// Push a user message, run the agent loop, and stream events through
    /// the sender.  The caller drops the receiver when it is no longer
    /// interested.
    pub async fn submit(
        &mut self,
        user_input: &str,
        tx: mpsc::Sender<AgentEvent>,
    ) -> anyhow::Result<()> {
        // Inject the system message on the first turn.
        if self.messages.is_empty() {
            let prompt = system_prompt(
                self.config.agent.system_prompt.as_deref(),
                &self.tools.names(),
            );
            self.messages.push(Message::system(prompt));
        }
        self.messages.push(Message::user(user_input));

        self.run_loop(tx).await
    }

    /// The main loop: model call → optional tool calls → repeat.
    async fn run_loop(&mut self, tx: mpsc::Sender<AgentEvent>) -> anyhow::Result<()> {
        let max_steps = self.config.agent.max_steps;

        for step in 1..=max_steps {
            let (text, tool_calls) = self.stream_one_turn(tx.clone()).await?;

            if !text.is_empty() {
                self.messages.push(Message::assistant(&text));
            }

            // Done: a response with no tool-call requests ends the loop
            // immediately, regardless of what earlier turns requested.
            if tool_calls.is_empty() {
                let _ = tx.send(AgentEvent::TurnComplete).await;
                return Ok(());
            }

            // Ceiling: this was the last permitted Requesting phase and the
            // model still wants tools.  Their results could never be fed
            // back, so the calls are not executed.
            if step == max_steps {
                break;
            }

            // Phase 1: record all assistant tool-call messages before any
            // result, keeping the conversation history well-formed for the
            // provider wire formats.
            for tc in &tool_calls {
                let _ = tx.send(AgentEvent::ToolCallStarted(tc.clone())).await;
                self.messages.push(Message {
                    role: Role::Assistant,
                    content: MessageContent::ToolCall {
                        tool_call_id: tc.id.clone(),
                        function: FunctionCall {
                            name: tc.name.clone(),
                            arguments: tc.args.to_string(),
                        },
                    },
                });
            }

            // Phase 2: execute the batch concurrently.  The calls are
            // independent reads/writes on disjoint resources; each task gets
            // a cloned Arc to the registry and a panic in one does not
            // cancel the others.
            let mut tasks = Vec::with_capacity(tool_calls.len());
            for tc in tool_calls.clone() {
                let registry = Arc::clone(&self.tools);
                tasks.push(tokio::spawn(async move { registry.execute(&tc).await }));
            }

            // Await in request order so results are reassembled as one batch
            // before the next Requesting phase.
            let mut outputs = Vec::with_capacity(tool_calls.len());
            for (i, task) in tasks.into_iter().enumerate() {
                let output = match task.await {
                    // An unknown tool name is systemic — abort the invocation.
                    Ok(result) => {
                        if let Err(e) = &result {
                            warn!(tool = %tool_calls[i].name, "systemic tool failure: {e}");
                        }
                        result.context("tool dispatch failed")?
                    }
                    Err(e) => {
                        ToolOutput::err(&tool_calls[i].id, format!("tool panicked: {e}"))
                    }
                };
                let _ = tx
                    .send(AgentEvent::ToolCallFinished {
                        call_id: tool_calls[i].id.clone(),
                        tool_name: tool_calls[i].name.clone(),
                        output: output.content.clone(),
                        is_error: output.is_error,
                    })
                    .await;
                outputs.push(output);
            }

            // Phase 3: feed the whole batch back to the model.  A failed
            // call's error text is the tool's result — the model sees it and
            // can adapt or stop requesting that tool.
            for (tc, output) in tool_calls.iter().zip(outputs.iter()) {
                self.messages.push(Message::tool_result(&tc.id, &output.content));
            }
        }

        let _ = tx.send(AgentEvent::Aborted { steps: max_steps }).await;
        Ok(())
    }

    /// Call the model once, streaming text deltas and collecting tool-call
    /// events.  Returns (full_text, tool_calls).
    async fn stream_one_turn(
        &mut self,
        tx: mpsc::Sender<AgentEvent>,
    ) -> anyhow::Result<(String, Vec<ToolCall>)> {
        let tools: Vec<revu_model::ToolSchema> = self
            .tools
            .schemas()
            .into_iter()
            .map(|s| revu_model::ToolSchema {
                name: s.name,
                description: s.description,
                parameters: s.parameters,
            })
            .collect();

        let req = CompletionRequest {
            messages: self.messages.clone(),
            tools,
            stream: true,
        };

        let mut stream = self
            .model
            .complete(req)
            .await
            .context("model completion failed")?;

        let mut full_text = String::new();
        // Keyed by the parallel-tool-call index from the provider: argument
        // chunks for different calls may interleave.
        let mut pending: HashMap<u32, PendingToolCall> = HashMap::new();

        while let Some(event) = stream.next().await {
            match event? {
                ResponseEvent::TextDelta(delta) if !delta.is_empty() => {
                    full_text.push_str(&delta);
                    let _ = tx.send(AgentEvent::TextDelta(delta)).await;
                }
                ResponseEvent::ToolCall { index, id, name, arguments } => {
                    let ptc = pending.entry(index).or_insert_with(|| PendingToolCall {
                        id: String::new(),
                        name: String::new(),
                        args_buf: String::new(),
                    });
                    if !id.is_empty() {
                        ptc.id = id;
                    }
                    if !name.is_empty() {
                        ptc.name = name;
                    }
                    ptc.args_buf.push_str(&arguments);
                }
                ResponseEvent::Usage { input_tokens, output_tokens } => {
                    let _ = tx
                        .send(AgentEvent::TokenUsage {
                            input: input_tokens,
                            output: output_tokens,
                        })
                        .await;
                }
                ResponseEvent::Done => break,
                ResponseEvent::Error(e) => {
                    warn!("model stream error: {e}");
                }
                _ => {}
            }
        }

        // Flush accumulated tool calls, ordered by index.  A call with an
        // empty name cannot be dispatched and is dropped; an empty id gets a
        // synthetic fallback so the history stays well-formed.
        let mut pending_sorted: Vec<(u32, PendingToolCall)> = pending.into_iter().collect();
        pending_sorted.sort_by_key(|(idx, _)| *idx);
        let mut tool_calls = Vec::new();
        for (i, (_, ptc)) in pending_sorted.into_iter().enumerate() {
            if ptc.name.is_empty() {
                warn!(
                    tool_call_id = %ptc.id,
                    "dropping tool call with empty name from model; cannot dispatch"
                );
                continue;
            }
            let mut tc = ptc.finish();
            if tc.id.is_empty() {
                tc.id = format!("tc_synthetic_{i}");
                warn!(
                    tool_name = %tc.name,
                    tool_call_id = %tc.id,
                    "tool call from model had empty id; generated synthetic id"
                );
            }
            tool_calls.push(tc);
        }

        if !full_text.is_empty() {
            let _ = tx.send(AgentEvent::TextComplete(full_text.clone())).await;
        }

        Ok((full_text, tool_calls))
    }

    /// The conversation so far, for inspection by tests and callers.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }
}

struct PendingToolCall {
    id: String,
    name: String,
    args_buf: String,
}

impl PendingToolCall {
    fn finish(self) -> ToolCall {
        // Always resolve to a JSON object: providers require tool arguments
        // to be an object, and `null` corrupts the next request.
        let args = if self.args_buf.is_empty() {
            serde_json::Value::Object(Default::default())
        } else {
            match serde_json::from_str(&self.args_buf) {
                Ok(v) => v,
                Err(e) => {
                    warn!(
                        tool_name = %self.name,
                        tool_call_id = %self.id,
                        error = %e,
                        "model sent tool call with invalid JSON arguments; substituting {{}}"
                    );
                    serde_json::Value::Object(Default::default())
                }
            }
        };
        ToolCall { id: self.id, name: self.name, args }
    }
}
