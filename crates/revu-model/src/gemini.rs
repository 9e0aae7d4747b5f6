//! Google Gemini driver — native Generative Language API.
//!
//! Uses the `streamGenerateContent` endpoint with SSE framing.
//!
//! # Auth
//! API key appended as a `?key=...` query param, resolved from
//! `GEMINI_API_KEY` by default.
//!
//! # Endpoint pattern
//! `POST https://generativelanguage.googleapis.com/v1beta/models/{model}:streamGenerateContent?alt=sse`

use anyhow::{bail, Context};
use async_trait::async_trait;
use futures::StreamExt;
use serde_json::{json, Value};
use tracing::debug;

use crate::{provider::ResponseStream, CompletionRequest, MessageContent, ResponseEvent, Role};

pub struct GeminiProvider {
    model: String,
    api_key: Option<String>,
    base_url: String,
    max_tokens: u32,
    temperature: f32,
    client: reqwest::Client,
}

impl GeminiProvider {
    pub fn new(
        model: String,
        api_key: Option<String>,
        base_url: Option<String>,
        max_tokens: Option<u32>,
        temperature: Option<f32>,
    ) -> Self {
        Self {
            model,
            api_key,
            base_url: base_url
                .unwrap_or_else(|| "https://generativelanguage.googleapis.com".into()),
            max_tokens: max_tokens.unwrap_or(8192),
            temperature: temperature.unwrap_or(0.2),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl crate::ModelProvider for GeminiProvider {
    fn name(&self) -> &str {
        "google"
    }
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, req: CompletionRequest) -> anyhow::Result<ResponseStream> {
        let key = self.api_key.as_deref().context("GEMINI_API_KEY not set")?;

        // Separate system instruction from conversation
        let mut system_parts: Vec<Value> = Vec::new();
        let mut contents: Vec<Value> = Vec::new();

        for m in &req.messages {
            match m.role {
                Role::System => {
                    if let Some(t) = m.as_text() {
                        system_parts.push(json!({ "text": t }));
                    }
                }
                Role::User | Role::Tool => {
                    contents.push(json!({ "role": "user", "parts": message_to_parts(m) }));
                }
                Role::Assistant => {
                    contents.push(json!({ "role": "model", "parts": message_to_parts(m) }));
                }
            }
        }

        // Tool declarations
        let tools_section: Option<Value> = if req.tools.is_empty() {
            None
        } else {
            let function_declarations: Vec<Value> = req
                .tools
                .iter()
                .map(|t| {
                    json!({
                        "name": t.name,
                        "description": t.description,
                        "parameters": t.parameters,
                    })
                })
                .collect();
            Some(json!([{ "functionDeclarations": function_declarations }]))
        };

        let mut body = json!({
            "contents": contents,
            "generationConfig": {
                "maxOutputTokens": self.max_tokens,
                "temperature": self.temperature,
            }
        });
        if !system_parts.is_empty() {
            body["systemInstruction"] = json!({ "parts": system_parts });
        }
        if let Some(tools) = tools_section {
            body["tools"] = tools;
        }

        let url = format!(
            "{}/v1beta/models/{}:streamGenerateContent?alt=sse&key={}",
            self.base_url.trim_end_matches('/'),
            self.model,
            key
        );

        debug!(model = %self.model, "sending Gemini request");

        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .context("Gemini request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            bail!("Gemini error {status}: {text}");
        }

        let byte_stream = resp.bytes_stream();
        // Tool-call indexes must be unique across the whole stream so
        // parallel calls never collide downstream; the counter lives for
        // the lifetime of this response.
        let mut next_call_index: u32 = 0;
        let event_stream = byte_stream.flat_map(move |chunk| {
            let lines = match chunk {
                Ok(b) => String::from_utf8_lossy(&b).to_string(),
                Err(e) => return futures::stream::iter(vec![Err(anyhow::anyhow!(e))]),
            };
            let events: Vec<anyhow::Result<ResponseEvent>> = lines
                .lines()
                .filter_map(|line| Some(line.strip_prefix("data: ")?.trim().to_string()))
                .flat_map(|line| {
                    if line == "[DONE]" {
                        return vec![Ok(ResponseEvent::Done)];
                    }
                    match serde_json::from_str::<Value>(&line) {
                        Ok(v) => parse_chunk(&v, &mut next_call_index),
                        Err(_) => Vec::new(),
                    }
                })
                .collect();
            futures::stream::iter(events)
        });

        Ok(Box::pin(event_stream))
    }
}

/// Convert a conversation message into a Gemini API `parts` array.
fn message_to_parts(m: &crate::Message) -> Vec<Value> {
    match &m.content {
        MessageContent::Text(t) => vec![json!({ "text": t })],
        MessageContent::ToolCall { tool_call_id: _, function } => {
            let input: Value = serde_json::from_str(&function.arguments).unwrap_or(json!({}));
            vec![json!({
                "functionCall": {
                    "name": function.name,
                    "args": input,
                }
            })]
        }
        MessageContent::ToolResult { tool_call_id, content } => {
            vec![json!({
                "functionResponse": {
                    "name": tool_call_id,
                    "response": { "output": content },
                }
            })]
        }
    }
}

/// One event per part: a chunk may interleave text with several parallel
/// `functionCall` parts and none of them may be dropped.
fn parse_chunk(v: &Value, next_call_index: &mut u32) -> Vec<anyhow::Result<ResponseEvent>> {
    let mut events = Vec::new();

    let candidate = &v["candidates"][0];
    if let Some(parts) = candidate["content"]["parts"].as_array() {
        for part in parts {
            // Function call — Gemini sends complete args in one part and has
            // no call id of its own, so the function name doubles as the id.
            if let Some(fc) = part.get("functionCall") {
                let name = fc["name"].as_str().unwrap_or("").to_string();
                let args = serde_json::to_string(&fc["args"]).unwrap_or_default();
                let index = *next_call_index;
                *next_call_index += 1;
                events.push(Ok(ResponseEvent::ToolCall {
                    index,
                    id: name.clone(),
                    name,
                    arguments: args,
                }));
            } else if let Some(text) = part["text"].as_str() {
                events.push(Ok(ResponseEvent::TextDelta(text.to_string())));
            }
        }
    }

    // Usage metadata rides on the final chunk, after any last parts.
    if let Some(meta) = v.get("usageMetadata") {
        events.push(Ok(ResponseEvent::Usage {
            input_tokens: meta["promptTokenCount"].as_u64().unwrap_or(0) as u32,
            output_tokens: meta["candidatesTokenCount"].as_u64().unwrap_or(0) as u32,
        }));
    }

    // finishReason without any parts → stream finished
    if events.is_empty() && candidate["finishReason"].as_str().is_some() {
        events.push(Ok(ResponseEvent::Done));
    }

    events
}
