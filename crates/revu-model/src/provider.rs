use async_trait::async_trait;
use futures::{Stream, StreamExt};
use std::pin::Pin;

use crate::{CompletionRequest, Message, ResponseEvent};

pub type ResponseStream = Pin<Box<dyn Stream<Item = anyhow::Result<ResponseEvent>> + Send>>;

#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Human-readable provider name for status display.
    fn name(&self) -> &str;

    /// Model identifier as reported to users.
    fn model_name(&self) -> &str;

    /// Send a completion request and return a streaming response.
    async fn complete(&self, req: CompletionRequest) -> anyhow::Result<ResponseStream>;

    /// One-shot, tool-free completion: send a single prompt and collect the
    /// streamed text into a string.
    ///
    /// Used where a caller wants exactly one generation with no tool use and
    /// no iteration (commit-message synthesis).  Stream errors abort the
    /// call; `Error` events are surfaced as warnings only.
    async fn complete_text(&self, prompt: &str) -> anyhow::Result<String> {
        let req = CompletionRequest {
            messages: vec![Message::user(prompt)],
            tools: vec![],
            stream: true,
        };
        let mut stream = self.complete(req).await?;
        let mut text = String::new();
        while let Some(event) = stream.next().await {
            match event? {
                ResponseEvent::TextDelta(delta) => text.push_str(&delta),
                ResponseEvent::Done => break,
                ResponseEvent::Error(e) => {
                    tracing::warn!("model stream error: {e}");
                }
                _ => {}
            }
        }
        Ok(text)
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ScriptedMockProvider;

    #[tokio::test]
    async fn complete_text_collects_all_deltas() {
        let p = ScriptedMockProvider::new(vec![vec![
            ResponseEvent::TextDelta("fix: ".into()),
            ResponseEvent::TextDelta("adjust parser".into()),
            ResponseEvent::Done,
        ]]);
        let text = p.complete_text("prompt").await.unwrap();
        assert_eq!(text, "fix: adjust parser");
    }

    #[tokio::test]
    async fn complete_text_sends_no_tools() {
        let p = ScriptedMockProvider::always_text("ok");
        let _ = p.complete_text("prompt").await.unwrap();
        let req = p.last_request.lock().unwrap().clone().unwrap();
        assert!(req.tools.is_empty());
    }

    #[tokio::test]
    async fn complete_text_stops_at_done() {
        let p = ScriptedMockProvider::new(vec![vec![
            ResponseEvent::TextDelta("before".into()),
            ResponseEvent::Done,
            ResponseEvent::TextDelta("after".into()),
        ]]);
        let text = p.complete_text("prompt").await.unwrap();
        assert_eq!(text, "before");
    }
}
