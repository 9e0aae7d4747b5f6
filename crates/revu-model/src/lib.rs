// Copyright (c) 2025-2026 Revu Contributors
//
// SPDX-License-Identifier: MIT
mod gemini;
mod mock;
mod provider;
mod types;

pub use gemini::GeminiProvider;
pub use mock::{MockProvider, ScriptedMockProvider};
pub use provider::{ModelProvider, ResponseStream};
pub use types::*;

use std::sync::Arc;

use revu_config::ModelConfig;

/// Construct a provider from its configuration.
///
/// Dispatches on `ModelConfig::provider`.  API keys are resolved from the
/// configured environment variable at construction time so a missing key
/// fails before the first model call, not in the middle of a review.
pub fn from_config(cfg: &ModelConfig) -> anyhow::Result<Arc<dyn ModelProvider>> {
    let api_key = cfg
        .api_key_env
        .as_deref()
        .and_then(|var| std::env::var(var).ok());

    match cfg.provider.as_str() {
        "google" => Ok(Arc::new(GeminiProvider::new(
            cfg.name.clone(),
            api_key,
            cfg.base_url.clone(),
            cfg.max_tokens,
            cfg.temperature,
        ))),
        "mock" => Ok(Arc::new(MockProvider)),
        other => anyhow::bail!("unknown model provider: {other}"),
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────
