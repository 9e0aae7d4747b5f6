// Copyright (c) 2025-2026 Revu Contributors
//
// SPDX-License-Identifier: MIT
use serde::{Deserialize, Serialize};

/// Top-level configuration for one review invocation.
///
/// There is no config-file loader: the process persists no configuration.
/// Everything here is a code-level default, optionally overridden from the
/// CLI (model name) or environment (API key).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReviewConfig {
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub tools: ToolsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Provider identifier: "google" | "mock"
    pub provider: String,
    /// Model name forwarded to the provider API
    pub name: String,
    /// Environment variable that holds the API key (read at runtime)
    pub api_key_env: Option<String>,
    /// Base URL override.  Useful for local proxies.
    pub base_url: Option<String>,
    /// Maximum tokens to request in a single completion
    pub max_tokens: Option<u32>,
    /// Sampling temperature (0.0–2.0)
    pub temperature: Option<f32>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider: "google".into(),
            name: "gemini-2.5-flash".into(),
            api_key_env: Some("GEMINI_API_KEY".into()),
            base_url: None,
            max_tokens: None,
            temperature: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Hard ceiling on model request rounds per invocation.  Reaching it is
    /// a bounded, expected outcome — the loop stops without error.
    #[serde(default = "default_max_steps")]
    pub max_steps: u32,
    /// Custom system prompt override.  `None` uses the built-in review prompt.
    #[serde(default)]
    pub system_prompt: Option<String>,
}

fn default_max_steps() -> u32 {
    10
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self { max_steps: default_max_steps(), system_prompt: None }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Filenames never surfaced to the model.  Matched exactly against the
    /// paths the revision source reports — no globbing.
    #[serde(default = "default_excluded_files")]
    pub excluded_files: Vec<String>,
    /// Default filename for written review artifacts, resolved against the
    /// process working directory.
    #[serde(default = "default_review_filename")]
    pub review_filename: String,
}

fn default_excluded_files() -> Vec<String> {
    ["dist", "bun.lock", "target", "Cargo.lock"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_review_filename() -> String {
    "REVIEW.md".into()
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            excluded_files: default_excluded_files(),
            review_filename: default_review_filename(),
        }
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────
