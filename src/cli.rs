// Copyright (c) 2025-2026 Revu Contributors
//
// SPDX-License-Identifier: MIT
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "revu",
    about = "An AI code-review and commit-assistant agent",
    version,
    long_about = None,
)]
pub struct Cli {
    /// Repository directory whose pending changes are reviewed
    #[arg(value_name = "DIR", default_value = ".")]
    pub dir: String,

    /// Replace the built-in review instruction entirely
    #[arg(long, short = 'p', value_name = "TEXT")]
    pub prompt: Option<String>,

    /// Model to use, e.g. "gemini-2.5-flash"
    #[arg(long, short = 'M', env = "REVU_MODEL")]
    pub model: Option<String>,

    /// Model provider: "google" (default) or "mock" for offline smoke runs
    #[arg(long, env = "REVU_PROVIDER")]
    pub provider: Option<String>,

    /// Filename for persisted reviews (relative to the working directory)
    #[arg(long, value_name = "PATH")]
    pub review_file: Option<String>,

    /// Increase verbosity (-v = debug, -vv = trace)
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// The user-turn instruction sent to the agent.
    pub fn instruction(&self) -> String {
        match &self.prompt {
            Some(p) => p.clone(),
            None => format!(
                "Review the code changes in '{}' directory, \
                 make your reviews and suggestions file by file",
                self.dir
            ),
        }
    }
}
