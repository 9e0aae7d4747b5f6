// Copyright (c) 2025-2026 Revu Contributors
//
// SPDX-License-Identifier: MIT
mod agent;
mod events;
mod prompts;

pub use agent::Agent;
pub use events::AgentEvent;
pub use prompts::system_prompt;
