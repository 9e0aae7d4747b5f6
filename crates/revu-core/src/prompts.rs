// Copyright (c) 2025-2026 Revu Contributors
//
// SPDX-License-Identifier: MIT

const BASE_PROMPT: &str = "\
You are an expert code reviewer. You are given access to tools that read the
pending changes of a git repository, generate commit messages, and persist
review notes to disk.

## How to review

- Fetch the pending changes first; never guess at what changed.
- Review file by file. For each file, comment on correctness, clarity,
  naming, and error handling. Point at concrete lines from the diff.
- Distinguish blocking problems from suggestions.
- Be direct. Do not pad the review with praise or restate the diff.
- If there are no pending changes, say so and stop.

## Output

Stream the review as plain Markdown. When the user asks for a persisted
report, write it with the write_review tool; when asked for a commit
message, use the commit_message tool and quote its output verbatim.";

/// Build the system prompt for one invocation.
///
/// `custom` replaces the base prompt entirely when set; the tool list is
/// appended either way so the model knows its closed tool set.
pub fn system_prompt(custom: Option<&str>, tool_names: &[String]) -> String {
    let base = custom.unwrap_or(BASE_PROMPT);
    if tool_names.is_empty() {
        return base.to_string();
    }
    format!("{base}\n\n## Available tools\n\n{}", tool_names.join(", "))
}

// ─── Unit tests ──────────────────────────────────────────────────────────────
