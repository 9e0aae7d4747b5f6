// Copyright (c) 2025-2026 Revu Contributors
//
// SPDX-License-Identifier: MIT
pub mod builtin;
mod commit;
mod diff;
mod error;
mod registry;
pub mod schema;
mod tool;
mod writer;

pub use commit::{CommitMessageSynthesizer, NO_CHANGES_MESSAGE};
pub use diff::{
    ChangeRequest, DiffCollector, DiffRecord, DiffSource, ExclusionSet, GitCli, MemorySource,
};
pub use error::ToolError;
pub use registry::{ToolRegistry, ToolSchema};
pub use tool::{Tool, ToolCall, ToolOutput};
pub use writer::{ArtifactWriter, MarkdownWriteRequest, WriteReceipt};
