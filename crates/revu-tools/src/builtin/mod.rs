// Copyright (c) 2025-2026 Revu Contributors
//
// SPDX-License-Identifier: MIT
mod commit_message;
mod get_changes;
mod write_review;

pub use commit_message::CommitMessageTool;
pub use get_changes::GetChangesTool;
pub use write_review::WriteReviewTool;

use std::sync::Arc;

use revu_config::ToolsConfig;
use revu_model::ModelProvider;

use crate::{CommitMessageSynthesizer, DiffCollector, ExclusionSet, ToolRegistry};

/// Build the standard registry: diff collection, commit-message synthesis,
/// and review persistence.
pub fn standard_registry(model: Arc<dyn ModelProvider>, cfg: &ToolsConfig) -> ToolRegistry {
    let exclusions = ExclusionSet::new(cfg.excluded_files.iter().cloned());
    let collector = DiffCollector::new(exclusions);

    let mut registry = ToolRegistry::new();
    registry.register(GetChangesTool::new(collector.clone()));
    registry.register(CommitMessageTool::new(CommitMessageSynthesizer::new(
        model, collector,
    )));
    registry.register(WriteReviewTool::new(cfg.review_filename.clone()));
    registry
}

// ─── Unit tests ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use revu_model::MockProvider;

    use super::*;

    #[test]
    fn standard_registry_has_all_three_tools() {
        let reg = standard_registry(Arc::new(MockProvider), &ToolsConfig::default());
        assert_eq!(
            reg.names(),
            vec!["commit_message", "get_changes", "write_review"]
        );
    }
}
