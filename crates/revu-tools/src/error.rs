use thiserror::Error;

/// Failure taxonomy for tools and the components behind them.
///
/// `InvalidInput` and failed executions are fed back to the model as
/// error-flagged tool results; the remaining variants are systemic and abort
/// the invocation when they reach the orchestrator boundary.
#[derive(Debug, Error, Clone)]
pub enum ToolError {
    #[error("repository error: {0}")]
    Repository(String),

    #[error("invalid tool input: {0}")]
    InvalidInput(String),

    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("generation error: {0}")]
    Generation(String),

    #[error("filesystem error: {0}")]
    FileSystem(String),
}

impl From<std::io::Error> for ToolError {
    fn from(e: std::io::Error) -> Self {
        ToolError::FileSystem(e.to_string())
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────
