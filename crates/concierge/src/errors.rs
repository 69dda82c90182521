use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Orchestrator-level failures. Any of these aborts the request pipeline;
/// collaborator failures are handled separately (see `sources::SourceError`)
/// and degrade gracefully instead of aborting.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Deserialize, Serialize)]
pub enum AgentError {
    #[error("completion request failed: {0}")]
    Transport(String),

    #[error("tool not found: {0}")]
    ToolNotFound(String),

    #[error("invalid tool arguments: {0}")]
    InvalidArguments(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type AgentResult<T> = Result<T, AgentError>;
