//! Boundary error adapter.
//!
//! This layer defines no error taxonomy of its own: context-factory and
//! handler failures pass through to the server as `ErrorData` untouched.
//! `ToolCallError` only covers the two places where this crate itself has
//! to produce an error at the callback boundary.

use rmcp::ErrorData as McpError;
use thiserror::Error;

/// Errors produced at the tool-call boundary.
#[derive(Debug, Error)]
pub enum ToolCallError {
    /// The raw input could not be parsed into the tool's declared input type.
    #[error("invalid tool input: {0}")]
    InvalidInput(#[from] serde_json::Error),

    /// Context construction failed before the tool handler ran.
    #[error("context construction failed: {0}")]
    Context(String),
}

impl ToolCallError {
    /// Create a new context-construction error.
    pub fn context(msg: impl Into<String>) -> Self {
        Self::Context(msg.into())
    }
}

impl From<ToolCallError> for McpError {
    fn from(err: ToolCallError) -> Self {
        match &err {
            ToolCallError::InvalidInput(_) => McpError::invalid_params(err.to_string(), None),
            ToolCallError::Context(_) => McpError::internal_error(err.to_string(), None),
        }
    }
}
