//! Errors raised while decoding editor input, before validation runs.
//!
//! Validation itself never fails: findings are reported as `Diagnostic`s.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatflowError {
    #[error("Failed to parse chatflow JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Node '{node_id}' has an invalid '{kind}' config: {message}")]
    InvalidConfig {
        node_id: String,
        kind: String,
        message: String,
    },

    #[error("Chatflow has {count} {what}, limit is {limit}")]
    TooLarge {
        what: &'static str,
        count: usize,
        limit: usize,
    },
}

impl ChatflowError {
    pub fn invalid_config(
        node_id: impl Into<String>,
        kind: impl Into<String>,
        message: impl std::fmt::Display,
    ) -> Self {
        ChatflowError::InvalidConfig {
            node_id: node_id.into(),
            kind: kind.into(),
            message: message.to_string(),
        }
    }
}
