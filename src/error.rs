//! Error types for the canvas core
//!
//! Interactive gestures never fail; these errors only appear at the
//! serialization and validation boundary.

use thiserror::Error;

use crate::document::DocumentIssue;

/// Result type alias using [`DocumentError`]
pub type Result<T> = std::result::Result<T, DocumentError>;

/// Errors raised while loading, saving or validating documents and configuration
#[derive(Debug, Error)]
pub enum DocumentError {
    /// JSON (de)serialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The document violates one or more structural invariants
    #[error("Invalid document: {}", format_issues(.0))]
    Invalid(Vec<DocumentIssue>),

    /// Configuration values are inconsistent
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl DocumentError {
    /// Create a configuration error with a message
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

fn format_issues(issues: &[DocumentIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
