//! Workflow error model.

use thiserror::Error;

/// Result type used across the workflow layers.
pub type WorkflowResult<T> = Result<T, WorkflowError>;

/// Engine-boundary error.
///
/// Every operation on the workflow returns either the updated resource or one
/// of these kinds; nothing else escapes the engine. Keep this focused on
/// deterministic business failures, infrastructure concerns belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    /// The operation is not allowed in the request's current status.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// The same actor already acted at that approval level.
    #[error("duplicate action: {0}")]
    DuplicateAction(String),

    /// A late-arriving approval found an earlier rejection; the request
    /// status has been forced to rejected as a corrective side effect.
    #[error("request already rejected")]
    AlreadyRejected,

    /// The caller lacks the role or ownership the operation requires.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Finalization needs a linked proforma and none is present.
    #[error("missing proforma: {0}")]
    MissingProforma(String),

    /// Unknown request/proforma identifier.
    #[error("not found")]
    NotFound,

    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),
}

impl WorkflowError {
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    pub fn duplicate_action(msg: impl Into<String>) -> Self {
        Self::DuplicateAction(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn missing_proforma(msg: impl Into<String>) -> Self {
        Self::MissingProforma(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }
}
