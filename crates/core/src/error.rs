//! Failures raised by portal domain code.

use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

/// Rejections a command or configuration can produce. Carries no IO errors;
/// those are wrapped with `anyhow` at the edges.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Input was malformed (bad path, missing wizard field).
    #[error("validation failed: {0}")]
    Validation(String),

    /// The command does not fit the aggregate's current state.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    #[error("invalid identifier: {0}")]
    InvalidId(String),

    #[error("not found")]
    NotFound,

    /// Optimistic concurrency or store contention.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The requesting roles may not run this command.
    #[error("unauthorized")]
    Unauthorized,
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }
}
