//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures. Every
/// operation either succeeds or fails without touching state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value was rejected at construction (e.g. a negative amount).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An operation was attempted in a state that does not allow it.
    ///
    /// This signals a contract violation by the caller, not a condition to retry.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// A percentage was computed against a zero base.
    #[error("division by zero")]
    DivisionByZero,

    /// An intermediate result did not fit in the decimal range.
    #[error("arithmetic overflow: {0}")]
    Overflow(String),
}

impl DomainError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    pub fn overflow(msg: impl Into<String>) -> Self {
        Self::Overflow(msg.into())
    }
}
