//! Audit pipeline errors.

use std::time::Duration;
use thiserror::Error;

/// Errors raised while auditing one invocation.
#[derive(Debug, Error)]
pub enum AuditError {
    /// Declared parameter names and supplied values differ in count.
    #[error("operation '{operation}' declares {expected} parameters but was called with {actual}")]
    ArityMismatch {
        operation: String,
        expected: usize,
        actual: usize,
    },

    /// A captured value has no JSON representation.
    #[error("failed to serialize parameter '{parameter}': {message}")]
    Serialization { parameter: String, message: String },

    /// The store could not append the record.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

impl AuditError {
    /// Check if this is an arity mismatch.
    pub fn is_arity_mismatch(&self) -> bool {
        matches!(self, Self::ArityMismatch { .. })
    }

    /// Check if this is a serialization error.
    pub fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization { .. })
    }

    /// Check if this is a persistence error.
    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::Persistence(_))
    }
}

/// Errors raised by an audit store.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The store could not be reached.
    #[error("audit store unavailable: {0}")]
    Unavailable(String),

    /// The store refused the write (constraint violation and the like).
    #[error("audit store rejected record: {0}")]
    Rejected(String),

    /// The write did not finish in time.
    #[error("audit write timed out after {0:?}")]
    Timeout(Duration),
}
