//! Outcome of an intercepted invocation.

use serde::{Deserialize, Serialize};

/// How the audited operation itself finished.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InvocationOutcome {
    /// The operation returned normally.
    Success,
    /// The operation returned an error.
    Failure { reason: String },
}

impl InvocationOutcome {
    /// Create a failure outcome.
    pub fn failure(reason: impl Into<String>) -> Self {
        Self::Failure {
            reason: reason.into(),
        }
    }

    /// Build the outcome of a finished call.
    pub fn of<T, E: std::fmt::Display>(result: &Result<T, E>) -> Self {
        match result {
            Ok(_) => Self::Success,
            Err(err) => Self::failure(err.to_string()),
        }
    }

    /// Check if the outcome is successful.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Short status label, as persisted.
    pub fn status(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure { .. } => "failure",
        }
    }

    /// Failure reason, if any.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Success => None,
            Self::Failure { reason } => Some(reason),
        }
    }

    /// Rebuild an outcome from its persisted columns.
    pub fn from_parts(status: &str, reason: Option<String>) -> Self {
        match status {
            "success" => Self::Success,
            _ => Self::Failure {
                reason: reason.unwrap_or_default(),
            },
        }
    }
}

impl Default for InvocationOutcome {
    fn default() -> Self {
        Self::Success
    }
}
