//! Audit record identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Store-assigned identifier of a persisted audit record.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuditRecordId(i64);

impl AuditRecordId {
    /// Wrap a raw identifier handed out by a store.
    pub fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Get the raw identifier.
    pub fn get(&self) -> i64 {
        self.0
    }
}

impl From<i64> for AuditRecordId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for AuditRecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "aud_{}", self.0)
    }
}

impl fmt::Debug for AuditRecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AuditRecordId({})", self)
    }
}
