//! Audit store boundary.

use crate::{AuditRecordId, NewAuditRecord, PersistenceError};
use async_trait::async_trait;

/// Durable sink for audit records.
///
/// Implementations must be safe to share between tasks and must make each
/// append atomic: a record is either stored whole or not at all.
#[async_trait]
pub trait AuditStore: Send + Sync {
    /// Append one record and return the identifier assigned to it.
    async fn append(&self, record: NewAuditRecord) -> Result<AuditRecordId, PersistenceError>;
}
