//! [`AuditStore`](strongroom_audit_types::AuditStore) implementations.

mod memory;
mod sqlite;

pub use memory::MemoryAuditStore;
pub use sqlite::SqliteAuditStore;
