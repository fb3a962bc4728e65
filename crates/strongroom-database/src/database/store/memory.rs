use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use strongroom_audit_types::{AuditRecord, AuditRecordId, AuditStore, NewAuditRecord, PersistenceError};
use tokio::sync::Mutex;
use tracing::debug;

/// Audit store that keeps records in process memory.
///
/// Records are lost when the store is dropped. The store can be switched
/// offline to exercise failure handling.
#[derive(Debug)]
pub struct MemoryAuditStore {
    records: Mutex<Vec<AuditRecord>>,
    available: AtomicBool,
}

impl Default for MemoryAuditStore {
    fn default() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            available: AtomicBool::new(true),
        }
    }
}

impl MemoryAuditStore {
    /// Create an empty, available store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following append succeed or fail with `Unavailable`.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Snapshot of all appended records, in append order.
    pub async fn records(&self) -> Vec<AuditRecord> {
        self.records.lock().await.clone()
    }

    /// Number of appended records.
    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    /// Check if nothing has been appended yet.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl AuditStore for MemoryAuditStore {
    async fn append(&self, record: NewAuditRecord) -> Result<AuditRecordId, PersistenceError> {
        if !self.available.load(Ordering::SeqCst) {
            return Err(PersistenceError::Unavailable(
                "memory audit store is offline".to_string(),
            ));
        }

        let mut records = self.records.lock().await;
        let id = AuditRecordId::new(records.len() as i64 + 1);
        records.push(record.with_id(id));
        debug!(%id, "audit record stored in memory");
        Ok(id)
    }
}
