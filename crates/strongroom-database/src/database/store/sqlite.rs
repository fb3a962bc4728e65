use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use strongroom_audit_types::{
    AuditRecord, AuditRecordId, AuditStore, InvocationOutcome, NewAuditRecord, OperationType,
    PersistenceError,
};
use strongroom_common_log::spans::{instrument_future, store_span};
use tracing::debug;

/// SQLite codes that mean the database could not be reached or written
/// right now, as opposed to refusing this particular record.
const UNAVAILABLE_CODES: [i64; 6] = [
    5,  // SQLITE_BUSY
    6,  // SQLITE_LOCKED
    8,  // SQLITE_READONLY
    10, // SQLITE_IOERR
    13, // SQLITE_FULL
    14, // SQLITE_CANTOPEN
];

/// Audit store backed by the `audit_records` table.
///
/// Each append is a single `INSERT`, so a record is either stored whole or
/// not at all. The pool serializes concurrent writers.
#[derive(Debug, Clone)]
pub struct SqliteAuditStore {
    pool: SqlitePool,
}

impl SqliteAuditStore {
    /// Create a store on a pool whose schema is already migrated.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Pool the store writes through.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// All records in id order.
    pub async fn fetch_all(&self) -> Result<Vec<AuditRecord>, PersistenceError> {
        let rows = sqlx::query(
            "SELECT id, entity_type, operation_type, actor, created_at, payload, outcome, failure_reason
             FROM audit_records
             ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(classify)?;

        rows.iter().map(decode_row).collect()
    }

    /// Number of stored records.
    pub async fn count(&self) -> Result<i64, PersistenceError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM audit_records")
            .fetch_one(&self.pool)
            .await
            .map_err(classify)?;
        Ok(count)
    }

    async fn insert(&self, record: &NewAuditRecord) -> Result<AuditRecordId, PersistenceError> {
        let result = sqlx::query(
            "INSERT INTO audit_records
             (entity_type, operation_type, actor, created_at, payload, outcome, failure_reason)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&record.entity_type)
        .bind(record.operation_type.as_str())
        .bind(&record.actor)
        .bind(record.created_at)
        .bind(&record.payload)
        .bind(record.outcome.status())
        .bind(record.outcome.reason())
        .execute(&self.pool)
        .await
        .map_err(classify)?;

        Ok(AuditRecordId::new(result.last_insert_rowid()))
    }
}

#[async_trait]
impl AuditStore for SqliteAuditStore {
    async fn append(&self, record: NewAuditRecord) -> Result<AuditRecordId, PersistenceError> {
        let span = store_span("sqlite", &record.entity_type);
        let id = instrument_future(self.insert(&record), span).await?;
        debug!(%id, "audit record inserted");
        Ok(id)
    }
}

fn decode_row(row: &SqliteRow) -> Result<AuditRecord, PersistenceError> {
    let decode = |e: sqlx::Error| PersistenceError::Rejected(format!("corrupt audit row: {e}"));

    let operation_type: String = row.try_get("operation_type").map_err(decode)?;
    let status: String = row.try_get("outcome").map_err(decode)?;
    let reason: Option<String> = row.try_get("failure_reason").map_err(decode)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(decode)?;

    Ok(AuditRecord {
        id: AuditRecordId::new(row.try_get("id").map_err(decode)?),
        entity_type: row.try_get("entity_type").map_err(decode)?,
        operation_type: OperationType::from(operation_type),
        actor: row.try_get("actor").map_err(decode)?,
        created_at,
        payload: row.try_get("payload").map_err(decode)?,
        outcome: InvocationOutcome::from_parts(&status, reason),
    })
}

/// Map a driver error onto the persistence taxonomy.
fn classify(err: sqlx::Error) -> PersistenceError {
    match &err {
        sqlx::Error::Database(db_err) => {
            let primary = db_err
                .code()
                .and_then(|code| code.parse::<i64>().ok())
                .map(|code| code & 0xff);

            match primary {
                Some(code) if UNAVAILABLE_CODES.contains(&code) => {
                    PersistenceError::Unavailable(db_err.message().to_string())
                }
                _ => PersistenceError::Rejected(db_err.message().to_string()),
            }
        }
        sqlx::Error::PoolClosed => {
            PersistenceError::Unavailable("audit database pool is closed".to_string())
        }
        sqlx::Error::PoolTimedOut => {
            PersistenceError::Unavailable("timed out acquiring an audit database connection".to_string())
        }
        _ => PersistenceError::Unavailable(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{migrate, DatabasePool, PoolConfig};
    use strongroom_audit_types::{AuditMetadata, AuditRecordBuilder};

    async fn store() -> (DatabasePool, SqliteAuditStore) {
        let db = DatabasePool::new(PoolConfig::in_memory()).await.unwrap();
        migrate(db.pool()).await.unwrap();
        let store = SqliteAuditStore::new(db.pool().clone());
        (db, store)
    }

    #[tokio::test]
    async fn test_append_and_read_back() {
        let (_db, store) = store().await;
        let metadata = AuditMetadata::new("branch", OperationType::Save).with_actor("teller-7");
        let record = AuditRecordBuilder::new(&metadata, r#"{"id":null,"name":"Central"}"#).build();

        let id = store.append(record.clone()).await.unwrap();
        assert_eq!(id.get(), 1);

        let stored = store.fetch_all().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, id);
        assert_eq!(stored[0].entity_type, "branch");
        assert_eq!(stored[0].operation_type, OperationType::Save);
        assert_eq!(stored[0].actor, "teller-7");
        assert_eq!(stored[0].payload, record.payload);
        assert!(stored[0].outcome.is_success());
        assert_eq!(
            stored[0].created_at.timestamp_micros(),
            record.created_at.timestamp_micros()
        );
    }

    #[tokio::test]
    async fn test_failure_outcome_round_trips() {
        let (_db, store) = store().await;
        let metadata = AuditMetadata::new("passport", "reissue");
        let record = AuditRecordBuilder::new(&metadata, r#"{"number":"AB123"}"#)
            .outcome(InvocationOutcome::failure("expired"))
            .build();

        store.append(record).await.unwrap();

        let stored = store.fetch_all().await.unwrap();
        assert_eq!(stored[0].operation_type, OperationType::Other("reissue".into()));
        assert_eq!(stored[0].outcome.reason(), Some("expired"));
    }

    #[tokio::test]
    async fn test_invalid_payload_is_rejected() {
        let (_db, store) = store().await;
        let metadata = AuditMetadata::new("branch", OperationType::Save);
        let record = AuditRecordBuilder::new(&metadata, "not json").build();

        let err = store.append(record).await.unwrap_err();
        assert!(matches!(err, PersistenceError::Rejected(_)));
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_closed_pool_is_unavailable() {
        let (db, store) = store().await;
        db.close().await;

        let metadata = AuditMetadata::new("branch", OperationType::Delete);
        let record = AuditRecordBuilder::new(&metadata, r#"{"id":3}"#).build();

        let err = store.append(record).await.unwrap_err();
        assert!(matches!(err, PersistenceError::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_missing_schema_is_rejected() {
        let db = DatabasePool::new(PoolConfig::in_memory()).await.unwrap();
        let store = SqliteAuditStore::new(db.pool().clone());
        let metadata = AuditMetadata::new("branch", OperationType::Save);

        let err = store
            .append(AuditRecordBuilder::new(&metadata, "{}").build())
            .await
            .unwrap_err();
        assert!(matches!(err, PersistenceError::Rejected(_)));
    }
}
