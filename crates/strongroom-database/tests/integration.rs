use std::sync::Arc;
use strongroom_audit_types::{
    AuditMetadata, AuditRecordBuilder, AuditStore, InvocationOutcome, OperationType,
};
use strongroom_database::{migrate, DatabasePool, PoolConfig, SqliteAuditStore};
use tempfile::tempdir;

async fn file_pool(path: &std::path::Path, max_connections: u32) -> DatabasePool {
    let config = PoolConfig::builder()
        .database_path(path.to_string_lossy())
        .max_connections(max_connections)
        .build()
        .unwrap();
    let db = DatabasePool::new(config).await.unwrap();
    migrate(db.pool()).await.unwrap();
    db
}

#[tokio::test]
async fn test_records_survive_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("audit.db");
    let metadata = AuditMetadata::new("branch", OperationType::Update).with_actor("ops");

    {
        let db = file_pool(&path, 2).await;
        let store = SqliteAuditStore::new(db.pool().clone());
        let record = AuditRecordBuilder::new(&metadata, r#"{"id":4,"dto":{"city":"Oslo"}}"#)
            .outcome(InvocationOutcome::Success)
            .build();
        store.append(record).await.unwrap();
        db.close().await;
    }

    let db = file_pool(&path, 2).await;
    let store = SqliteAuditStore::new(db.pool().clone());
    let records = store.fetch_all().await.unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].actor, "ops");
    assert_eq!(
        records[0].payload_json().unwrap(),
        serde_json::json!({"id": 4, "dto": {"city": "Oslo"}})
    );
    db.close().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_appends_get_distinct_ids() {
    let dir = tempdir().unwrap();
    let db = file_pool(&dir.path().join("audit.db"), 4).await;
    let store = Arc::new(SqliteAuditStore::new(db.pool().clone()));
    let metadata = Arc::new(AuditMetadata::new("atm", OperationType::Save));

    let handles: Vec<_> = (0..32)
        .map(|n| {
            let store = store.clone();
            let metadata = metadata.clone();
            tokio::spawn(async move {
                let record = AuditRecordBuilder::new(&metadata, format!(r#"{{"serial":{n}}}"#)).build();
                store.append(record).await
            })
        })
        .collect();

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap().unwrap().get());
    }
    ids.sort_unstable();
    ids.dedup();

    assert_eq!(ids.len(), 32);
    assert_eq!(store.count().await.unwrap(), 32);
    db.close().await;
}
