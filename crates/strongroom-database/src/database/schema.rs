//! Audit record schema.

use super::migration::{Migration, MigrationError, MigrationResult, MigrationRunner};
use sqlx::SqlitePool;

/// Migrations that create the audit record schema.
pub fn audit_migrations() -> Vec<Migration> {
    vec![
        Migration::new(
            1,
            "create_audit_records",
            r#"
            CREATE TABLE IF NOT EXISTS audit_records (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                entity_type TEXT NOT NULL,
                operation_type TEXT NOT NULL,
                actor TEXT NOT NULL,
                created_at DATETIME NOT NULL,
                payload TEXT NOT NULL CHECK (json_valid(payload)),
                outcome TEXT NOT NULL CHECK (outcome IN ('success', 'failure')),
                failure_reason TEXT
            )
            "#,
        ),
        Migration::new(
            2,
            "index_audit_records_entity",
            "CREATE INDEX IF NOT EXISTS idx_audit_records_entity
             ON audit_records (entity_type, created_at)",
        ),
    ]
}

/// Bring the audit schema up to date.
pub async fn migrate(pool: &SqlitePool) -> Result<Vec<MigrationResult>, MigrationError> {
    let mut runner = MigrationRunner::new(pool.clone());
    runner.add_migrations(audit_migrations());
    runner.run().await
}
