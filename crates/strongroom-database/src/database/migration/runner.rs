use super::types::*;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use std::collections::BTreeMap;
use strongroom_common_log::spans::{migration_span, Timer};
use tracing::{debug, info, instrument, Instrument};

/// Applies [`Migration`]s in version order and records them in
/// `_strongroom_migrations`.
pub struct MigrationRunner {
    pool: SqlitePool,
    migrations: BTreeMap<i64, Migration>,
}

impl MigrationRunner {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            migrations: BTreeMap::new(),
        }
    }

    pub fn add_migration(&mut self, migration: Migration) {
        self.migrations.insert(migration.version, migration);
    }

    pub fn add_migrations(&mut self, migrations: impl IntoIterator<Item = Migration>) {
        for migration in migrations {
            self.add_migration(migration);
        }
    }

    /// Initialize the migration tracking table
    pub async fn init(&self) -> Result<(), MigrationError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS _strongroom_migrations (
                version INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                checksum TEXT NOT NULL,
                applied_at DATETIME NOT NULL,
                execution_time_ms INTEGER NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get current database version (highest applied migration)
    pub async fn current_version(&self) -> Result<Option<i64>, MigrationError> {
        self.init().await?;

        let row = sqlx::query("SELECT MAX(version) AS version FROM _strongroom_migrations")
            .fetch_one(&self.pool)
            .await?;

        Ok(row.try_get::<Option<i64>, _>("version")?)
    }

    /// Get list of applied migrations
    pub async fn get_applied(&self) -> Result<Vec<AppliedMigration>, MigrationError> {
        self.init().await?;

        let applied = sqlx::query_as::<_, AppliedMigration>(
            "SELECT version, name, checksum, applied_at, execution_time_ms
             FROM _strongroom_migrations
             ORDER BY version",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(applied)
    }

    /// Get list of pending migrations, in the order they will run
    pub async fn pending(&self) -> Result<Vec<Migration>, MigrationError> {
        let current = self.current_version().await?.unwrap_or(0);

        Ok(self
            .migrations
            .range(current + 1..)
            .map(|(_, m)| m.clone())
            .collect())
    }

    /// Verify that applied migrations match the known ones.
    ///
    /// Returns one message per mismatch; empty means the schema is intact.
    pub async fn verify(&self) -> Result<Vec<String>, MigrationError> {
        let applied = self.get_applied().await?;
        let mut mismatches = Vec::new();

        for applied_migration in applied {
            match self.migrations.get(&applied_migration.version) {
                Some(known) if known.checksum != applied_migration.checksum => {
                    mismatches.push(format!(
                        "Migration {} checksum mismatch: expected {}, found {}",
                        applied_migration.version, known.checksum, applied_migration.checksum
                    ));
                }
                Some(_) => {}
                None => mismatches.push(format!(
                    "Migration {} is applied but no longer known",
                    applied_migration.version
                )),
            }
        }

        Ok(mismatches)
    }

    /// Verify applied migrations, then run all pending ones
    #[instrument(skip(self))]
    pub async fn run(&self) -> Result<Vec<MigrationResult>, MigrationError> {
        let mismatches = self.verify().await?;
        if !mismatches.is_empty() {
            return Err(MigrationError::ChecksumMismatch(mismatches));
        }

        let pending = self.pending().await?;
        if pending.is_empty() {
            debug!("Audit schema is up to date");
            return Ok(Vec::new());
        }

        let mut results = Vec::with_capacity(pending.len());
        for migration in pending {
            let span = migration_span(migration.version, &migration.name);
            results.push(self.apply(migration).instrument(span).await?);
        }

        Ok(results)
    }

    /// Apply one migration and record it, atomically.
    async fn apply(&self, migration: Migration) -> Result<MigrationResult, MigrationError> {
        info!("Applying migration: {} - {}", migration.version, migration.name);
        let timer = Timer::start("migration");

        let mut tx = self.pool.begin().await?;

        sqlx::query(&migration.up_sql)
            .execute(&mut *tx)
            .await
            .map_err(|e| MigrationError::ExecutionFailed {
                version: migration.version,
                message: e.to_string(),
            })?;

        let execution_time_ms = timer.elapsed().as_millis() as i64;

        sqlx::query(
            "INSERT INTO _strongroom_migrations
             (version, name, checksum, applied_at, execution_time_ms)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(migration.version)
        .bind(&migration.name)
        .bind(&migration.checksum)
        .bind(Utc::now())
        .bind(execution_time_ms)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.finish();

        Ok(MigrationResult {
            version: migration.version,
            name: migration.name,
            execution_time_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup_pool() -> SqlitePool {
        sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_migration_runner_init() {
        let runner = MigrationRunner::new(setup_pool().await);

        runner.init().await.unwrap();
        assert_eq!(runner.current_version().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_migrations_run_in_version_order() {
        let mut runner = MigrationRunner::new(setup_pool().await);
        runner.add_migrations([
            Migration::new(2, "add_index", "CREATE INDEX idx_t_name ON t (name)"),
            Migration::new(1, "create_t", "CREATE TABLE t (id INTEGER PRIMARY KEY, name TEXT)"),
        ]);

        let results = runner.run().await.unwrap();
        assert_eq!(
            results.iter().map(|r| r.version).collect::<Vec<_>>(),
            vec![1, 2]
        );
        assert_eq!(runner.current_version().await.unwrap(), Some(2));
        assert!(runner.pending().await.unwrap().is_empty());

        // Second run is a no-op
        assert!(runner.run().await.unwrap().is_empty());
        assert_eq!(runner.get_applied().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_migration_is_not_recorded() {
        let mut runner = MigrationRunner::new(setup_pool().await);
        runner.add_migration(Migration::new(1, "broken", "CREATE TABLE (oops"));

        let err = runner.run().await.unwrap_err();
        assert!(matches!(err, MigrationError::ExecutionFailed { version: 1, .. }));
        assert_eq!(runner.current_version().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_checksum_mismatch_blocks_run() {
        let pool = setup_pool().await;

        let mut runner = MigrationRunner::new(pool.clone());
        runner.add_migration(Migration::new(1, "create_t", "CREATE TABLE t (id INTEGER)"));
        runner.run().await.unwrap();

        let mut edited = MigrationRunner::new(pool);
        edited.add_migration(Migration::new(
            1,
            "create_t",
            "CREATE TABLE t (id INTEGER, extra TEXT)",
        ));

        assert_eq!(edited.verify().await.unwrap().len(), 1);
        assert!(matches!(
            edited.run().await,
            Err(MigrationError::ChecksumMismatch(_))
        ));
    }
}
