//! Bootstrapping of the audit pipeline.

use std::path::Path;
use std::sync::Arc;
use strongroom_audit_capture::{AuditInterceptor, AuditRegistry, CaptureConfig, FiringPolicy};
use strongroom_common_config::{
    validate, AuditSettings, ConfigError, ConfigLoader, EnvError, Environment, LoggingSettings,
    StrongroomConfig,
};
use strongroom_common_log::{LogConfig, LogError, LogFormat, LogLevel};
use strongroom_database::{
    migrate, DatabasePool, MigrationError, PoolConfig, PoolError, SqliteAuditStore,
};
use thiserror::Error;
use tracing::{info, instrument};

/// Errors raised while starting the audit system.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Env(#[from] EnvError),

    #[error(transparent)]
    Log(#[from] LogError),

    #[error(transparent)]
    Pool(#[from] PoolError),

    #[error(transparent)]
    Migration(#[from] MigrationError),

    #[error("failed to prepare database directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid audit setting: {0}")]
    InvalidSetting(String),
}

/// Capture configuration for the `audit` section of the config file.
pub fn capture_config(settings: &AuditSettings) -> Result<CaptureConfig, BootstrapError> {
    let firing = settings.firing.parse::<FiringPolicy>().map_err(|_| {
        BootstrapError::InvalidSetting(format!("unknown firing policy '{}'", settings.firing))
    })?;

    let config = CaptureConfig::default()
        .with_firing(firing)
        .with_default_actor(settings.default_actor.as_str());

    Ok(match settings.write_timeout() {
        Some(timeout) => config.with_write_timeout(timeout),
        None => config,
    })
}

/// Logging configuration for the `logging` section of the config file.
///
/// `STRONGROOM_LOG_*` variables still take precedence.
pub fn log_config(settings: &LoggingSettings) -> LogConfig {
    LogConfig {
        level: LogLevel::parse(&settings.level).unwrap_or_default(),
        format: LogFormat::parse(&settings.format),
        file_path: settings.file.clone(),
        ..LogConfig::default()
    }
    .with_env_overrides()
}

/// A running audit pipeline backed by SQLite.
pub struct AuditSystem {
    db: DatabasePool,
    store: SqliteAuditStore,
    interceptor: AuditInterceptor,
}

impl AuditSystem {
    /// Open the audit database, migrate it and build the interceptor.
    #[instrument(skip_all, fields(path = %config.database.path))]
    pub async fn bootstrap(
        config: &StrongroomConfig,
        registry: AuditRegistry,
    ) -> Result<Self, BootstrapError> {
        validate(config)?;
        let capture = capture_config(&config.audit)?;

        if !config.database.is_in_memory() {
            if let Some(parent) = Path::new(&config.database.path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
        }

        let db = DatabasePool::new(PoolConfig::from_settings(&config.database)).await?;
        let applied = migrate(db.pool()).await?;

        let store = SqliteAuditStore::new(db.pool().clone());
        let operations = registry.len();
        let interceptor = AuditInterceptor::new(registry, Arc::new(store.clone()), capture);

        info!(
            operations,
            migrations = applied.len(),
            firing = %interceptor.config().firing,
            "Audit system ready"
        );

        Ok(Self {
            db,
            store,
            interceptor,
        })
    }

    /// Load `.env` files and `.strongroom/config.yaml` from `project_dir`,
    /// then bootstrap.
    pub async fn load(
        project_dir: impl AsRef<Path>,
        registry: AuditRegistry,
    ) -> Result<Self, BootstrapError> {
        let project_dir = project_dir.as_ref();
        Environment::init_from(project_dir)?;
        let config = ConfigLoader::new(project_dir).load()?;
        Self::bootstrap(&config, registry).await
    }

    /// Install the global tracing subscriber described by `config`.
    pub fn init_logging(config: &StrongroomConfig) -> Result<(), BootstrapError> {
        strongroom_common_log::init(log_config(&config.logging))?;
        Ok(())
    }

    /// Interceptor to route auditable calls through.
    pub fn interceptor(&self) -> &AuditInterceptor {
        &self.interceptor
    }

    /// Store the interceptor appends to.
    pub fn store(&self) -> &SqliteAuditStore {
        &self.store
    }

    /// Underlying connection pool.
    pub fn pool(&self) -> &DatabasePool {
        &self.db
    }

    /// Close the connection pool. Appends after this fail as unavailable.
    pub async fn shutdown(self) {
        let stats = self.db.stats();
        info!(
            connections = stats.size,
            idle = stats.idle,
            utilization = stats.utilization(),
            "Shutting down audit system"
        );
        self.db.close().await;
    }
}
