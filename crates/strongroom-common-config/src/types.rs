//! Configuration types.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Path that selects a private in-memory database.
pub const IN_MEMORY_PATH: &str = ":memory:";

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrongroomConfig {
    /// Audit capture settings.
    pub audit: AuditSettings,
    /// Audit database settings.
    pub database: DatabaseSettings,
    /// Logging settings.
    pub logging: LoggingSettings,
}

/// Audit capture settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditSettings {
    /// Which invocations are recorded: `always` or `success_only`.
    pub firing: String,
    /// Upper bound on one store write, in milliseconds.
    pub write_timeout_ms: Option<u64>,
    /// Actor recorded when an operation does not name one.
    pub default_actor: String,
}

impl Default for AuditSettings {
    fn default() -> Self {
        Self {
            firing: "always".to_string(),
            write_timeout_ms: None,
            default_actor: "system".to_string(),
        }
    }
}

impl AuditSettings {
    /// Write timeout as a duration.
    pub fn write_timeout(&self) -> Option<Duration> {
        self.write_timeout_ms.map(Duration::from_millis)
    }
}

/// Audit database settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// SQLite file path, or `:memory:`.
    pub path: String,
    /// Maximum pooled connections.
    pub max_connections: u32,
    /// Connections kept open when idle.
    pub min_connections: u32,
    /// Enable write-ahead logging.
    pub wal_mode: bool,
    /// How long a writer waits on a locked database (ms).
    pub busy_timeout_ms: u64,
    /// How long to wait for a pooled connection (ms).
    pub acquire_timeout_ms: u64,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: ".strongroom/audit.db".to_string(),
            max_connections: 10,
            min_connections: 1,
            wal_mode: true,
            busy_timeout_ms: 5_000,
            acquire_timeout_ms: 30_000,
        }
    }
}

impl DatabaseSettings {
    /// Check if the database lives only in memory.
    pub fn is_in_memory(&self) -> bool {
        self.path == IN_MEMORY_PATH
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Minimum level: trace, debug, info, warn or error.
    pub level: String,
    /// Output format: pretty, compact or json.
    pub format: String,
    /// Optional log file, written in addition to stderr.
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}
