//! Audit interception for Strongroom back-office services.
//!
//! [`AuditSystem::bootstrap`] wires the pieces together from a
//! [`StrongroomConfig`]: it opens the SQLite pool, migrates the audit schema
//! and hands a [`SqliteAuditStore`] to an [`AuditInterceptor`] built from
//! the application's [`AuditRegistry`]. Services then route auditable calls
//! through [`AuditInterceptor::intercept`].

mod system;

pub use system::{capture_config, log_config, AuditSystem, BootstrapError};

pub use strongroom_audit_capture::*;
pub use strongroom_common_config::{ConfigLoader, StrongroomConfig};
pub use strongroom_database::{DatabasePool, MemoryAuditStore, PoolConfig, SqliteAuditStore};
