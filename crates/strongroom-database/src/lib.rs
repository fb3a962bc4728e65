//! SQLite persistence for Strongroom audit records.
//!
//! [`DatabasePool`] owns the connection pool, [`MigrationRunner`] keeps the
//! schema current and [`SqliteAuditStore`] appends records. A
//! [`MemoryAuditStore`] is provided for embedding without a database file.

pub mod database;

pub use database::*;
