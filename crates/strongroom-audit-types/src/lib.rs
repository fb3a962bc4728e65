//! Audit record types for Strongroom.
//!
//! These types describe what an audited invocation looks like once it has
//! been captured: the static metadata attached to an operation, the borrowed
//! argument values of one call, the record handed to an [`AuditStore`], and
//! the error taxonomy shared by every stage of the audit pipeline.

mod actor;
mod error;
mod finite;
mod id;
mod metadata;
mod operation;
mod outcome;
mod record;
mod store;
mod value;

pub use actor::{ActorSource, DEFAULT_ACTOR};
pub use error::{AuditError, PersistenceError};
pub use id::AuditRecordId;
pub use metadata::AuditMetadata;
pub use operation::OperationType;
pub use outcome::InvocationOutcome;
pub use record::{AuditRecord, AuditRecordBuilder, NewAuditRecord};
pub use store::AuditStore;
pub use value::{Arguments, AuditValue, InvocationContext};
