//! Audit interception for Strongroom.
//!
//! Operations are marked auditable once, at startup, by registering them in
//! an [`AuditRegistry`]. Business code then runs each call through an
//! [`AuditInterceptor`], passing the argument values with [`audit_args!`]:
//!
//! ```ignore
//! let out = interceptor
//!     .intercept("branch.save", audit_args![&dto], service.save(&dto))
//!     .await;
//! ```
//!
//! Once the call completes the interceptor extracts the named parameters,
//! serializes them into a JSON payload, builds a record and appends it to the
//! configured [`AuditStore`]. Calls to unregistered operations pass through
//! untouched.

mod clock;
mod extractor;
mod interceptor;
mod registry;
mod serializer;

pub use clock::MonotonicClock;
pub use extractor::extract;
pub use interceptor::{AuditInterceptor, AuditStatus, CaptureConfig, FiringPolicy, Intercepted};
pub use registry::{AuditRegistry, AuditRegistryBuilder, AuditedOperation, RegistryError};
pub use serializer::{canonicalize, deserialize_payload, serialize};

// Re-export types for convenience
pub use strongroom_audit_types::{
    ActorSource, Arguments, AuditError, AuditMetadata, AuditRecord, AuditRecordId, AuditStore,
    AuditValue, InvocationOutcome, NewAuditRecord, OperationType, PersistenceError,
};

/// Collect argument references for [`AuditInterceptor::intercept`].
///
/// Values are listed in the same order as the operation's declared
/// parameters. Each must implement `serde::Serialize` and `Sync`.
#[macro_export]
macro_rules! audit_args {
    () => {
        $crate::Arguments::empty()
    };
    ($($arg:expr),+ $(,)?) => {
        $crate::Arguments::from(::std::vec![
            $($arg as &(dyn $crate::AuditValue + Sync)),+
        ])
    };
}
