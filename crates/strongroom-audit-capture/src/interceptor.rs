//! Interception of auditable operations.

use crate::{extract, serialize, AuditRegistry, AuditedOperation, MonotonicClock};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use strongroom_audit_types::{
    Arguments, AuditError, AuditRecordBuilder, AuditRecordId, AuditStore, InvocationOutcome,
    NewAuditRecord, PersistenceError, DEFAULT_ACTOR,
};
use strongroom_common_log::spans::{audit_span, instrument_future, record_error};
use strum::{Display as StrumDisplay, EnumString};
use tracing::{debug, error, Span};

/// Which completed invocations produce a record.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, StrumDisplay, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FiringPolicy {
    /// Record every attempt, tagged with its outcome.
    #[default]
    Always,
    /// Record only invocations that returned `Ok`.
    SuccessOnly,
}

impl FiringPolicy {
    /// Check if an invocation with this outcome is recorded.
    pub fn fires_for(&self, outcome: &InvocationOutcome) -> bool {
        match self {
            Self::Always => true,
            Self::SuccessOnly => outcome.is_success(),
        }
    }
}

/// Configuration for audit capture.
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Which invocations are recorded.
    pub firing: FiringPolicy,
    /// Upper bound on a single store append. `None` waits indefinitely.
    pub write_timeout: Option<Duration>,
    /// Actor recorded for operations registered without one.
    pub default_actor: String,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            firing: FiringPolicy::default(),
            write_timeout: None,
            default_actor: DEFAULT_ACTOR.to_string(),
        }
    }
}

impl CaptureConfig {
    /// Set the firing policy.
    pub fn with_firing(mut self, firing: FiringPolicy) -> Self {
        self.firing = firing;
        self
    }

    /// Set the actor used when an operation names none.
    pub fn with_default_actor(mut self, actor: impl Into<String>) -> Self {
        self.default_actor = actor.into();
        self
    }

    /// Bound store appends by `timeout`.
    pub fn with_write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = Some(timeout);
        self
    }
}

/// What happened on the audit side of an invocation.
#[derive(Debug)]
pub enum AuditStatus {
    /// The operation is not registered as auditable.
    NotAudited,
    /// Registered, but the firing policy excluded this outcome.
    Skipped,
    /// A record was appended.
    Recorded(AuditRecordId),
    /// The pipeline failed. The business result is unaffected.
    Failed(AuditError),
}

impl AuditStatus {
    /// Identifier of the appended record, if any.
    pub fn record_id(&self) -> Option<AuditRecordId> {
        match self {
            Self::Recorded(id) => Some(*id),
            _ => None,
        }
    }

    /// Pipeline error, if the audit failed.
    pub fn error(&self) -> Option<&AuditError> {
        match self {
            Self::Failed(e) => Some(e),
            _ => None,
        }
    }

    /// Check if the audit failed.
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Business result of an intercepted invocation together with its audit status.
#[derive(Debug)]
#[must_use]
pub struct Intercepted<T, E> {
    /// Result returned by the business operation, untouched.
    pub result: Result<T, E>,
    /// Outcome of the audit pipeline.
    pub audit: AuditStatus,
}

impl<T, E> Intercepted<T, E> {
    /// Discard the audit status and return the business result.
    pub fn into_result(self) -> Result<T, E> {
        self.result
    }

    /// Return the business result, or the audit error if the audit failed.
    pub fn into_checked(self) -> Result<Result<T, E>, AuditError> {
        match self.audit {
            AuditStatus::Failed(e) => Err(e),
            _ => Ok(self.result),
        }
    }
}

/// Wraps business operations and records audited invocations.
///
/// Cheap to clone; clones share the registry, store and clock.
#[derive(Clone)]
pub struct AuditInterceptor {
    registry: Arc<AuditRegistry>,
    store: Arc<dyn AuditStore>,
    config: Arc<CaptureConfig>,
    clock: Arc<MonotonicClock>,
}

impl std::fmt::Debug for AuditInterceptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditInterceptor")
            .field("operations", &self.registry.len())
            .field("config", &self.config)
            .finish()
    }
}

impl AuditInterceptor {
    /// Create a new interceptor.
    pub fn new(registry: AuditRegistry, store: Arc<dyn AuditStore>, config: CaptureConfig) -> Self {
        Self {
            registry: Arc::new(registry),
            store,
            config: Arc::new(config),
            clock: Arc::new(MonotonicClock::new()),
        }
    }

    /// Registry consulted on every call.
    pub fn registry(&self) -> &AuditRegistry {
        &self.registry
    }

    /// Active capture configuration.
    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    /// Check if an operation is audited.
    pub fn is_audited(&self, operation: &str) -> bool {
        self.registry.contains(operation)
    }

    /// Run `call` and, if `operation` is registered, record the invocation.
    ///
    /// The business result is always returned as produced. Audit failures
    /// are logged and reported through [`Intercepted::audit`].
    pub async fn intercept<T, E, F>(
        &self,
        operation: &str,
        args: Arguments<'_>,
        call: F,
    ) -> Intercepted<T, E>
    where
        F: Future<Output = Result<T, E>>,
        E: Display,
    {
        let Some(audited) = self.registry.lookup(operation) else {
            return Intercepted {
                result: call.await,
                audit: AuditStatus::NotAudited,
            };
        };

        let span = audit_span(operation);
        instrument_future(
            async move {
                let result = call.await;
                let outcome = InvocationOutcome::of(&result);
                Span::current().record("outcome", outcome.status());

                let audit = if !self.config.firing.fires_for(&outcome) {
                    debug!(policy = %self.config.firing, "audit skipped");
                    AuditStatus::Skipped
                } else {
                    match self.record(audited, &args, outcome).await {
                        Ok(id) => AuditStatus::Recorded(id),
                        Err(e) => {
                            record_error(&e);
                            error!(error = %e, "audit failed");
                            AuditStatus::Failed(e)
                        }
                    }
                };

                Intercepted { result, audit }
            },
            span,
        )
        .await
    }

    /// Record an invocation of the operation registered as `operation`.
    ///
    /// Returns `Ok(None)` when the operation is not audited. Unlike
    /// [`intercept`](Self::intercept), errors are returned to the caller.
    pub async fn fire(
        &self,
        operation: &str,
        args: &Arguments<'_>,
        outcome: InvocationOutcome,
    ) -> Result<Option<AuditRecordId>, AuditError> {
        match self.registry.lookup(operation) {
            Some(audited) => self.record(audited, args, outcome).await.map(Some),
            None => Ok(None),
        }
    }

    /// Run the pipeline for one invocation: extract, serialize, build, append.
    pub async fn record(
        &self,
        operation: &AuditedOperation,
        args: &Arguments<'_>,
        outcome: InvocationOutcome,
    ) -> Result<AuditRecordId, AuditError> {
        let record = self.prepare(operation, args, outcome)?;
        let id = self.append(record).await?;
        debug!(id = %id, op = %operation.name(), "audit recorded");
        Ok(id)
    }

    fn prepare(
        &self,
        operation: &AuditedOperation,
        args: &Arguments<'_>,
        outcome: InvocationOutcome,
    ) -> Result<NewAuditRecord, AuditError> {
        let context = extract(operation, args)?;
        let payload = serialize(&context)?;

        Ok(AuditRecordBuilder::new(operation.metadata(), payload)
            .outcome(outcome)
            .default_actor(&self.config.default_actor)
            .created_at(self.clock.now())
            .build())
    }

    async fn append(&self, record: NewAuditRecord) -> Result<AuditRecordId, PersistenceError> {
        match self.config.write_timeout {
            Some(limit) => tokio::time::timeout(limit, self.store.append(record))
                .await
                .map_err(|_| PersistenceError::Timeout(limit))?,
            None => self.store.append(record).await,
        }
    }
}
