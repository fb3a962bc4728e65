//! Static audit metadata.

use crate::{ActorSource, OperationType};

/// Audit metadata attached to an operation when it is registered.
///
/// Immutable once attached: records built for the operation always copy
/// `entity_type` and `operation_type` from here, never from the call site.
#[derive(Debug, Clone)]
pub struct AuditMetadata {
    /// Logical subject of the operation (e.g. `"branch"`).
    pub entity_type: String,
    /// Kind of change performed.
    pub operation_type: OperationType,
    /// Identity responsible for the operation. `None` defers to the
    /// interceptor's default actor.
    pub actor: Option<ActorSource>,
}

impl AuditMetadata {
    /// Create metadata without an explicit actor.
    pub fn new(entity_type: impl Into<String>, operation_type: impl Into<OperationType>) -> Self {
        Self {
            entity_type: entity_type.into(),
            operation_type: operation_type.into(),
            actor: None,
        }
    }

    /// Set the actor.
    pub fn with_actor(mut self, actor: impl Into<ActorSource>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    /// Identity for a record being built now, or `fallback` if none was set.
    pub fn resolve_actor(&self, fallback: &str) -> String {
        match &self.actor {
            Some(actor) => actor.resolve(),
            None => fallback.to_string(),
        }
    }
}
