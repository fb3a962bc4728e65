//! Audit records.

use crate::{AuditMetadata, AuditRecordId, InvocationOutcome, OperationType, DEFAULT_ACTOR};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An audit record ready to be appended to a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAuditRecord {
    /// Logical subject of the operation.
    pub entity_type: String,
    /// Kind of change performed.
    pub operation_type: OperationType,
    /// Identity responsible for the operation.
    pub actor: String,
    /// When the record was built.
    pub created_at: DateTime<Utc>,
    /// JSON object mapping parameter name to argument value.
    pub payload: String,
    /// How the intercepted operation finished.
    pub outcome: InvocationOutcome,
}

impl NewAuditRecord {
    /// Attach the identifier assigned by the store.
    pub fn with_id(self, id: AuditRecordId) -> AuditRecord {
        AuditRecord {
            id,
            entity_type: self.entity_type,
            operation_type: self.operation_type,
            actor: self.actor,
            created_at: self.created_at,
            payload: self.payload,
            outcome: self.outcome,
        }
    }
}

/// A persisted audit record. Never mutated after it is appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Store-assigned identifier.
    pub id: AuditRecordId,
    /// Logical subject of the operation.
    pub entity_type: String,
    /// Kind of change performed.
    pub operation_type: OperationType,
    /// Identity responsible for the operation.
    pub actor: String,
    /// When the record was built.
    pub created_at: DateTime<Utc>,
    /// JSON object mapping parameter name to argument value.
    pub payload: String,
    /// How the intercepted operation finished.
    pub outcome: InvocationOutcome,
}

impl AuditRecord {
    /// Parse the payload back into a JSON value.
    pub fn payload_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::from_str(&self.payload)
    }
}

/// Assembles a record from static metadata and a serialized payload.
///
/// Building never fails: by the time a payload string exists, every input
/// has already been validated.
#[derive(Debug)]
pub struct AuditRecordBuilder<'a> {
    metadata: &'a AuditMetadata,
    payload: String,
    outcome: InvocationOutcome,
    created_at: Option<DateTime<Utc>>,
    default_actor: &'a str,
}

impl<'a> AuditRecordBuilder<'a> {
    /// Create a new builder.
    pub fn new(metadata: &'a AuditMetadata, payload: impl Into<String>) -> Self {
        Self {
            metadata,
            payload: payload.into(),
            outcome: InvocationOutcome::Success,
            created_at: None,
            default_actor: DEFAULT_ACTOR,
        }
    }

    /// Set the outcome of the intercepted operation.
    pub fn outcome(mut self, outcome: InvocationOutcome) -> Self {
        self.outcome = outcome;
        self
    }

    /// Set the timestamp (defaults to the current time when built).
    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Actor recorded when the metadata names none.
    pub fn default_actor(mut self, actor: &'a str) -> Self {
        self.default_actor = actor;
        self
    }

    /// Build the record. The actor is resolved here.
    pub fn build(self) -> NewAuditRecord {
        NewAuditRecord {
            entity_type: self.metadata.entity_type.clone(),
            operation_type: self.metadata.operation_type.clone(),
            actor: self.metadata.resolve_actor(self.default_actor),
            created_at: self.created_at.unwrap_or_else(Utc::now),
            payload: self.payload,
            outcome: self.outcome,
        }
    }
}
