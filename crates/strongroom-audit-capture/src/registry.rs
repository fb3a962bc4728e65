//! Registry of auditable operations.

use std::collections::{HashMap, HashSet};
use strongroom_audit_types::AuditMetadata;
use thiserror::Error;

/// Registration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("operation '{0}' is registered twice")]
    DuplicateOperation(String),

    #[error("operation '{operation}' declares parameter '{parameter}' twice")]
    DuplicateParameter { operation: String, parameter: String },

    #[error("operation name must not be empty")]
    EmptyName,
}

/// An operation marked as auditable.
#[derive(Debug, Clone)]
pub struct AuditedOperation {
    name: String,
    metadata: AuditMetadata,
    parameters: Vec<String>,
}

impl AuditedOperation {
    /// Declare an operation with no parameters yet.
    pub fn new(name: impl Into<String>, metadata: AuditMetadata) -> Self {
        Self {
            name: name.into(),
            metadata,
            parameters: Vec::new(),
        }
    }

    /// Declare the next parameter.
    pub fn param(mut self, name: impl Into<String>) -> Self {
        self.parameters.push(name.into());
        self
    }

    /// Declare parameters in order.
    pub fn params<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parameters.extend(names.into_iter().map(Into::into));
        self
    }

    /// Operation name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Static audit metadata.
    pub fn metadata(&self) -> &AuditMetadata {
        &self.metadata
    }

    /// Declared parameter names, in declaration order.
    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }
}

/// Immutable lookup of auditable operations by name.
///
/// Built once at startup. There is no way to add or remove operations
/// afterwards.
#[derive(Debug, Default)]
pub struct AuditRegistry {
    operations: HashMap<String, AuditedOperation>,
}

impl AuditRegistry {
    /// Start building a registry.
    pub fn builder() -> AuditRegistryBuilder {
        AuditRegistryBuilder::default()
    }

    /// Registered operation with this name, if any.
    pub fn lookup(&self, name: &str) -> Option<&AuditedOperation> {
        self.operations.get(name)
    }

    /// Check if an operation is auditable.
    pub fn contains(&self, name: &str) -> bool {
        self.operations.contains_key(name)
    }

    /// Number of registered operations.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Check if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Iterate over registered operations.
    pub fn iter(&self) -> impl Iterator<Item = &AuditedOperation> {
        self.operations.values()
    }
}

/// Builder for [`AuditRegistry`].
#[derive(Debug, Default)]
pub struct AuditRegistryBuilder {
    operations: Vec<AuditedOperation>,
}

impl AuditRegistryBuilder {
    /// Mark an operation as auditable.
    pub fn register(mut self, operation: AuditedOperation) -> Self {
        self.operations.push(operation);
        self
    }

    /// Validate and freeze the registry.
    pub fn build(self) -> Result<AuditRegistry, RegistryError> {
        let mut operations = HashMap::with_capacity(self.operations.len());

        for operation in self.operations {
            if operation.name.trim().is_empty() {
                return Err(RegistryError::EmptyName);
            }

            let mut seen = HashSet::new();
            for parameter in &operation.parameters {
                if !seen.insert(parameter.as_str()) {
                    return Err(RegistryError::DuplicateParameter {
                        operation: operation.name.clone(),
                        parameter: parameter.clone(),
                    });
                }
            }

            if operations.contains_key(&operation.name) {
                return Err(RegistryError::DuplicateOperation(operation.name));
            }
            operations.insert(operation.name.clone(), operation);
        }

        Ok(AuditRegistry { operations })
    }
}
