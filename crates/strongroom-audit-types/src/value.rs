//! Argument values captured from an intercepted call.

use crate::finite::Finite;
use serde::Serialize;
use serde_json::Value;

/// A value that can be recorded in an audit payload.
///
/// Implemented for every [`Serialize`] type, so business code never
/// implements it by hand. Conversion is deferred until the payload is
/// serialized, which is where a value that cannot be represented fails.
/// Non-finite floats are such values: they are rejected rather than written
/// as `null`.
pub trait AuditValue {
    /// Convert the value into its JSON representation.
    fn to_json(&self) -> serde_json::Result<Value>;
}

impl<T: Serialize + ?Sized> AuditValue for T {
    fn to_json(&self) -> serde_json::Result<Value> {
        serde_json::to_value(Finite(self))
    }
}

/// Ordered argument values of one call, as the operation received them.
#[derive(Default)]
pub struct Arguments<'a> {
    values: Vec<&'a (dyn AuditValue + Sync)>,
}

impl<'a> Arguments<'a> {
    /// No arguments.
    pub fn empty() -> Self {
        Self { values: Vec::new() }
    }

    /// Append an argument.
    pub fn push(&mut self, value: &'a (dyn AuditValue + Sync)) {
        self.values.push(value);
    }

    /// Number of supplied arguments.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if no arguments were supplied.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over the arguments in call order.
    pub fn iter(&self) -> impl Iterator<Item = &'a (dyn AuditValue + Sync)> + '_ {
        self.values.iter().copied()
    }
}

impl<'a> From<Vec<&'a (dyn AuditValue + Sync)>> for Arguments<'a> {
    fn from(values: Vec<&'a (dyn AuditValue + Sync)>) -> Self {
        Self { values }
    }
}

impl std::fmt::Debug for Arguments<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Arguments")
            .field("len", &self.values.len())
            .finish()
    }
}

/// Parameter names of one call paired with the values passed for it.
///
/// Created fresh per invocation and dropped once the payload is serialized.
pub struct InvocationContext<'a> {
    operation: &'a str,
    parameters: Vec<(&'a str, &'a (dyn AuditValue + Sync))>,
}

impl<'a> InvocationContext<'a> {
    /// Create a context from already paired parameters.
    pub fn new(
        operation: &'a str,
        parameters: Vec<(&'a str, &'a (dyn AuditValue + Sync))>,
    ) -> Self {
        Self {
            operation,
            parameters,
        }
    }

    /// Name of the intercepted operation.
    pub fn operation(&self) -> &'a str {
        self.operation
    }

    /// Parameters in declaration order.
    pub fn parameters(&self) -> &[(&'a str, &'a (dyn AuditValue + Sync))] {
        &self.parameters
    }

    /// Parameter names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.parameters.iter().map(|(name, _)| *name)
    }

    /// Number of captured parameters.
    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    /// Check if the operation takes no parameters.
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }
}

impl std::fmt::Debug for InvocationContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InvocationContext")
            .field("operation", &self.operation)
            .field("parameters", &self.names().collect::<Vec<_>>())
            .finish()
    }
}
