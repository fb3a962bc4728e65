//! Invocation context extraction.

use crate::AuditedOperation;
use strongroom_audit_types::{Arguments, AuditError, InvocationContext};

/// Pair each declared parameter name of `operation` with the value passed
/// for it in this call.
///
/// Knows nothing about specific operations: any parameter list works, as long
/// as the call supplies exactly one value per declared name.
pub fn extract<'a>(
    operation: &'a AuditedOperation,
    args: &Arguments<'a>,
) -> Result<InvocationContext<'a>, AuditError> {
    let names = operation.parameters();
    if names.len() != args.len() {
        return Err(AuditError::ArityMismatch {
            operation: operation.name().to_string(),
            expected: names.len(),
            actual: args.len(),
        });
    }

    let parameters = names
        .iter()
        .map(String::as_str)
        .zip(args.iter())
        .collect();

    Ok(InvocationContext::new(operation.name(), parameters))
}
