//! Canonical payload serialization.

use serde_json::{Map, Value};
use strongroom_audit_types::{AuditError, InvocationContext};

/// Serialize an invocation context into a JSON object string.
///
/// Keys are parameter names in declaration order; values use their standard
/// structural JSON form, with `None` as `null`. `NaN` and infinities have no
/// JSON form and fail instead of collapsing into `null`.
pub fn serialize(context: &InvocationContext<'_>) -> Result<String, AuditError> {
    let mut object = Map::with_capacity(context.len());

    for (name, value) in context.parameters() {
        let json = value.to_json().map_err(|e| AuditError::Serialization {
            parameter: (*name).to_string(),
            message: e.to_string(),
        })?;
        object.insert((*name).to_string(), json);
    }

    serde_json::to_string(&Value::Object(object)).map_err(|e| AuditError::Serialization {
        parameter: context.operation().to_string(),
        message: e.to_string(),
    })
}

/// Parse a payload back into its name/value mapping.
pub fn deserialize_payload(payload: &str) -> serde_json::Result<Map<String, Value>> {
    serde_json::from_str(payload)
}

/// Re-serialize a payload without changing key order or values.
pub fn canonicalize(payload: &str) -> serde_json::Result<String> {
    let object = deserialize_payload(payload)?;
    serde_json::to_string(&object)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{audit_args, extract, AuditedOperation};
    use proptest::prelude::*;
    use serde::{Serialize, Serializer};
    use std::collections::HashMap;
    use strongroom_audit_types::{AuditMetadata, OperationType};

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct BranchDto {
        id: Option<i64>,
        address: String,
        phone_number: i64,
        city: String,
    }

    /// Stands in for a value that holds a live resource.
    struct SocketHandle;

    impl Serialize for SocketHandle {
        fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("live socket cannot be serialized"))
        }
    }

    fn operation(params: &[&str]) -> AuditedOperation {
        AuditedOperation::new("branch.save", AuditMetadata::new("branch", OperationType::Save))
            .params(params.iter().copied())
    }

    #[test]
    fn test_scalar_parameters() {
        let op = operation(&["id", "name"]);
        let id: Option<i64> = None;
        let name = "Central";
        let args = audit_args![&id, &name];

        let payload = serialize(&extract(&op, &args).unwrap()).unwrap();
        assert_eq!(payload, r#"{"id":null,"name":"Central"}"#);
    }

    #[test]
    fn test_keys_follow_declaration_order() {
        let op = operation(&["zeta", "alpha", "mid"]);
        let (z, a, m) = (1, 2, 3);
        let args = audit_args![&z, &a, &m];

        let payload = serialize(&extract(&op, &args).unwrap()).unwrap();
        assert_eq!(payload, r#"{"zeta":1,"alpha":2,"mid":3}"#);
    }

    #[test]
    fn test_nested_structures() {
        let op = operation(&["dto", "tags"]);
        let dto = BranchDto {
            id: Some(5),
            address: "1 Bank St".into(),
            phone_number: 5550100,
            city: "Springfield".into(),
        };
        let tags = vec!["main", "24h"];
        let args = audit_args![&dto, &tags];

        let payload = serialize(&extract(&op, &args).unwrap()).unwrap();
        assert_eq!(
            payload,
            r#"{"dto":{"id":5,"address":"1 Bank St","phoneNumber":5550100,"city":"Springfield"},"tags":["main","24h"]}"#
        );
    }

    #[test]
    fn test_failing_value_names_the_parameter() {
        let op = operation(&["id", "socket"]);
        let id = 1;
        let socket = SocketHandle;
        let args = audit_args![&id, &socket];

        let err = serialize(&extract(&op, &args).unwrap()).unwrap_err();
        match err {
            AuditError::Serialization { parameter, message } => {
                assert_eq!(parameter, "socket");
                assert!(message.contains("live socket"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_non_string_map_keys_fail() {
        let op = operation(&["limits"]);
        let mut limits = HashMap::new();
        limits.insert(vec![1u8], 100);
        let args = audit_args![&limits];

        let err = serialize(&extract(&op, &args).unwrap()).unwrap_err();
        assert!(err.is_serialization());
    }

    #[test]
    fn test_non_finite_floats_fail() {
        let op = operation(&["rate", "limit"]);
        let limit = 500.0f64;
        let args = audit_args![&f64::NAN, &limit];

        match serialize(&extract(&op, &args).unwrap()).unwrap_err() {
            AuditError::Serialization { parameter, message } => {
                assert_eq!(parameter, "rate");
                assert!(message.contains("non-finite"));
            }
            other => panic!("unexpected error: {other:?}"),
        }

        for bad in [f64::INFINITY, f64::NEG_INFINITY] {
            let rate = Some(0.25f64);
            let args = audit_args![&rate, &bad];
            match serialize(&extract(&op, &args).unwrap()).unwrap_err() {
                AuditError::Serialization { parameter, .. } => assert_eq!(parameter, "limit"),
                other => panic!("unexpected error: {other:?}"),
            }
        }
    }

    #[test]
    fn test_finite_floats_round_trip() {
        let op = operation(&["rate", "limit"]);
        let (rate, limit) = (0.25f64, -1.5f32);
        let args = audit_args![&rate, &limit];

        let payload = serialize(&extract(&op, &args).unwrap()).unwrap();
        assert_eq!(payload, r#"{"rate":0.25,"limit":-1.5}"#);
        assert_eq!(canonicalize(&payload).unwrap(), payload);
    }

    #[test]
    fn test_empty_context_is_empty_object() {
        let op = operation(&[]);
        let args = audit_args![];
        assert_eq!(serialize(&extract(&op, &args).unwrap()).unwrap(), "{}");
    }

    proptest! {
        #[test]
        fn test_payload_keys_equal_declared_names(
            entries in proptest::collection::btree_map("[a-z][a-z0-9_]{0,10}", any::<i64>(), 0..8)
        ) {
            let names: Vec<&str> = entries.keys().map(String::as_str).collect();
            let values: Vec<i64> = entries.values().copied().collect();
            let op = operation(&names);
            let mut args = strongroom_audit_types::Arguments::empty();
            for value in &values {
                args.push(value);
            }

            let payload = serialize(&extract(&op, &args).unwrap()).unwrap();
            let parsed = deserialize_payload(&payload).unwrap();

            let keys: Vec<&str> = parsed.keys().map(String::as_str).collect();
            prop_assert_eq!(keys, names);
            for (name, value) in entries.iter() {
                prop_assert_eq!(&parsed[name], &serde_json::json!(value));
            }
        }

        #[test]
        fn test_round_trip_is_stable(
            name in "[a-z]{1,8}",
            text in "\\PC*",
            number in any::<i32>(),
            flag in any::<bool>(),
            list in proptest::collection::vec(any::<u16>(), 0..5),
        ) {
            let op = operation(&["name", "text", "number", "flag", "list"]);
            let args = audit_args![&name, &text, &number, &flag, &list];

            let payload = serialize(&extract(&op, &args).unwrap()).unwrap();
            prop_assert_eq!(canonicalize(&payload).unwrap(), payload);
        }
    }
}
