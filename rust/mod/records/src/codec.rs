//! Scoped field codec.
//!
//! Converts between the structured domain representation of polymorphic
//! fields (inputs, constraints, tags, verdicts, ...) and the flat stored
//! string form. Pure, no I/O. Plain text columns (goal, title, output)
//! never pass through here.
//!
//! Every value is stored as canonical JSON text, scalars included, so
//! `decode(encode(x)) == x` holds for any well-formed `x`. Decoding a
//! required field that this system wrote must succeed; failure is a data
//! integrity error, not a client error. Optional fields degrade to null
//! (or an empty list) instead of failing the whole response.

use promptdeck_core::ServiceError;
use serde_json::Value;

/// Serialize a domain value to its stored textual form.
pub fn encode(value: &Value) -> String {
    value.to_string()
}

/// Serialize an optional domain value; `null` (and absence) store as
/// SQL NULL rather than the text `"null"`.
pub fn encode_optional(value: &Value) -> Option<String> {
    if value.is_null() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Serialize a string list (tags, bullets) to its stored form.
pub fn encode_string_list(items: &[String]) -> String {
    Value::from(items.to_vec()).to_string()
}

/// Decode a required field. The stored text was written by [`encode`],
/// so a parse failure means the row is corrupt.
pub fn decode_required(field: &str, stored: &str) -> Result<Value, ServiceError> {
    serde_json::from_str(stored).map_err(|e| {
        ServiceError::Integrity(format!("stored field {field} failed to decode: {e}"))
    })
}

/// Decode an optional field; absent or unparseable becomes `null`.
pub fn decode_optional(stored: Option<&str>) -> Value {
    stored
        .and_then(|s| serde_json::from_str(s).ok())
        .unwrap_or(Value::Null)
}

/// Decode a stored string list; absent or unparseable becomes empty.
pub fn decode_string_list(stored: Option<&str>) -> Vec<String> {
    stored
        .and_then(|s| serde_json::from_str::<Vec<String>>(s).ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn round_trip_structured_values() {
        let cases = vec![
            json!({"a": 1, "b": [1, 2, 3]}),
            json!(["x", {"nested": true}]),
            json!({}),
            json!([]),
            json!("plain text"),
            json!(42),
            json!(1.25),
            json!(true),
            json!(null),
        ];
        for value in cases {
            let stored = encode(&value);
            assert_eq!(decode_required("test", &stored).unwrap(), value);
        }
    }

    #[test]
    fn optional_null_stores_as_sql_null() {
        assert_eq!(encode_optional(&Value::Null), None);
        assert_eq!(
            encode_optional(&json!({"k": 1})).as_deref(),
            Some(r#"{"k":1}"#)
        );
    }

    #[test]
    fn required_decode_failure_is_integrity_error() {
        let err = decode_required("inputs", "{not json").unwrap_err();
        assert!(matches!(err, ServiceError::Integrity(_)));
    }

    #[test]
    fn optional_decode_degrades_to_null() {
        assert_eq!(decode_optional(None), Value::Null);
        assert_eq!(decode_optional(Some("{broken")), Value::Null);
        assert_eq!(decode_optional(Some(r#"{"ok":1}"#)), json!({"ok": 1}));
    }

    #[test]
    fn string_list_degrades_to_empty() {
        assert_eq!(decode_string_list(None), Vec::<String>::new());
        assert_eq!(decode_string_list(Some("not json")), Vec::<String>::new());
        assert_eq!(
            decode_string_list(Some(r#"["a","b"]"#)),
            vec!["a".to_string(), "b".to_string()]
        );
        let tags = vec!["email".to_string(), "draft".to_string()];
        assert_eq!(decode_string_list(Some(&encode_string_list(&tags))), tags);
    }
}
