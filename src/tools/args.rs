//! Validated tool arguments
//!
//! Arguments are checked once against the tool's parameter schema at the
//! host boundary. Handlers only ever see the validated map.

use serde_json::{Map, Value};
use thiserror::Error;

/// Argument validation failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgumentError {
    #[error("Arguments must be a JSON object")]
    NotAnObject,
    #[error("Missing required argument: {0}")]
    MissingRequired(String),
    #[error("Argument {name} must be of type {expected}")]
    WrongType { name: String, expected: String },
}

/// Immutable argument map handed to a tool
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolArgs(Map<String, Value>);

impl ToolArgs {
    /// Validate raw arguments against a JSON-Schema-like parameter contract.
    ///
    /// Accepts a bare object or the SWAIG envelope `{"parsed": [{...}]}`.
    /// Only `required` and the primitive `type` of each property are checked.
    pub fn validate(schema: &Value, raw: Value) -> Result<Self, ArgumentError> {
        let args = match unwrap_envelope(raw) {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            _ => return Err(ArgumentError::NotAnObject),
        };

        if let Some(required) = schema.get("required").and_then(Value::as_array) {
            for name in required.iter().filter_map(Value::as_str) {
                if args.get(name).map_or(true, Value::is_null) {
                    return Err(ArgumentError::MissingRequired(name.to_string()));
                }
            }
        }

        if let Some(properties) = schema.get("properties").and_then(Value::as_object) {
            for (name, value) in &args {
                let expected = properties
                    .get(name)
                    .and_then(|p| p.get("type"))
                    .and_then(Value::as_str);
                if let Some(expected) = expected {
                    if !matches_type(value, expected) {
                        return Err(ArgumentError::WrongType {
                            name: name.clone(),
                            expected: expected.to_string(),
                        });
                    }
                }
            }
        }

        Ok(Self(args))
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// String argument, empty when absent
    pub fn str(&self, key: &str) -> &str {
        self.0.get(key).and_then(Value::as_str).unwrap_or_default()
    }
}

impl From<Map<String, Value>> for ToolArgs {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

fn unwrap_envelope(raw: Value) -> Value {
    match raw {
        Value::Object(mut map) if map.len() == 1 && map.contains_key("parsed") => {
            match map.remove("parsed") {
                Some(Value::Array(mut parsed)) if !parsed.is_empty() => parsed.swap_remove(0),
                Some(other) => other,
                None => Value::Null,
            }
        }
        other => other,
    }
}

fn matches_type(value: &Value, expected: &str) -> bool {
    match expected {
        "string" => value.is_string(),
        "number" => value.is_number(),
        "integer" => value.is_i64() || value.is_u64(),
        "boolean" => value.is_boolean(),
        "object" => value.is_object(),
        "array" => value.is_array(),
        "null" => value.is_null(),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "date": {"type": "string"},
                "party_size": {"type": "integer"}
            },
            "required": ["date"]
        })
    }

    #[test]
    fn test_valid_arguments() {
        let args = ToolArgs::validate(&schema(), json!({"date": "2024-05-01", "party_size": 2}))
            .unwrap();
        assert_eq!(args.str("date"), "2024-05-01");
        assert_eq!(args.get("party_size"), Some(&json!(2)));
        assert_eq!(args.str("missing"), "");
    }

    #[test]
    fn test_parsed_envelope() {
        let args =
            ToolArgs::validate(&schema(), json!({"parsed": [{"date": "tomorrow"}]})).unwrap();
        assert_eq!(args.str("date"), "tomorrow");
    }

    #[test]
    fn test_missing_required() {
        let err = ToolArgs::validate(&schema(), json!({"party_size": 2})).unwrap_err();
        assert_eq!(err, ArgumentError::MissingRequired("date".to_string()));

        let err = ToolArgs::validate(&schema(), json!({"date": null})).unwrap_err();
        assert_eq!(err, ArgumentError::MissingRequired("date".to_string()));
    }

    #[test]
    fn test_wrong_type() {
        let err = ToolArgs::validate(&schema(), json!({"date": 20240501})).unwrap_err();
        assert!(matches!(err, ArgumentError::WrongType { ref name, .. } if name == "date"));

        let err =
            ToolArgs::validate(&schema(), json!({"date": "x", "party_size": 1.5})).unwrap_err();
        assert!(matches!(err, ArgumentError::WrongType { ref expected, .. } if expected == "integer"));
    }

    #[test]
    fn test_not_an_object() {
        assert_eq!(
            ToolArgs::validate(&schema(), json!("date")).unwrap_err(),
            ArgumentError::NotAnObject
        );
    }

    #[test]
    fn test_unknown_properties_pass_through() {
        let args = ToolArgs::validate(&schema(), json!({"date": "x", "note": 5})).unwrap();
        assert_eq!(args.get("note"), Some(&json!(5)));
    }
}
