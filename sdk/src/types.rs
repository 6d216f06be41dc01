//! Request body types

use serde_json::{Map, Value};

use crate::errors::EngineError;

/// A decoded JSON request body with typed field accessors
///
/// Every accessor fails with `EngineError::Validation` when a required field is
/// absent, `null`, or of the wrong type.
#[derive(Debug, Clone, Default)]
pub struct RequestBody {
    pub fields: Map<String, Value>,
}

impl RequestBody {
    /// Create an empty body
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a JSON value; anything other than an object is rejected
    pub fn from_value(value: Value) -> Result<Self, EngineError> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(EngineError::Validation(format!(
                "Request body must be a JSON object, got {}",
                type_name(&other)
            ))),
        }
    }

    /// Add a field
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.fields.insert(key.into(), value);
        self
    }

    /// Get a required string field
    pub fn field_str(&self, key: &str) -> Result<String, EngineError> {
        self.field_str_opt(key)?
            .ok_or_else(|| EngineError::missing_field(key))
    }

    /// Get an optional string field
    pub fn field_str_opt(&self, key: &str) -> Result<Option<String>, EngineError> {
        match self.present(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(_) => Err(EngineError::invalid_field(key, "a string")),
        }
    }

    /// Get an optional i64 field
    pub fn field_i64_opt(&self, key: &str) -> Result<Option<i64>, EngineError> {
        match self.present(key) {
            None => Ok(None),
            Some(v) => v
                .as_i64()
                .map(Some)
                .ok_or_else(|| EngineError::invalid_field(key, "an integer")),
        }
    }

    /// Get a required bool field
    pub fn field_bool(&self, key: &str) -> Result<bool, EngineError> {
        match self.present(key) {
            None => Err(EngineError::missing_field(key)),
            Some(Value::Bool(b)) => Ok(*b),
            Some(_) => Err(EngineError::invalid_field(key, "a boolean")),
        }
    }

    /// Get a required field of any JSON type
    pub fn field_json(&self, key: &str) -> Result<&Value, EngineError> {
        self.present(key)
            .ok_or_else(|| EngineError::missing_field(key))
    }

    // `null` counts as absent
    fn present(&self, key: &str) -> Option<&Value> {
        self.fields.get(key).filter(|v| !v.is_null())
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
