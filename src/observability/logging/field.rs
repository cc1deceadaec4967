//! Structured key/value fields attached to loggers and entries.

use std::fmt;

use serde_json::Value;

/// One structured field.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    key: String,
    value: Value,
}

impl Field {
    /// Create a field from anything convertible into a JSON value.
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// Collect fields into a JSON object. Later keys overwrite earlier ones.
pub fn fields_to_object(fields: &[Field]) -> serde_json::Map<String, Value> {
    fields
        .iter()
        .map(|field| (field.key.clone(), field.value.clone()))
        .collect()
}
