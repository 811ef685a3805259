//! Typed access to build meta attributes
//!
//! Converters read attributes through [`AttributeReader`] so that a malformed
//! entry fails with an error naming the resource and the attribute.

use serde_json::{Map, Value};

use crate::error::{TransformError, TransformResult};

/// Sparse-encoding truthiness: `null`, `false`, `0`, `""`, `[]` and `{}` are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Coerce a number or a numeric string to an integer
pub fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Read-only view over one attribute object
#[derive(Debug, Clone, Copy)]
pub struct AttributeReader<'a> {
    resource: &'a str,
    resource_type: &'a str,
    map: &'a Map<String, Value>,
}

impl<'a> AttributeReader<'a> {
    pub fn new(resource: &'a str, resource_type: &'a str, map: &'a Map<String, Value>) -> Self {
        Self {
            resource,
            resource_type,
            map,
        }
    }

    /// Name of the resource being read
    pub fn resource(&self) -> &'a str {
        self.resource
    }

    /// Reader over a nested object, reporting errors against the same resource
    pub fn child(&self, map: &'a Map<String, Value>) -> AttributeReader<'a> {
        AttributeReader::new(self.resource, self.resource_type, map)
    }

    /// Raw value; `null` is treated as absent
    pub fn value(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key).filter(|v| !v.is_null())
    }

    /// First non-null value among `keys`
    pub fn value_any(&self, keys: &[&str]) -> Option<&'a Value> {
        keys.iter().find_map(|key| self.value(key))
    }

    /// Value only when it is truthy
    pub fn truthy(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key).filter(|v| is_truthy(v))
    }

    pub fn str(&self, key: &str) -> TransformResult<Option<&'a str>> {
        match self.value(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(self.invalid(key, format!("expected a string, got {}", other))),
        }
    }

    /// String under the first present key among `keys`
    pub fn str_any(&self, keys: &[&str]) -> TransformResult<Option<&'a str>> {
        for key in keys {
            if let Some(value) = self.str(key)? {
                return Ok(Some(value));
            }
        }
        Ok(None)
    }

    pub fn required_str(&self, key: &str) -> TransformResult<&'a str> {
        self.str(key)?.ok_or_else(|| self.missing(key))
    }

    pub fn int(&self, key: &str) -> TransformResult<Option<i64>> {
        match self.value(key) {
            None => Ok(None),
            Some(value) => coerce_int(value)
                .map(Some)
                .ok_or_else(|| self.invalid(key, format!("expected an integer, got {}", value))),
        }
    }

    /// Integer under the first present key among `keys`
    pub fn int_any(&self, keys: &[&str]) -> TransformResult<Option<i64>> {
        for key in keys {
            if let Some(value) = self.int(key)? {
                return Ok(Some(value));
            }
        }
        Ok(None)
    }

    pub fn required_int(&self, key: &str) -> TransformResult<i64> {
        self.int(key)?.ok_or_else(|| self.missing(key))
    }

    pub fn bool(&self, key: &str) -> TransformResult<Option<bool>> {
        match self.value(key) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(Value::String(s)) if s.eq_ignore_ascii_case("true") => Ok(Some(true)),
            Some(Value::String(s)) if s.eq_ignore_ascii_case("false") => Ok(Some(false)),
            Some(other) => Err(self.invalid(key, format!("expected a boolean, got {}", other))),
        }
    }

    pub fn flag(&self, key: &str) -> TransformResult<bool> {
        Ok(self.bool(key)?.unwrap_or(false))
    }

    pub fn list(&self, key: &str) -> TransformResult<Option<&'a Vec<Value>>> {
        match self.value(key) {
            None => Ok(None),
            Some(Value::Array(items)) => Ok(Some(items)),
            Some(other) => Err(self.invalid(key, format!("expected a list, got {}", other))),
        }
    }

    pub fn required_list(&self, key: &str) -> TransformResult<&'a Vec<Value>> {
        self.list(key)?.ok_or_else(|| self.missing(key))
    }

    /// List of strings; a single string is accepted as a one-element list
    pub fn str_list(&self, key: &str) -> TransformResult<Vec<String>> {
        match self.value(key) {
            None => Ok(Vec::new()),
            Some(Value::String(s)) => Ok(vec![s.clone()]),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s.clone()),
                    other => Err(self.invalid(key, format!("expected strings, got {}", other))),
                })
                .collect(),
            Some(other) => Err(self.invalid(key, format!("expected a list, got {}", other))),
        }
    }

    pub fn object(&self, key: &str) -> TransformResult<Option<&'a Map<String, Value>>> {
        match self.value(key) {
            None => Ok(None),
            Some(Value::Object(map)) => Ok(Some(map)),
            Some(other) => Err(self.invalid(key, format!("expected an object, got {}", other))),
        }
    }

    pub fn required_object(&self, key: &str) -> TransformResult<&'a Map<String, Value>> {
        self.object(key)?.ok_or_else(|| self.missing(key))
    }

    /// Readers over each object in a list attribute
    pub fn objects(&self, key: &str) -> TransformResult<Vec<AttributeReader<'a>>> {
        let Some(items) = self.list(key)? else {
            return Ok(Vec::new());
        };
        items
            .iter()
            .map(|item| match item {
                Value::Object(map) => Ok(self.child(map)),
                other => Err(self.invalid(key, format!("expected objects, got {}", other))),
            })
            .collect()
    }

    pub fn missing(&self, key: &str) -> TransformError {
        TransformError::missing(self.resource, self.resource_type, key)
    }

    pub fn invalid(&self, key: &str, message: impl Into<String>) -> TransformError {
        TransformError::invalid(self.resource, key, message)
    }
}
