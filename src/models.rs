// Core data models and traits for restfuzz

use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use crate::error::FuzzError;

/// A marker observed in a response after injecting a payload into a parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub parameter: String,
    pub marker: String,
    pub payload: String,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' with payload `{}` => {}", self.parameter, self.payload, self.marker)
    }
}

/// One request loaded from a collection, fuzzed in place.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDefinition {
    /// HTTP method as written in the collection (case-insensitive)
    pub method: String,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub body: Option<Value>,
    pub findings: Vec<Finding>,
}

impl RequestDefinition {
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            headers: BTreeMap::new(),
            body: None,
            findings: Vec::new(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// True when the body is a JSON object with at least one field.
    /// Arrays, scalars, `null` and `{}` have nothing to inject into.
    pub fn has_fuzzable_body(&self) -> bool {
        matches!(&self.body, Some(Value::Object(map)) if !map.is_empty())
    }
}

/// Trait for loading request collections (native dump, Postman export)
pub trait CollectionParser {
    /// Parse a collection file and return its requests in file order
    fn parse(&self, file_path: &str) -> Result<Vec<RequestDefinition>, FuzzError>;
}
