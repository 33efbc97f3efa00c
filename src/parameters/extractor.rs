// Parameter Path Discovery
//
// Flattens a JSON request body into the list of leaf fields that can carry a
// payload. Only objects are traversed: arrays, strings, numbers, booleans and
// null are leaves and are addressed as a whole.
//
// Example:
//   Input:  {"user": {"name": "a", "age": 5}, "token": "x"}
//   Output: [0 => user.name, 1 => user.age, 2 => token]
//
// Nested objects at a level are visited before the leaves of that level, so
// deeper fields always receive the lower ordinals.

use serde_json::{Map, Value};
use std::fmt;

/// Address of one leaf field inside a request body.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParameterPath {
    /// Discovery order within one body, starting at 0
    pub ordinal: usize,
    /// Object keys from the root down to the leaf
    pub segments: Vec<String>,
}

impl ParameterPath {
    pub fn new(ordinal: usize, segments: Vec<String>) -> Self {
        Self { ordinal, segments }
    }

    /// Parse a dot-qualified address. `\.` stands for a literal dot and `\\`
    /// for a literal backslash inside a key.
    pub fn parse(address: &str) -> Self {
        let mut segments = Vec::new();
        let mut current = String::new();
        let mut chars = address.chars();

        while let Some(ch) = chars.next() {
            match ch {
                '\\' => match chars.next() {
                    Some(escaped) => current.push(escaped),
                    None => current.push('\\'),
                },
                '.' => segments.push(std::mem::take(&mut current)),
                _ => current.push(ch),
            }
        }
        segments.push(current);

        Self::new(0, segments)
    }

    /// Dot-qualified address, e.g. `user.profile.age`
    pub fn address(&self) -> String {
        self.segments
            .iter()
            .map(|s| escape_segment(s))
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl fmt::Display for ParameterPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.address())
    }
}

fn escape_segment(segment: &str) -> String {
    if !segment.contains(['.', '\\']) {
        return segment.to_string();
    }
    let mut escaped = String::with_capacity(segment.len() + 2);
    for ch in segment.chars() {
        if ch == '.' || ch == '\\' {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Discover every leaf field of `body`.
///
/// Returns an empty list when the body is not an object or has no leaves.
/// The result is owned by the caller and built fresh on every call.
pub fn extract_paths(body: &Value) -> Vec<ParameterPath> {
    let mut paths = Vec::new();
    if let Value::Object(map) = body {
        let mut prefix = Vec::new();
        walk(map, &mut prefix, &mut paths);
    }
    paths
}

fn walk(map: &Map<String, Value>, prefix: &mut Vec<String>, paths: &mut Vec<ParameterPath>) {
    for (key, value) in map {
        if let Value::Object(child) = value {
            prefix.push(key.clone());
            walk(child, prefix, paths);
            prefix.pop();
        }
    }

    for (key, value) in map {
        if !value.is_object() {
            let mut segments = prefix.clone();
            segments.push(key.clone());
            paths.push(ParameterPath::new(paths.len(), segments));
        }
    }
}
