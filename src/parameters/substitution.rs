// Payload Substitution
//
// RUNTIME mutation of JSON request bodies during fuzzing. Produces the wire
// body for one (parameter, payload) pair: the serialized base body with only
// the value at the given address replaced.
//
// Example:
//   Input:  {"user": {"name": "a", "age": 5}, "name": "b"}
//   Path:   user.name   Payload: ' OR 1=1
//   Output: {"user":{"name":"' OR 1=1","age":5},"name":"b"}
//
// The payload is always written as a JSON string, whatever the original type
// at that address was. Object key order is preserved so every byte outside
// the target value matches the unmodified serialization.

use serde_json::{Map, Value};

use super::extractor::ParameterPath;
use crate::error::FuzzError;

/// Serialize `body` with the value at `path` replaced by `payload`.
///
/// Missing intermediate objects are created. Walking through an existing
/// value that is not an object fails with [`FuzzError::PathConflict`].
pub fn mutate(body: &Value, path: &ParameterPath, payload: &str) -> Result<String, FuzzError> {
    let mut patched = body.clone();
    set_path(&mut patched, path, Value::String(payload.to_string()))?;
    Ok(serde_json::to_string(&patched)?)
}

/// Same as [`mutate`] for a dot-qualified address.
pub fn mutate_address(body: &Value, address: &str, payload: &str) -> Result<String, FuzzError> {
    mutate(body, &ParameterPath::parse(address), payload)
}

/// Set the value at `path` in place.
pub fn set_path(body: &mut Value, path: &ParameterPath, value: Value) -> Result<(), FuzzError> {
    let conflict = |segment: &str| FuzzError::PathConflict {
        address: path.address(),
        segment: segment.to_string(),
    };

    let (leaf, parents) = path.segments.split_last().ok_or_else(|| conflict(""))?;

    let mut current = body.as_object_mut().ok_or_else(|| conflict(""))?;
    for segment in parents {
        current = current
            .entry(segment.clone())
            .or_insert_with(|| Value::Object(Map::new()))
            .as_object_mut()
            .ok_or_else(|| conflict(segment))?;
    }
    current.insert(leaf.clone(), value);
    Ok(())
}

/// Read the value at `path`, if present.
pub fn value_at<'a>(body: &'a Value, path: &ParameterPath) -> Option<&'a Value> {
    path.segments
        .iter()
        .try_fold(body, |current, segment| current.as_object()?.get(segment))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::extractor::extract_paths;
    use serde_json::json;

    #[test]
    fn replaces_only_target_field() {
        let body = json!({"user": {"name": "a", "age": 5}});
        let out = mutate_address(&body, "user.name", "' OR 1=1").unwrap();
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["user"]["name"], json!("' OR 1=1"));
        assert_eq!(parsed["user"]["age"], json!(5));
    }

    #[test]
    fn same_leaf_name_elsewhere_is_untouched() {
        let body = json!({"name": "top", "user": {"name": "nested"}});
        let out = mutate_address(&body, "user.name", "X").unwrap();
        assert_eq!(out, r#"{"name":"top","user":{"name":"X"}}"#);
    }

    #[test]
    fn output_is_byte_identical_outside_target() {
        let body = json!({"a": 1, "b": {"c": true, "d": [1, 2]}, "e": null});
        let original = serde_json::to_string(&body).unwrap();
        let out = mutate_address(&body, "b.c", "P").unwrap();
        assert_eq!(out, original.replace("\"c\":true", "\"c\":\"P\""));
    }

    #[test]
    fn payload_is_always_a_string() {
        let body = json!({"count": 3, "flag": false});
        let out = mutate_address(&body, "count", "7").unwrap();
        assert_eq!(out, r#"{"count":"7","flag":false}"#);
    }

    #[test]
    fn payload_is_json_escaped() {
        let body = json!({"q": "x"});
        let out = mutate_address(&body, "q", "\"><script>").unwrap();
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["q"], json!("\"><script>"));
    }

    #[test]
    fn every_extracted_path_reads_back_payload() {
        let body = json!({"a": {"b": 1, "c": {"d": "x"}}, "e": [1], "f.g": 2});
        let paths = extract_paths(&body);
        for path in &paths {
            let out: Value = serde_json::from_str(&mutate(&body, path, "PAYLOAD").unwrap()).unwrap();
            assert_eq!(value_at(&out, path), Some(&json!("PAYLOAD")));
            for other in paths.iter().filter(|p| *p != path) {
                assert_eq!(value_at(&out, other), value_at(&body, other));
            }
        }
    }

    #[test]
    fn missing_intermediate_objects_are_created() {
        let body = json!({"a": 1});
        let out = mutate_address(&body, "x.y", "v").unwrap();
        assert_eq!(out, r#"{"a":1,"x":{"y":"v"}}"#);
    }

    #[test]
    fn walking_through_scalar_is_a_conflict() {
        let body = json!({"a": 1});
        let err = mutate_address(&body, "a.b", "v").unwrap_err();
        assert!(matches!(err, FuzzError::PathConflict { ref segment, .. } if segment == "a"));
    }

    #[test]
    fn non_object_root_is_a_conflict() {
        assert!(mutate_address(&json!([1]), "a", "v").is_err());
    }

    #[test]
    fn base_body_is_not_modified() {
        let body = json!({"a": "keep"});
        let _ = mutate_address(&body, "a", "changed").unwrap();
        assert_eq!(body, json!({"a": "keep"}));
    }
}
