// Postman-style export parser for restfuzz
// Object with a `requests` array; headers are {key, value} pairs and the body
// is a JSON document encoded as a string

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use super::read_collection;
use crate::error::FuzzError;
use crate::models::{CollectionParser, RequestDefinition};

pub struct PostmanParser;

#[derive(Debug, Deserialize)]
struct PostmanExport {
    #[serde(default)]
    requests: Vec<PostmanRequest>,
}

#[derive(Debug, Deserialize)]
struct PostmanRequest {
    #[serde(rename = "type")]
    method: String,
    url: String,
    #[serde(default)]
    header: Vec<PostmanHeader>,
    #[serde(default)]
    body: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PostmanHeader {
    key: String,
    #[serde(default)]
    value: String,
}

impl PostmanRequest {
    fn into_definition(self, index: usize) -> RequestDefinition {
        let body = self.body.as_deref().and_then(|raw| decode_body(index, raw));
        let mut request = RequestDefinition::new(self.method, self.url);
        for header in self.header {
            request.headers.insert(header.key, header.value);
        }
        request.body = body;
        request
    }
}

/// Empty strings mean no body. Bodies that are not valid JSON are dropped.
fn decode_body(index: usize, raw: &str) -> Option<Value> {
    if raw.trim().is_empty() {
        return None;
    }
    match serde_json::from_str(raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(request = index, "Ignoring body that is not valid JSON: {}", e);
            None
        }
    }
}

impl PostmanParser {
    pub fn parse_str(&self, file_path: &str, data: &str) -> Result<Vec<RequestDefinition>, FuzzError> {
        let export: PostmanExport =
            serde_json::from_str(data).map_err(|source| FuzzError::Collection {
                path: file_path.to_string(),
                source,
            })?;
        Ok(export
            .requests
            .into_iter()
            .enumerate()
            .map(|(index, request)| request.into_definition(index))
            .collect())
    }
}

impl CollectionParser for PostmanParser {
    fn parse(&self, file_path: &str) -> Result<Vec<RequestDefinition>, FuzzError> {
        let data = read_collection(file_path)?;
        self.parse_str(file_path, &data)
    }
}
