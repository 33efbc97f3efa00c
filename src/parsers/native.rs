// Native request dump parser for restfuzz
// Top-level JSON array of {type, url, header, body} objects

use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

use super::read_collection;
use crate::error::FuzzError;
use crate::models::{CollectionParser, RequestDefinition};

pub struct NativeParser;

#[derive(Debug, Deserialize)]
struct NativeEntry {
    #[serde(rename = "type")]
    method: String,
    url: String,
    #[serde(default)]
    header: BTreeMap<String, String>,
    #[serde(default)]
    body: Option<Value>,
}

impl From<NativeEntry> for RequestDefinition {
    fn from(entry: NativeEntry) -> Self {
        let mut request = RequestDefinition::new(entry.method, entry.url);
        request.headers = entry.header;
        // `"body": null` deserializes to None as well
        request.body = entry.body;
        request
    }
}

impl NativeParser {
    pub fn parse_str(&self, file_path: &str, data: &str) -> Result<Vec<RequestDefinition>, FuzzError> {
        let entries: Vec<NativeEntry> =
            serde_json::from_str(data).map_err(|source| FuzzError::Collection {
                path: file_path.to_string(),
                source,
            })?;
        Ok(entries.into_iter().map(RequestDefinition::from).collect())
    }
}

impl CollectionParser for NativeParser {
    fn parse(&self, file_path: &str) -> Result<Vec<RequestDefinition>, FuzzError> {
        let data = read_collection(file_path)?;
        self.parse_str(file_path, &data)
    }
}
