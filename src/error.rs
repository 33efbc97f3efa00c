// Error types for restfuzz
// Fatal errors abort the whole run, request errors only abandon a parameter

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FuzzError {
    /// The request collection file could not be read.
    #[error("Failed to read target file `{path}`")]
    TargetFile {
        path: String,
        source: std::io::Error,
    },

    /// The collection file is not valid JSON or does not have the expected shape.
    #[error("Failed to parse collection `{path}`: {source}")]
    Collection {
        path: String,
        source: serde_json::Error,
    },

    /// A payload or marker file could not be read.
    #[error("Failed to read catalog file `{path}`")]
    CatalogFile {
        path: String,
        source: std::io::Error,
    },

    #[error("Catalog `{name}` contains no entries")]
    EmptyCatalog { name: String },

    #[error("Unknown fuzzing type `{name}` (expected sql, xss or python)")]
    UnknownVulnType { name: String },

    #[error("Please set one type or custom payload path")]
    MissingFuzzType,

    /// The address walks through a value that is not an object.
    #[error("Cannot set `{address}`: `{segment}` is not an object")]
    PathConflict { address: String, segment: String },

    #[error("Invalid HTTP method `{method}`")]
    InvalidMethod { method: String },

    #[error("Invalid header `{name}`")]
    InvalidHeader { name: String },

    #[error(transparent)]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}
