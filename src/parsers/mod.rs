pub mod native;
pub mod postman;

pub use native::NativeParser;
pub use postman::PostmanParser;

use crate::error::FuzzError;

pub(crate) fn read_collection(file_path: &str) -> Result<String, FuzzError> {
    std::fs::read_to_string(file_path).map_err(|source| FuzzError::TargetFile {
        path: file_path.to_string(),
        source,
    })
}
