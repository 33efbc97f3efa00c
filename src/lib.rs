pub mod models;
pub mod error;
pub mod config;
pub mod parsers;
pub mod payloads;
pub mod parameters;
pub mod detection;
pub mod engine;
pub mod reporting;

// Re-export commonly used items
pub use models::*;
pub use error::*;
pub use config::*;
pub use parsers::*;
pub use payloads::*;
pub use parameters::*;
pub use detection::*;
pub use engine::*;
pub use reporting::*;
