//! Braindump Core — data model, processing options, configuration.

pub mod config;
pub mod error;
pub mod options;
pub mod types;

pub use config::ServerConfig;
pub use error::{Error, Result};
pub use options::{ProcessOptions, DEFAULT_TIMEZONE, MAX_ITEMS_CEILING};
pub use types::{DateCandidate, InferredType, ProcessResult, StructuredItem, Suggestion};
