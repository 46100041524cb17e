//! Error types for Braindump.
//!
//! Only request-shape failures are errors; cleaner failures and malformed
//! date expressions are recovered inside the pipeline and never surface.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid options: {0}")]
    InvalidOptions(String),
}

pub type Result<T> = std::result::Result<T, Error>;
