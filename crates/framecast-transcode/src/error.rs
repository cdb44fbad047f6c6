use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("Source file not found: {0}")]
    SourceNotFound(String),

    #[error("Conversion failed (exit code {code:?}): {diagnostic}")]
    ConversionFailed {
        code: Option<i32>,
        diagnostic: String,
    },

    #[error("Invalid object name: {0}")]
    InvalidName(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}
