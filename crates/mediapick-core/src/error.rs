//! Error types for MediaPick.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Library error: {0}")]
    Library(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Model call timed out after {0}s")]
    Timeout(u64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(String),
}

pub type Result<T> = std::result::Result<T, Error>;
