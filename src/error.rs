//! Error type shared by the library

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriveError {
    #[error("file ID is required")]
    MissingFileId,
    #[error("not a valid Google Drive file reference: {0}")]
    InvalidFileReference(String),
    #[error("invalid query: {0}")]
    InvalidQuery(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("remote returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DriveError>;
