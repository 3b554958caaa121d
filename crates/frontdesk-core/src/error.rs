//! Error types for Frontdesk

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Authorization gateway error: {0}")]
    Gateway(String),

    #[error("Handshake canceled")]
    Canceled,
}

pub type Result<T> = std::result::Result<T, Error>;
