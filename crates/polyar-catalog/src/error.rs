use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Invalid asset identifier '{0}': {1}")]
    InvalidIdentifier(String, &'static str),

    #[error("Invalid catalog endpoint '{0}'")]
    InvalidEndpoint(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Server error ({status}) for {url}")]
    ServerError { status: u16, url: String },

    #[error("Server is offline or unreachable")]
    Offline,

    #[error("Request timed out")]
    Timeout,

    #[error("No usable file name in '{0}'")]
    InvalidFileName(String),

    #[error("Malformed catalog response: {0}")]
    MalformedResponse(String),

    #[error("I/O error writing '{0}': {1}")]
    Io(PathBuf, #[source] std::io::Error),
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CatalogError::Timeout
        } else if err.is_connect() {
            CatalogError::Offline
        } else {
            CatalogError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::MalformedResponse(err.to_string())
    }
}
