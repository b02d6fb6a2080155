use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Request to {path} failed: {source}")]
    Transport {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Backend returned {status} for {path}: {message}")]
    Status {
        path: String,
        status: StatusCode,
        message: String,
    },

    #[error("Unexpected response shape from {path}: {reason}")]
    Shape { path: String, reason: String },

    #[error("Failed to decode response from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl BackendError {
    /// HTTP status the backend answered with, if it answered at all
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            BackendError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
