// API errors rendered as `{"message": ...}` JSON bodies
use crate::infrastructure::error::BackendError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not signed in")]
    Unauthorized,

    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(e) => match e.downcast_ref::<BackendError>().and_then(BackendError::status) {
                Some(status) if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN => status,
                _ => StatusCode::BAD_GATEWAY,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::Internal(e) => {
                tracing::error!("Request failed: {:#}", e);
                match e.downcast_ref::<BackendError>() {
                    Some(BackendError::Status { message, .. }) if !message.is_empty() => message.clone(),
                    _ => "Failed to load chart data".to_string(),
                }
            }
            other => other.to_string(),
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}
