use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::ai::AiError;

/// Error surface for the JSON API. Every variant renders as
/// `{"error": <message>}` with the status below; store failures are
/// never downgraded to empty data.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("No image provided")]
    MissingImage,

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Ai(#[from] AiError),

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingImage | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Ai(_) | ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod error_tests {
    use super::*;

    #[test]
    fn missing_image_is_bad_request() {
        assert_eq!(ApiError::MissingImage.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::MissingImage.to_string(), "No image provided");
    }

    #[test]
    fn conflict_keeps_its_message() {
        let err = ApiError::Conflict("Habit \"read\" already exists!".into());
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.to_string(), "Habit \"read\" already exists!");
    }

    #[test]
    fn store_errors_are_internal() {
        let err = ApiError::Store(anyhow::anyhow!("connection refused"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
