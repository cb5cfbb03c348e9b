// src/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::store::StoreError;

pub const INVALID_JSON: &str = "Invalid JSON";
pub const SAVE_FAILED: &str = "Problems while saving to the database";

/// Global Application Error Enum.
/// Centralizes error handling and mapping to HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    // 400 Bad Request
    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    // 424 Failed Dependency, whatever the store error kind
    #[error(transparent)]
    Store(#[from] StoreError),

    // Startup only
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Implements `IntoResponse` for `AppError`.
/// Converts the error into a plain-text response with the matching status code.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::InvalidJson(_) => (StatusCode::BAD_REQUEST, INVALID_JSON),
            AppError::Store(_) => (StatusCode::FAILED_DEPENDENCY, SAVE_FAILED),
            AppError::Io(e) => {
                tracing::error!("I/O error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
        };

        (status, message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_store_error_maps_to_failed_dependency() {
        let errors = [
            StoreError::NotConnected,
            StoreError::ConnectionFailed("refused".to_string()),
            StoreError::InvalidArgument("count".to_string()),
            StoreError::NotFound,
            StoreError::WriteFailed("too long".to_string()),
            StoreError::ReadFailed("gone".to_string()),
        ];

        for err in errors {
            let response = AppError::from(err).into_response();
            assert_eq!(response.status(), StatusCode::FAILED_DEPENDENCY);
        }
    }

    #[test]
    fn decode_error_maps_to_bad_request() {
        let response = AppError::InvalidJson("expected a string".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
