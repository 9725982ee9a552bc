//! Application error type mapping to HTTP status codes.
//!
//! Error bodies have the shape `{"error": {"code": "...", "message": "..."}}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use intake_types::error::StoreError;

#[derive(Debug)]
pub enum AppError {
    Store(StoreError),
    Validation(String),
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Store(e)
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Store(StoreError::NotFound) => {
                (StatusCode::NOT_FOUND, "FORM_NOT_FOUND", "Form not found".to_string())
            }
            AppError::Store(StoreError::Transport(msg)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "STORE_UNAVAILABLE", msg.clone())
            }
            AppError::Store(StoreError::Corrupt(msg)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "CORRUPT_FORM", msg.clone())
            }
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        if status.is_server_error() {
            tracing::error!(code, %message, "request failed");
        }

        let body = json!({
            "error": {
                "code": code,
                "message": message,
            }
        });

        (status, Json(body)).into_response()
    }
}
