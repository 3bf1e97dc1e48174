//! Error types and handling for the chat relay server.
//!
//! This module provides a unified error type [`AppError`] for the
//! non-streaming request path. Streaming faults never surface here: the
//! stream translator encodes them as SSE error frames so the client always
//! sees a well-formed, terminated stream.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Main error type for the application.
#[derive(Error, Debug)]
pub enum AppError {
    /// Upstream responded with a non-2xx status; carries status and body text
    #[error("OpenRouter API error ({status}): {body}")]
    UpstreamStatus { status: u16, body: String },

    /// HTTP request errors from the reqwest client
    #[error("Network error: {0}")]
    Request(#[from] reqwest::Error),

    /// Upstream body decoded but lacked the expected reply fields, or
    /// carried an embedded error object
    #[error("{0}")]
    InvalidResponse(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),

    /// Generic internal server errors with custom message
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::UpstreamStatus { status, body } => (
                StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                format!("OpenRouter API error: {}", body),
            ),
            AppError::Request(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Network error: {}", e),
            ),
            AppError::InvalidResponse(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::Config(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("An unexpected error occurred: {}", msg),
            ),
        };

        let body = Json(json!({
            "error": {
                "message": error_message,
                "type": "error",
                "code": status.as_u16()
            }
        }));

        (status, body).into_response()
    }
}

/// Convenience type alias for Results using [`AppError`].
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AppError::UpstreamStatus {
            status: 429,
            body: "rate limited".to_string(),
        };
        assert_eq!(err.to_string(), "OpenRouter API error (429): rate limited");

        let err = AppError::InvalidResponse("Invalid response format from OpenRouter".to_string());
        assert_eq!(err.to_string(), "Invalid response format from OpenRouter");

        let err = AppError::Internal("test error".to_string());
        assert_eq!(err.to_string(), "Internal server error: test error");
    }

    #[test]
    fn test_upstream_status_passthrough() {
        let err = AppError::UpstreamStatus {
            status: 429,
            body: "rate limited".to_string(),
        };
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn test_upstream_status_invalid_code_maps_to_bad_gateway() {
        let err = AppError::UpstreamStatus {
            status: 42,
            body: "weird".to_string(),
        };
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_invalid_response_is_internal_error() {
        let err = AppError::InvalidResponse("boom".to_string());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_internal_error_response() {
        let err = AppError::Internal("custom error".to_string());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_error_from_anyhow() {
        let anyhow_err = anyhow::anyhow!("test error");
        let app_err: AppError = anyhow_err.into();
        assert!(matches!(app_err, AppError::Config(_)));
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_result() -> Result<String> {
            Ok("success".to_string())
        }

        assert_eq!(returns_result().unwrap(), "success");
    }
}
