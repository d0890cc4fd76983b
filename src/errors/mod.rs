//! Error handling module for FormForge.
//!
//! Provides centralized error types with mapping to HTTP status codes and response envelopes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Error codes as constants to avoid stringly-typed errors.
pub mod codes {
    pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
    pub const BACKEND_ERROR: &str = "BACKEND_ERROR";
    pub const TRANSPORT_ERROR: &str = "TRANSPORT_ERROR";
    pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const BAD_REQUEST: &str = "BAD_REQUEST";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
}

/// Application error type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Remote backend selected without complete credentials
    Config(String),
    /// Non-success response from the remote datastore
    Backend { status: u16, message: String },
    /// HTTP client failure before a response was received
    Transport(String),
    /// Local key-value storage failure
    Storage(String),
    /// Guard rejected the request
    Validation(String),
    /// Resource not found
    NotFound(String),
    /// Bad request
    BadRequest(String),
    /// Internal server error
    Internal(String),
}

impl AppError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Config(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Backend { .. } => StatusCode::BAD_GATEWAY,
            AppError::Transport(_) => StatusCode::BAD_GATEWAY,
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Config(_) => codes::CONFIG_ERROR,
            AppError::Backend { .. } => codes::BACKEND_ERROR,
            AppError::Transport(_) => codes::TRANSPORT_ERROR,
            AppError::Storage(_) => codes::STORAGE_ERROR,
            AppError::Validation(_) => codes::VALIDATION_ERROR,
            AppError::NotFound(_) => codes::NOT_FOUND,
            AppError::BadRequest(_) => codes::BAD_REQUEST,
            AppError::Internal(_) => codes::INTERNAL_ERROR,
        }
    }

    /// Get the human-readable message shown in the catalog panel.
    pub fn message(&self) -> String {
        match self {
            AppError::Backend { status, message } if message.is_empty() => {
                format!("Remote store responded with status {}", status)
            }
            AppError::Backend { message, .. } => message.clone(),
            AppError::Config(msg)
            | AppError::Transport(msg)
            | AppError::Storage(msg)
            | AppError::Validation(msg)
            | AppError::NotFound(msg)
            | AppError::BadRequest(msg)
            | AppError::Internal(msg) => msg.clone(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code(), self.message())
    }
}

impl std::error::Error for AppError {}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("Storage error: {:?}", err);
        AppError::Storage(format!("Storage error: {}", err))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        tracing::error!("Transport error: {:?}", err);
        AppError::Transport(format!("Remote store unreachable: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("JSON error: {:?}", err);
        AppError::BadRequest(format!("JSON error: {}", err))
    }
}

/// Error details in the response envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Error response envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetails,
    pub revision: u64,
}

impl ErrorResponse {
    pub fn new(error: &AppError, revision: u64) -> Self {
        let details = match error {
            AppError::Backend { status, .. } => Some(serde_json::json!({ "status": status })),
            _ => None,
        };

        Self {
            success: false,
            error: ErrorDetails {
                code: error.error_code().to_string(),
                message: error.message(),
                details,
            },
            revision,
        }
    }
}

/// Wrapper type for errors that carry the editor revision.
pub struct AppErrorWithRevision {
    pub error: AppError,
    pub revision: u64,
}

impl IntoResponse for AppErrorWithRevision {
    fn into_response(self) -> Response {
        let status = self.error.status_code();
        let body = ErrorResponse::new(&self.error, self.revision);
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_keeps_response_text() {
        let err = AppError::Backend {
            status: 409,
            message: "duplicate key value".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.to_string(), "BACKEND_ERROR: duplicate key value");
    }

    #[test]
    fn test_backend_error_without_body_names_status() {
        let err = AppError::Backend {
            status: 500,
            message: String::new(),
        };
        assert_eq!(err.message(), "Remote store responded with status 500");
    }

    #[test]
    fn test_error_envelope() {
        let body = ErrorResponse::new(&AppError::Config("missing url".into()), 7);
        assert!(!body.success);
        assert_eq!(body.error.code, codes::CONFIG_ERROR);
        assert_eq!(body.revision, 7);
        assert!(body.error.details.is_none());
    }
}
