//! Structured error types for HTTP responses.

use crate::types::EntityKind;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Validation errors (400)
    MissingRequiredField,
    InvalidFieldValue,
    InvalidBody,

    // Not found errors (404)
    ResourceNotFound,
    RouteNotFound,

    // Internal errors (500)
    InternalError,
}

impl ErrorCode {
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorCode::MissingRequiredField
            | ErrorCode::InvalidFieldValue
            | ErrorCode::InvalidBody => StatusCode::BAD_REQUEST,
            ErrorCode::ResourceNotFound | ErrorCode::RouteNotFound => StatusCode::NOT_FOUND,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Structured error returned by handlers and the store.
///
/// Serializes as `{ "error": <message> }`, plus `message` for body-parse and
/// internal errors where `error` is a generic headline.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
    pub field: Option<String>,
    pub details: Option<String>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            field: None,
            details: None,
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    // Convenience constructors

    pub fn missing_field(field: &str, message: impl Into<String>) -> Self {
        Self::new(ErrorCode::MissingRequiredField, message).with_field(field)
    }

    pub fn invalid_value(field: &str, message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidFieldValue, message).with_field(field)
    }

    pub fn not_found(kind: EntityKind) -> Self {
        Self::new(ErrorCode::ResourceNotFound, format!("{} not found", kind))
    }

    pub fn route_not_found() -> Self {
        Self::new(ErrorCode::RouteNotFound, "Route not found")
    }

    pub fn invalid_body(err: impl fmt::Display) -> Self {
        Self::new(ErrorCode::InvalidBody, "Invalid JSON body").with_details(err.to_string())
    }

    pub fn internal(err: impl fmt::Display) -> Self {
        Self::new(ErrorCode::InternalError, "Internal server error").with_details(err.to_string())
    }

    pub fn status(&self) -> StatusCode {
        self.code.status()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.details {
            Some(details) => write!(f, "{}: {}", self.message, details),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(code = ?self.code, error = %self, "Request failed");
        } else {
            tracing::debug!(code = ?self.code, field = ?self.field, error = %self, "Request rejected");
        }
        let body = ErrorBody {
            error: &self.message,
            message: self.details.as_deref(),
        };
        (status, Json(body)).into_response()
    }
}

// Allow using ? with anyhow errors by converting them
impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<ApiError>() {
            Ok(api_err) => api_err,
            Err(err) => ApiError::internal(err),
        }
    }
}

/// Result type for handler and store operations.
pub type ApiResult<T> = std::result::Result<T, ApiError>;
