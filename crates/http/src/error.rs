//! Error handling for the bookshelf HTTP layer

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

/// Message returned for every 500; the cause only goes to the log.
pub const INTERNAL_ERROR_MESSAGE: &str = "internal error";

/// Standard error response format for all HTTP errors
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
    pub code: String,
    pub trace_id: String,
    pub timestamp: String,
}

/// Application error types that map to HTTP responses
#[derive(Error, Debug)]
pub enum AppError {
    /// Malformed identifier or body, detected before any upstream call.
    #[error("validation error: {message}")]
    Validation { message: String },

    #[error("{method} not allowed")]
    MethodNotAllowed {
        method: Method,
        allowed: &'static [Method],
    },

    /// The backend answered with a non-success status.
    #[error("upstream responded {status}: {message}")]
    Upstream { status: StatusCode, message: String },

    #[error("not found: {message}")]
    NotFound { message: String },

    /// Transport failures and unreadable upstream payloads.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn method_not_allowed(method: Method, allowed: &'static [Method]) -> Self {
        Self::MethodNotAllowed { method, allowed }
    }

    /// Mirror a backend error status with the given message
    pub fn upstream(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Upstream { status, .. } => *status,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            AppError::Validation { .. } => "validation_error",
            AppError::MethodNotAllowed { .. } => "method_not_allowed",
            AppError::Upstream { .. } => "upstream_error",
            AppError::NotFound { .. } => "not_found",
            AppError::Internal(_) => "internal_error",
        }
    }
}

/// Render an allowed-method set as an `Allow` header value.
pub fn allow_header(allowed: &[Method]) -> String {
    allowed
        .iter()
        .map(Method::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_id = Uuid::new_v4();
        let timestamp = OffsetDateTime::now_utc().to_string();
        let status = self.status();
        let code = self.code();

        let mut allow = None;
        let message = match self {
            AppError::Validation { message } | AppError::NotFound { message } => message,
            AppError::MethodNotAllowed { method, allowed } => {
                allow = Some(allow_header(allowed));
                format!("{method} not allowed")
            }
            AppError::Upstream { message, .. } => message,
            AppError::Internal(e) => {
                tracing::error!(
                    error_id = %error_id,
                    error = ?e,
                    "internal failure while handling request"
                );
                INTERNAL_ERROR_MESSAGE.to_string()
            }
        };

        tracing::warn!(
            error_id = %error_id,
            error_code = %code,
            status_code = %status.as_u16(),
            "request error"
        );

        let body = ErrorBody {
            message,
            code: code.to_string(),
            trace_id: error_id.to_string(),
            timestamp,
        };

        let mut response = (status, Json(body)).into_response();
        if let Some(allow) = allow.and_then(|value| HeaderValue::from_str(&value).ok()) {
            response.headers_mut().insert(header::ALLOW, allow);
        }
        response
    }
}
