//! Application error type and its HTTP representation.
//!
//! Every handler returns `Result<_, AppError>`. The error is rendered as
//! `{"error": "...", "code": "...", "details": {...}}` with a matching status.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use validator::ValidationErrors;

use crate::domain::repositories::StoreError;

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
    #[serde(skip_serializing_if = "Value::is_null")]
    details: Value,
}

/// Errors surfaced by services and handlers.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Missing or invalid client input (400).
    #[error("{message}")]
    Validation { message: String, details: Value },

    /// Unknown or expired short code (404).
    #[error("{message}")]
    NotFound { message: String, details: Value },

    /// Backing store unreachable or failing (503).
    #[error("{message}")]
    StorageUnavailable { message: String, details: Value },

    /// Anything else (500).
    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn storage_unavailable(message: impl Into<String>, details: Value) -> Self {
        Self::StorageUnavailable {
            message: message.into(),
            details,
        }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// HTTP status this error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::StorageUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable error code included in the response body.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation { .. } => "validation_error",
            AppError::NotFound { .. } => "not_found",
            AppError::StorageUnavailable { .. } => "storage_unavailable",
            AppError::Internal { .. } => "internal_error",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();

        let (message, details) = match self {
            AppError::Validation { message, details }
            | AppError::NotFound { message, details }
            | AppError::StorageUnavailable { message, details }
            | AppError::Internal { message, details } => (message, details),
        };

        if status.is_server_error() {
            tracing::error!(code, details = %details, "{}", message);
        }

        let body = ErrorBody {
            error: message,
            code,
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Unavailable(reason) => {
                AppError::storage_unavailable("Storage unavailable", json!({ "reason": reason }))
            }
            StoreError::Corrupt { code, reason } => AppError::internal(
                "Stored record is corrupt",
                json!({ "short_code": code, "reason": reason }),
            ),
            StoreError::IncrementOutOfRange { by } => {
                AppError::internal("Click increment out of range", json!({ "by": by }))
            }
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        let message = fields
            .iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(msg) => msg.to_string(),
                    None => format!("{} is invalid", field),
                })
            })
            .next()
            .unwrap_or_else(|| "Invalid request".to_string());

        let invalid: Vec<String> = fields.iter().map(|(f, _)| f.to_string()).collect();

        AppError::bad_request(message, json!({ "fields": invalid }))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::bad_request(
            "Request body must be a JSON object",
            json!({ "reason": rejection.body_text() }),
        )
    }
}
