//! Error types and API response structures

use super::codes::ErrorCode;
use http::StatusCode;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Application error with structured error code and details
///
/// This is the primary error type for the content backend, providing:
/// - Standardized error codes via [`ErrorCode`]
/// - Human-readable messages (shown verbatim in the admin UI)
/// - Optional structured details for debugging
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details (field names, ids, paths)
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add a detail entry to this error
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Get the HTTP status code for this error
    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    // ==================== Convenience constructors ====================

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    /// Create a required-field error naming the missing field
    pub fn required(field: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::RequiredField, msg).with_detail("field", field.into())
    }

    /// Create a not found error
    pub fn not_found(resource: impl Into<String>) -> Self {
        let r = resource.into();
        Self::with_message(ErrorCode::NotFound, format!("{} not found", r))
            .with_detail("resource", r)
    }

    /// Create a gallery not found error
    pub fn gallery_not_found(id: impl Into<Value>) -> Self {
        Self::with_message(ErrorCode::GalleryNotFound, "Galeria não encontrada.")
            .with_detail("id", id)
    }

    /// Create a sector not found error
    pub fn sector_not_found(setor: usize) -> Self {
        Self::with_message(ErrorCode::SectorNotFound, "Setor não encontrado.")
            .with_detail("setor", setor)
    }

    /// Create a protected sector rejection
    pub fn sector_protected(setor: usize) -> Self {
        Self::with_message(
            ErrorCode::SectorProtected,
            "Não é possível remover os 4 setores padrão da feira.",
        )
        .with_detail("setor", setor)
    }

    /// Create a gallery capacity error
    pub fn capacity_exceeded(limit: usize) -> Self {
        Self::with_message(
            ErrorCode::GalleryCapacityExceeded,
            format!("Limite de {} fotos por galeria.", limit),
        )
        .with_detail("limit", limit)
    }

    /// Create a file too large error
    pub fn file_too_large(limit_bytes: usize) -> Self {
        Self::new(ErrorCode::FileTooLarge).with_detail("limit_bytes", limit_bytes)
    }

    /// Create a too many files error
    pub fn too_many_files(limit: usize) -> Self {
        Self::new(ErrorCode::TooManyFiles).with_detail("limit", limit)
    }

    /// Create an invalid request error
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InvalidRequest, msg)
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::StorageError, msg)
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, msg)
    }
}

/// Unified API response structure
///
/// Every endpoint answers with the same envelope:
/// - `success`: whether the operation was applied
/// - `error`: human-readable message (on failure)
/// - `code`: numeric [`ErrorCode`] (on failure)
/// - payload fields flattened into the top level (on success)
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Create a success response with data
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            error: None,
            code: None,
            details: None,
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    /// Create a success response without data
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
            code: None,
            details: None,
            data: None,
        }
    }

    /// Create an error response from an AppError
    pub fn error(err: &AppError) -> Self {
        Self {
            success: false,
            error: Some(err.message.clone()),
            code: Some(err.code.code()),
            details: err.details.clone(),
            data: None,
        }
    }
}

impl<T> From<AppError> for ApiResponse<T> {
    fn from(err: AppError) -> Self {
        Self {
            success: false,
            error: Some(err.message),
            code: Some(err.code.code()),
            details: err.details,
            data: None,
        }
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

// ===== Axum Integration =====

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;

        let status = self.http_status();
        let body = ApiResponse::<()>::error(&self);

        // Log system errors
        if matches!(self.code.category(), super::category::ErrorCategory::System) {
            tracing::error!(
                code = %self.code,
                message = %self.message,
                "System error occurred"
            );
        }

        (status, Json(body)).into_response()
    }
}

impl<T: Serialize> axum::response::IntoResponse for ApiResponse<T> {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;

        let status = match self.code {
            None => StatusCode::OK,
            Some(code) => ErrorCode::try_from(code)
                .map(|c| c.http_status())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        };

        (status, Json(self)).into_response()
    }
}
