//! Unified error system for the Feira content backend
//!
//! This module provides:
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Rich error type with codes, messages, and details
//! - [`ApiResponse`]: Unified `{success, error?, ...data}` response format
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Home document errors
//! - 2xxx: Gallery errors
//! - 3xxx: Upload errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, ApiResponse};
//!
//! // Create a simple error
//! let err = AppError::new(ErrorCode::GalleryNotFound);
//!
//! // Create an error with details
//! let err = AppError::validation("Ano e imagem são obrigatórios.")
//!     .with_detail("field", "ano");
//!
//! // Convert to API response
//! let response = ApiResponse::<()>::error(&err);
//! assert!(!response.success);
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};
