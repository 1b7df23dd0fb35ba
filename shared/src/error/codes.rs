//! Unified error codes for the Feira content backend
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Home document errors
//! - 2xxx: Gallery errors
//! - 3xxx: Upload errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so the admin UI can
/// branch on them without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Invalid request
    InvalidRequest = 5,
    /// Required field missing
    RequiredField = 7,

    // ==================== 1xxx: Home ====================
    /// Exhibitor sector does not exist
    SectorNotFound = 1001,
    /// One of the protected sectors (1-4) was targeted for removal
    SectorProtected = 1002,

    // ==================== 2xxx: Gallery ====================
    /// Gallery not found
    GalleryNotFound = 2001,
    /// Gallery photo limit would be exceeded
    GalleryCapacityExceeded = 2002,

    // ==================== 3xxx: Upload ====================
    /// File too large
    FileTooLarge = 3001,
    /// Too many files in one request
    TooManyFiles = 3002,
    /// No file provided in request
    NoFileProvided = 3003,
    /// Multipart body could not be decoded
    InvalidMultipart = 3004,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// JSON file could not be read or written
    StorageError = 9002,
    /// Uploaded file could not be persisted
    FileStorageFailed = 9006,
}

impl ErrorCode {
    /// Get the numeric value of this error code
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the default message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::RequiredField => "Required field is missing",

            // Home
            ErrorCode::SectorNotFound => "Sector not found",
            ErrorCode::SectorProtected => "The 4 default sectors cannot be removed",

            // Gallery
            ErrorCode::GalleryNotFound => "Gallery not found",
            ErrorCode::GalleryCapacityExceeded => "Gallery photo limit reached",

            // Upload
            ErrorCode::FileTooLarge => "File too large",
            ErrorCode::TooManyFiles => "Too many files",
            ErrorCode::NoFileProvided => "No file provided",
            ErrorCode::InvalidMultipart => "Invalid multipart request",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::StorageError => "Storage error",
            ErrorCode::FileStorageFailed => "Failed to store uploaded file",
        }
    }
}

/// Error returned when converting an unknown u16 into an [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            5 => Ok(ErrorCode::InvalidRequest),
            7 => Ok(ErrorCode::RequiredField),

            1001 => Ok(ErrorCode::SectorNotFound),
            1002 => Ok(ErrorCode::SectorProtected),

            2001 => Ok(ErrorCode::GalleryNotFound),
            2002 => Ok(ErrorCode::GalleryCapacityExceeded),

            3001 => Ok(ErrorCode::FileTooLarge),
            3002 => Ok(ErrorCode::TooManyFiles),
            3003 => Ok(ErrorCode::NoFileProvided),
            3004 => Ok(ErrorCode::InvalidMultipart),

            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::StorageError),
            9006 => Ok(ErrorCode::FileStorageFailed),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
