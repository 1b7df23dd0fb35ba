//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // 404 Not Found
            Self::NotFound | Self::SectorNotFound | Self::GalleryNotFound => StatusCode::NOT_FOUND,

            // 413 Payload Too Large
            Self::FileTooLarge | Self::TooManyFiles => StatusCode::PAYLOAD_TOO_LARGE,

            // 422 Unprocessable Entity (business rule rejections)
            Self::SectorProtected => StatusCode::UNPROCESSABLE_ENTITY,

            // 500 Internal Server Error
            Self::InternalError | Self::StorageError | Self::FileStorageFailed => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request (default for validation errors)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}
