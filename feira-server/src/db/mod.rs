//! Persistence
//!
//! Each document lives in one JSON file that is read and rewritten whole.
//! [`DocumentStore`] is the seam between repositories and the filesystem;
//! [`MemoryStore`] stands in for it in tests.

pub mod json_file;
pub mod memory;
pub mod repository;

pub use json_file::JsonFile;
pub use memory::MemoryStore;
pub use repository::{GalleryRepository, HomeRepository};

use shared::error::AppError;
use thiserror::Error;

/// Storage error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Serialization {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        let path = match &err {
            RepoError::Io { path, .. } | RepoError::Serialization { path, .. } => path.clone(),
        };
        AppError::storage(err.to_string()).with_detail("path", path)
    }
}

pub type RepoResult<T> = Result<T, RepoError>;

/// Whole-document load/save
pub trait DocumentStore<T>: Send + Sync {
    /// `None` when nothing has been stored yet
    fn load(&self) -> RepoResult<Option<T>>;

    fn save(&self, value: &T) -> RepoResult<()>;
}
