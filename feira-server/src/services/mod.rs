//! Service layer
//!
//! # Services
//!
//! - [`HomeService`] - home document reads, merges and sector removals
//! - [`GalleryService`] - gallery CRUD with photo cleanup
//! - [`MediaStore`] - uploads directory
//!
//! Repositories do blocking file IO, so services hand their work to
//! [`blocking`] instead of running it on the async workers.

pub mod gallery;
pub mod home;
pub mod media;

pub use gallery::GalleryService;
pub use home::HomeService;
pub use media::MediaStore;

use shared::error::{AppError, AppResult};

/// Run repository work on the blocking thread pool
pub(crate) async fn blocking<R, F>(f: F) -> AppResult<R>
where
    F: FnOnce() -> AppResult<R> + Send + 'static,
    R: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|e| {
        tracing::error!("spawn_blocking join error: {e}");
        AppError::internal("Falha interna ao acessar o armazenamento.")
    })?
}
