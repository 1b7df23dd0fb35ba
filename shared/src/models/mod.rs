//! Data models
//!
//! Shared between feira-server and the admin UI (via API).
//! New gallery IDs are millisecond timestamps (see [`GalleryId`]).

pub mod gallery;
pub mod home;

// Re-exports
pub use gallery::*;
pub use home::*;
