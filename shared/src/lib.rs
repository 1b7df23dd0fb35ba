//! Shared types for the Feira content backend
//!
//! Domain models, the unified error system and small utilities used by
//! feira-server and its tests.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};
