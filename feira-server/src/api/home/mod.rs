//! Home API
//!
//! | Path | Method | Body |
//! |------|--------|------|
//! | /api/home | GET | - |
//! | /api/home | POST | multipart, JSON or urlencoded fields |
//! | /api/home/remover-logo | POST | `{setor, logo}` |
//! | /api/home/remover-setor | POST | `{setor}` |

mod handler;

use axum::{Router, routing::{get, post}};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/home", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::get).post(handler::update))
        .route("/remover-logo", post(handler::remove_logo))
        .route("/remover-setor", post(handler::remove_sector))
}
