//! Gallery API
//!
//! | Path | Method | Body |
//! |------|--------|------|
//! | /api/galerias | GET | - |
//! | /api/galerias | POST | multipart `ano` + `imagem` |
//! | /api/galerias | DELETE | `{id}` |
//! | /api/galerias/remover | POST | `{id?, ano?, imagem?}` |
//! | /api/galerias/{id} | GET, DELETE | - |
//! | /api/galerias/{id}/fotos | POST | multipart `fotos` |
//! | /api/galerias/{id}/fotos | DELETE | `{foto}` |

mod handler;

use axum::{Router, routing::{get, post}};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/galerias", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route(
            "/",
            get(handler::list)
                .post(handler::create)
                .delete(handler::delete_by_body),
        )
        .route("/remover", post(handler::remove_fallback))
        .route("/{id}", get(handler::get_by_id).delete(handler::delete))
        .route(
            "/{id}/fotos",
            post(handler::add_photos).delete(handler::remove_photo),
        )
}
