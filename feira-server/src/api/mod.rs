//! HTTP API
//!
//! # Routes
//!
//! - [`home`] - home document, sector logo and sector removal
//! - [`galleries`] - photo galleries
//! - [`health`] - liveness
//! - `/uploads/*` - uploaded media, served from the uploads directory

pub mod form;
pub mod galleries;
pub mod health;
pub mod home;
pub mod middleware;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware as axum_middleware;
use axum::response::{IntoResponse, Response};
use http::{HeaderName, HeaderValue, StatusCode, Uri};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::core::ServerState;
use crate::utils::{AppError, ErrorCode};

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Build a router with all API routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(home::router())
        .merge(galleries::router())
        .merge(health::router())
        .fallback(fallback)
}

/// Build the fully configured application
///
/// Used by the HTTP server and by tests driving the router directly.
pub fn build_app(state: &ServerState) -> Router {
    build_router()
        .nest_service("/uploads", ServeDir::new(state.config.uploads_dir()))
        .layer(DefaultBodyLimit::max(state.config.max_request_bytes))
        // ========== Tower HTTP Middleware ==========
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static("x-request-id"),
            XRequestId,
        ))
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            "x-request-id",
        )))
        .with_state(state.clone())
}

/// JSON failure for unknown API routes, plain text elsewhere
async fn fallback(uri: Uri) -> Response {
    let path = uri.path();
    if path == "/api" || path.starts_with("/api/") {
        AppError::with_message(ErrorCode::NotFound, "Rota não encontrada")
            .with_detail("path", path.to_string())
            .into_response()
    } else {
        (StatusCode::NOT_FOUND, "Página não encontrada").into_response()
    }
}
