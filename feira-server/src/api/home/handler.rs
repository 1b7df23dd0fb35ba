//! Home API Handlers

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::models::HomeDocument;

use crate::api::form::{HomeForm, json_payload};
use crate::core::ServerState;
use crate::utils::{ApiResponse, AppResult};

#[derive(Serialize)]
pub struct HomeBody {
    home: HomeDocument,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RemoveLogoRequest {
    setor: Option<Value>,
    logo: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RemoveSectorRequest {
    setor: Option<Value>,
}

/// GET /api/home - home document with display defaults
pub async fn get(State(state): State<ServerState>) -> AppResult<Json<HomeDocument>> {
    Ok(Json(state.home.get().await?))
}

/// POST /api/home - merge fields and uploads into the home document
pub async fn update(
    State(state): State<ServerState>,
    HomeForm(update): HomeForm,
) -> AppResult<ApiResponse<HomeBody>> {
    let home = state.home.update(update).await?;
    Ok(ApiResponse::success(HomeBody { home }))
}

/// POST /api/home/remover-logo
pub async fn remove_logo(
    State(state): State<ServerState>,
    payload: Result<Json<RemoveLogoRequest>, JsonRejection>,
) -> AppResult<ApiResponse<()>> {
    let req = json_payload(payload)?;
    let setor = req.setor.as_ref().and_then(parse_setor);
    state.home.remove_logo(setor, req.logo.as_deref()).await?;
    Ok(ApiResponse::ok())
}

/// POST /api/home/remover-setor
pub async fn remove_sector(
    State(state): State<ServerState>,
    payload: Result<Json<RemoveSectorRequest>, JsonRejection>,
) -> AppResult<ApiResponse<()>> {
    let req = json_payload(payload)?;
    let setor = req.setor.as_ref().and_then(parse_setor);
    state.home.remove_sector(setor).await?;
    Ok(ApiResponse::ok())
}

/// Sector number given as a JSON number or a numeric string
fn parse_setor(value: &Value) -> Option<usize> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| usize::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
