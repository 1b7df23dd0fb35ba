//! Gallery API Handlers

use axum::{
    Json,
    extract::{Multipart, Path, State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::models::{GalleryId, GalleryRecord, MAX_PHOTOS_PER_GALLERY};

use crate::api::form::{UploadPolicy, json_payload, read_multipart};
use crate::content::GalleryLookup;
use crate::core::ServerState;
use crate::utils::{ApiResponse, AppError, AppResult};

#[derive(Serialize)]
pub struct GalleryBody {
    galeria: GalleryRecord,
}

#[derive(Serialize)]
pub struct PhotosBody {
    fotos: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct IdRequest {
    id: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PhotoRequest {
    foto: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FallbackRequest {
    id: Option<Value>,
    ano: Option<Value>,
    imagem: Option<String>,
}

/// Year labels arrive as strings or bare numbers
fn label(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// GET /api/galerias - all galleries
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<GalleryRecord>>> {
    Ok(Json(state.galleries.list().await?))
}

/// GET /api/galerias/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<GalleryRecord>> {
    Ok(Json(state.galleries.get(&GalleryId::parse(&id)).await?))
}

/// POST /api/galerias - create from `ano` and an `imagem` cover
pub async fn create(
    State(state): State<ServerState>,
    multipart: Multipart,
) -> AppResult<ApiResponse<GalleryBody>> {
    let policy = UploadPolicy {
        max_file_bytes: state.config.max_gallery_photo_bytes,
        max_files: 1,
        file_field: Some("imagem"),
        prefix: Some("galeria"),
    };
    let mut form = read_multipart(&state.media, multipart, policy).await?;
    let cover = form.take_file("imagem");
    let galeria = state.galleries.create(form.field("ano"), cover).await?;
    Ok(ApiResponse::success(GalleryBody { galeria }))
}

/// POST /api/galerias/{id}/fotos - append uploaded `fotos`
pub async fn add_photos(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> AppResult<ApiResponse<PhotosBody>> {
    let id = GalleryId::parse(&id);
    // reject before anything is written to disk
    state.galleries.get(&id).await?;

    let prefix = format!("gal_{id}");
    let policy = UploadPolicy {
        max_file_bytes: state.config.max_gallery_photo_bytes,
        max_files: MAX_PHOTOS_PER_GALLERY,
        file_field: Some("fotos"),
        prefix: Some(&prefix),
    };
    let form = read_multipart(&state.media, multipart, policy).await?;
    let fotos = state.galleries.add_photos(&id, form.files).await?;
    Ok(ApiResponse::success(PhotosBody { fotos }))
}

/// DELETE /api/galerias/{id}/fotos - remove `foto`
pub async fn remove_photo(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    payload: Result<Json<PhotoRequest>, JsonRejection>,
) -> AppResult<ApiResponse<PhotosBody>> {
    let id = GalleryId::parse(&id);
    let req = json_payload(payload)?;
    let fotos = state.galleries.remove_photo(&id, req.foto.as_deref()).await?;
    Ok(ApiResponse::success(PhotosBody { fotos }))
}

/// DELETE /api/galerias/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state.galleries.remove(&GalleryId::parse(&id)).await?;
    Ok(ApiResponse::ok())
}

/// DELETE /api/galerias - id in the JSON body
pub async fn delete_by_body(
    State(state): State<ServerState>,
    payload: Result<Json<IdRequest>, JsonRejection>,
) -> AppResult<ApiResponse<()>> {
    let req = json_payload(payload)?;
    let id = req
        .id
        .as_ref()
        .and_then(GalleryId::from_value)
        .ok_or_else(|| AppError::required("id", "id é obrigatório."))?;
    state.galleries.remove(&id).await?;
    Ok(ApiResponse::ok())
}

/// POST /api/galerias/remover - remove by id, imagem or ano
pub async fn remove_fallback(
    State(state): State<ServerState>,
    payload: Result<Json<FallbackRequest>, JsonRejection>,
) -> AppResult<ApiResponse<()>> {
    let req = json_payload(payload)?;
    let lookup = GalleryLookup {
        id: req.id.as_ref().and_then(GalleryId::from_value),
        ano: req.ano.as_ref().and_then(label),
        imagem: req.imagem,
    };
    state.galleries.remove_fallback(lookup).await?;
    Ok(ApiResponse::ok())
}
