//! Gallery mutations
//!
//! Pure operations on the in-memory gallery list. Removals hand back the
//! removed record so the caller can delete its files after saving.

use shared::error::{AppError, AppResult};
use shared::models::{GalleryId, GalleryRecord, MAX_PHOTOS_PER_GALLERY, StoredGallery};
use std::collections::HashSet;

/// Backfill `id` and `fotos` on records written by older versions
///
/// Missing ids become `now + index`; ids present in any other form are kept.
/// Missing `fotos` become `[imagem]` (or `[]` without a cover). The flag
/// reports whether anything changed.
pub fn normalize(stored: Vec<StoredGallery>, now: i64) -> (Vec<GalleryRecord>, bool) {
    let mut taken: HashSet<i64> = stored
        .iter()
        .filter_map(|g| g.id.as_ref().and_then(GalleryId::as_num))
        .collect();
    let mut changed = false;

    let records = stored
        .into_iter()
        .enumerate()
        .map(|(idx, g)| {
            let id = match g.id {
                Some(id) => id,
                None => {
                    changed = true;
                    let mut id = now + idx as i64;
                    while taken.contains(&id) {
                        id += 1;
                    }
                    taken.insert(id);
                    GalleryId::Num(id)
                }
            };
            let imagem = g.imagem.unwrap_or_default();
            let fotos = match g.fotos {
                Some(fotos) => fotos,
                None => {
                    changed = true;
                    if imagem.is_empty() {
                        Vec::new()
                    } else {
                        vec![imagem.clone()]
                    }
                }
            };
            GalleryRecord {
                id,
                ano: g.ano.unwrap_or_default(),
                imagem,
                fotos,
                extra: g.extra,
            }
        })
        .collect();

    (records, changed)
}

/// Id for a new gallery: `now`, bumped past any existing id
pub fn next_id(list: &[GalleryRecord], now: i64) -> i64 {
    let mut id = now;
    while list.iter().any(|g| g.id.as_num() == Some(id)) {
        id += 1;
    }
    id
}

pub fn find<'a>(list: &'a [GalleryRecord], id: &GalleryId) -> AppResult<&'a GalleryRecord> {
    list.iter()
        .find(|g| g.id == *id)
        .ok_or_else(|| AppError::gallery_not_found(id.clone()))
}

fn position(list: &[GalleryRecord], id: &GalleryId) -> AppResult<usize> {
    list.iter()
        .position(|g| g.id == *id)
        .ok_or_else(|| AppError::gallery_not_found(id.clone()))
}

/// Append a new gallery whose cover is also its first photo
pub fn add_gallery(list: &mut Vec<GalleryRecord>, now: i64, ano: &str, cover: &str) -> GalleryRecord {
    let record = GalleryRecord::new(next_id(list, now), ano, cover);
    list.push(record.clone());
    record
}

/// Append photos, refusing to go past [`MAX_PHOTOS_PER_GALLERY`]
pub fn add_photos(list: &mut [GalleryRecord], id: &GalleryId, paths: Vec<String>) -> AppResult<Vec<String>> {
    let idx = position(list, id)?;
    let gallery = &mut list[idx];
    if gallery.fotos.len() + paths.len() > MAX_PHOTOS_PER_GALLERY {
        return Err(AppError::capacity_exceeded(MAX_PHOTOS_PER_GALLERY)
            .with_detail("current", gallery.fotos.len())
            .with_detail("requested", paths.len()));
    }
    gallery.fotos.extend(paths);
    Ok(gallery.fotos.clone())
}

/// Drop `foto` from the gallery's photos
///
/// Returns the remaining photos and whether `foto` was present.
pub fn remove_photo(list: &mut [GalleryRecord], id: &GalleryId, foto: &str) -> AppResult<(Vec<String>, bool)> {
    let idx = position(list, id)?;
    let gallery = &mut list[idx];
    let before = gallery.fotos.len();
    gallery.fotos.retain(|f| f != foto);
    let removed = gallery.fotos.len() != before;
    Ok((gallery.fotos.clone(), removed))
}

pub fn remove_gallery(list: &mut Vec<GalleryRecord>, id: &GalleryId) -> AppResult<GalleryRecord> {
    let idx = position(list, id)?;
    Ok(list.remove(idx))
}

/// Criteria for removing a gallery without a reliable id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GalleryLookup {
    pub id: Option<GalleryId>,
    pub ano: Option<String>,
    pub imagem: Option<String>,
}

/// Remove by id, else by image (cover or photo), else by year label
pub fn remove_gallery_fallback(
    list: &mut Vec<GalleryRecord>,
    lookup: &GalleryLookup,
) -> AppResult<GalleryRecord> {
    let by_id = lookup
        .id
        .as_ref()
        .and_then(|id| list.iter().position(|g| g.id == *id));
    let by_image = || {
        lookup
            .imagem
            .as_deref()
            .filter(|s| !s.is_empty())
            .and_then(|img| list.iter().position(|g| g.references(img)))
    };
    let by_year = || {
        lookup
            .ano
            .as_deref()
            .filter(|s| !s.is_empty())
            .and_then(|ano| list.iter().position(|g| g.ano == ano))
    };

    match by_id.or_else(by_image).or_else(by_year) {
        Some(idx) => Ok(list.remove(idx)),
        None => Err(AppError::with_message(
            shared::error::ErrorCode::GalleryNotFound,
            "Galeria não encontrada (fallback).",
        )),
    }
}
