//! Gallery Service
//!
//! Gallery files follow the records: a rejected upload deletes what it
//! stored, and removing a gallery deletes its cover and every photo.

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{GalleryId, GalleryRecord};
use shared::util::now_millis;
use std::sync::Arc;

use super::{MediaStore, blocking};
use crate::content::galleries::{self, GalleryLookup};
use crate::content::UploadedFile;
use crate::db::GalleryRepository;

#[derive(Clone)]
pub struct GalleryService {
    repo: Arc<GalleryRepository>,
    media: MediaStore,
}

impl GalleryService {
    pub fn new(repo: Arc<GalleryRepository>, media: MediaStore) -> Self {
        Self { repo, media }
    }

    pub async fn list(&self) -> AppResult<Vec<GalleryRecord>> {
        let repo = self.repo.clone();
        blocking(move || Ok(repo.list()?)).await
    }

    pub async fn get(&self, id: &GalleryId) -> AppResult<GalleryRecord> {
        let list = self.list().await?;
        galleries::find(&list, id).cloned()
    }

    /// Create a gallery from a year label and an uploaded cover
    pub async fn create(&self, ano: Option<&str>, cover: Option<UploadedFile>) -> AppResult<GalleryRecord> {
        let ano = ano.map(str::trim).filter(|a| !a.is_empty());
        let (ano, cover) = match (ano, cover) {
            (Some(ano), Some(cover)) => (ano.to_string(), cover),
            (_, cover) => {
                self.discard(cover.into_iter().collect()).await;
                return Err(AppError::with_message(
                    ErrorCode::RequiredField,
                    "Ano e imagem são obrigatórios.",
                ));
            }
        };

        let repo = self.repo.clone();
        let cover_path = cover.stored_path.clone();
        let result = blocking(move || {
            repo.update(|list| {
                Ok::<_, AppError>(galleries::add_gallery(list, now_millis(), &ano, &cover_path))
            })
        })
        .await;
        match result {
            Ok(record) => {
                tracing::info!(gallery_id = %record.id, ano = %record.ano, "Gallery created");
                Ok(record)
            }
            Err(err) => {
                self.discard(vec![cover]).await;
                Err(err)
            }
        }
    }

    /// Append uploaded photos; returns the gallery's photo list
    pub async fn add_photos(&self, id: &GalleryId, files: Vec<UploadedFile>) -> AppResult<Vec<String>> {
        if files.is_empty() {
            return Err(AppError::with_message(
                ErrorCode::NoFileProvided,
                "Nenhuma foto enviada.",
            ));
        }
        let paths: Vec<String> = files.iter().map(|f| f.stored_path.clone()).collect();
        let added = paths.len();

        let repo = self.repo.clone();
        let target = id.clone();
        let result = blocking(move || repo.update(|list| galleries::add_photos(list, &target, paths))).await;
        match result {
            Ok(fotos) => {
                tracing::info!(gallery_id = %id, added, total = fotos.len(), "Photos added");
                Ok(fotos)
            }
            Err(err) => {
                self.discard(files).await;
                Err(err)
            }
        }
    }

    /// Remove one photo from the gallery's list
    ///
    /// The file is deleted only when this call dropped the last reference to
    /// it: a photo that is still the cover, or was never listed, stays on disk.
    pub async fn remove_photo(&self, id: &GalleryId, foto: Option<&str>) -> AppResult<Vec<String>> {
        let foto = foto
            .filter(|f| !f.is_empty())
            .ok_or_else(|| AppError::required("foto", "Campo foto obrigatório."))?
            .to_string();

        let repo = self.repo.clone();
        let (target, path) = (id.clone(), foto.clone());
        let (fotos, delete) = blocking(move || {
            repo.update(|list| {
                let (fotos, removed) = galleries::remove_photo(list, &target, &path)?;
                let is_cover = galleries::find(list, &target)?.imagem == path;
                Ok::<_, AppError>((fotos, removed && !is_cover))
            })
        })
        .await?;
        tracing::info!(gallery_id = %id, foto = %foto, remaining = fotos.len(), "Photo removed");
        if delete {
            self.media.delete_best_effort(&[foto]).await;
        }
        Ok(fotos)
    }

    /// Remove a gallery by id and delete all of its files
    pub async fn remove(&self, id: &GalleryId) -> AppResult<()> {
        let repo = self.repo.clone();
        let target = id.clone();
        let record = blocking(move || repo.update(|list| galleries::remove_gallery(list, &target))).await?;
        self.delete_files(&record).await;
        Ok(())
    }

    /// Remove by id, imagem or ano, in that order of preference
    pub async fn remove_fallback(&self, lookup: GalleryLookup) -> AppResult<()> {
        let repo = self.repo.clone();
        let record = blocking(move || {
            repo.update(|list| galleries::remove_gallery_fallback(list, &lookup))
        })
        .await?;
        self.delete_files(&record).await;
        Ok(())
    }

    async fn delete_files(&self, record: &GalleryRecord) {
        let mut paths = record.fotos.clone();
        if !paths.contains(&record.imagem) {
            paths.push(record.imagem.clone());
        }
        paths.sort();
        paths.dedup();
        let deleted = self.media.delete_best_effort(&paths).await;
        tracing::info!(gallery_id = %record.id, ano = %record.ano, deleted, "Gallery removed");
    }

    async fn discard(&self, files: Vec<UploadedFile>) {
        let paths: Vec<String> = files.into_iter().map(|f| f.stored_path).collect();
        self.media.delete_best_effort(&paths).await;
    }
}
