//! Home Service
//!
//! Runs the merge and removal engines against the home repository. Uploaded
//! files belong to the request: when the update fails they are deleted again.

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::HomeDocument;
use std::sync::Arc;

use super::{MediaStore, blocking};
use crate::content::{HomeUpdate, merge, sectors, view};
use crate::db::HomeRepository;

#[derive(Clone)]
pub struct HomeService {
    repo: Arc<HomeRepository>,
    media: MediaStore,
}

impl HomeService {
    pub fn new(repo: Arc<HomeRepository>, media: MediaStore) -> Self {
        Self { repo, media }
    }

    /// Stored document with display defaults applied
    pub async fn get(&self) -> AppResult<HomeDocument> {
        let repo = self.repo.clone();
        let doc = blocking(move || Ok(repo.get()?)).await?;
        Ok(view::present(&doc))
    }

    /// Merge `update` into the stored document and return the saved result
    pub async fn update(&self, update: HomeUpdate) -> AppResult<HomeDocument> {
        let stored = update.stored_paths();
        let (fields, files) = (update.fields.len(), update.files.len());

        let repo = self.repo.clone();
        let result = blocking(move || {
            repo.update(|doc| {
                *doc = merge::apply(std::mem::take(doc), &update);
                Ok::<_, AppError>(doc.clone())
            })
        })
        .await;
        match result {
            Ok(doc) => {
                tracing::info!(fields, files, "Home document updated");
                Ok(doc)
            }
            Err(err) => {
                self.media.delete_best_effort(&stored).await;
                Err(err)
            }
        }
    }

    /// Drop one logo from a sector and delete its file
    pub async fn remove_logo(&self, setor: Option<usize>, logo: Option<&str>) -> AppResult<()> {
        let (Some(setor), Some(logo)) = (setor, logo.filter(|l| !l.is_empty())) else {
            return Err(AppError::with_message(
                ErrorCode::RequiredField,
                "Setor e logo obrigatórios.",
            ));
        };
        let repo = self.repo.clone();
        let target = logo.to_string();
        let removed =
            blocking(move || repo.update(|doc| sectors::remove_logo(doc, setor, &target))).await?;
        match removed {
            Some(path) => {
                tracing::info!(setor, logo = %path, "Sector logo removed");
                self.media.delete_best_effort(&[path]).await;
            }
            None => tracing::debug!(setor, logo, "Logo not present in sector"),
        }
        Ok(())
    }

    /// Remove an extra sector (5 and up) together with its logo files
    pub async fn remove_sector(&self, setor: Option<usize>) -> AppResult<()> {
        let setor = setor.ok_or_else(|| AppError::required("setor", "Setor obrigatório."))?;
        let repo = self.repo.clone();
        let logos = blocking(move || repo.update(|doc| sectors::remove_sector(doc, setor))).await?;
        tracing::info!(setor, logos = logos.len(), "Sector removed");
        self.media.delete_best_effort(&logos).await;
        Ok(())
    }
}
