//! Gallery Repository
//!
//! Records on disk may predate ids and photo lists. Every read normalizes
//! them and the file is rewritten only when normalization changed something.

use parking_lot::Mutex;
use shared::models::{GalleryRecord, StoredGallery};
use shared::util::now_millis;
use std::sync::Arc;

use crate::content::galleries;
use crate::db::{DocumentStore, RepoError, RepoResult};

pub struct GalleryRepository {
    store: Arc<dyn DocumentStore<Vec<StoredGallery>>>,
    lock: Mutex<()>,
}

impl GalleryRepository {
    pub fn new(store: Arc<dyn DocumentStore<Vec<StoredGallery>>>) -> Self {
        Self {
            store,
            lock: Mutex::new(()),
        }
    }

    /// Normalized list; caller must hold the lock
    fn load_normalized(&self) -> RepoResult<(Vec<GalleryRecord>, bool)> {
        let stored = self.store.load()?.unwrap_or_default();
        Ok(galleries::normalize(stored, now_millis()))
    }

    fn save(&self, list: &[GalleryRecord]) -> RepoResult<()> {
        let stored: Vec<StoredGallery> = list.iter().cloned().map(StoredGallery::from).collect();
        self.store.save(&stored)
    }

    /// All galleries, writing back healed records when needed
    pub fn list(&self) -> RepoResult<Vec<GalleryRecord>> {
        let _guard = self.lock.lock();
        let (list, changed) = self.load_normalized()?;
        if changed {
            self.save(&list)?;
            tracing::info!(count = list.len(), "Gallery records normalized and written back");
        }
        Ok(list)
    }

    /// Normalize the stored file once, typically at startup
    pub fn heal(&self) -> RepoResult<usize> {
        self.list().map(|list| list.len())
    }

    /// Load, mutate and save while holding the write lock
    ///
    /// Nothing is written when `f` fails, unless normalization alone changed
    /// the records.
    pub fn update<R, E>(&self, f: impl FnOnce(&mut Vec<GalleryRecord>) -> Result<R, E>) -> Result<R, E>
    where
        E: From<RepoError>,
    {
        let _guard = self.lock.lock();
        let (mut list, changed) = self.load_normalized()?;
        let healed = changed.then(|| list.clone());
        match f(&mut list) {
            Ok(out) => {
                self.save(&list)?;
                Ok(out)
            }
            Err(err) => {
                if let Some(healed) = healed {
                    self.save(&healed)?;
                }
                Err(err)
            }
        }
    }
}
