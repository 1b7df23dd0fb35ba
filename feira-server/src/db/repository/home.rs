//! Home Document Repository (Singleton)

use parking_lot::Mutex;
use shared::models::HomeDocument;
use std::sync::Arc;

use crate::db::{DocumentStore, RepoError, RepoResult};

pub struct HomeRepository {
    store: Arc<dyn DocumentStore<HomeDocument>>,
    lock: Mutex<()>,
}

impl HomeRepository {
    pub fn new(store: Arc<dyn DocumentStore<HomeDocument>>) -> Self {
        Self {
            store,
            lock: Mutex::new(()),
        }
    }

    /// Stored document, or an empty one when nothing was saved yet
    pub fn get(&self) -> RepoResult<HomeDocument> {
        Ok(self.store.load()?.unwrap_or_default())
    }

    /// Load, mutate and save while holding the write lock
    ///
    /// Nothing is written when `f` fails.
    pub fn update<R, E>(&self, f: impl FnOnce(&mut HomeDocument) -> Result<R, E>) -> Result<R, E>
    where
        E: From<RepoError>,
    {
        let _guard = self.lock.lock();
        let mut doc = self.get()?;
        let out = f(&mut doc)?;
        self.store.save(&doc)?;
        Ok(out)
    }
}
