use std::sync::Arc;
use std::time::Instant;

use crate::core::{Config, Result};
use crate::db::{GalleryRepository, HomeRepository, JsonFile};
use crate::services::{GalleryService, HomeService, MediaStore};

/// Server state - shared handles to every service
///
/// Cloning is cheap; all services wrap `Arc`s.
///
/// # Components
///
/// | Field | Type | Purpose |
/// |-------|------|---------|
/// | config | Config | immutable settings |
/// | home | HomeService | home document |
/// | galleries | GalleryService | photo galleries |
/// | media | MediaStore | uploads directory |
/// | started_at | Instant | uptime reference |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub home: HomeService,
    pub galleries: GalleryService,
    pub media: MediaStore,
    pub started_at: Instant,
}

impl ServerState {
    /// Assemble state from already-built repositories
    pub fn new(
        config: Config,
        home_repo: Arc<HomeRepository>,
        gallery_repo: Arc<GalleryRepository>,
    ) -> Self {
        let media = MediaStore::new(config.uploads_dir());
        Self {
            home: HomeService::new(home_repo, media.clone()),
            galleries: GalleryService::new(gallery_repo, media.clone()),
            media,
            config,
            started_at: Instant::now(),
        }
    }

    /// Initialize server state
    ///
    /// 1. Create the data and uploads directories
    /// 2. Open the JSON stores (`home.json`, `galerias.json`)
    /// 3. Heal legacy gallery records
    pub fn initialize(config: &Config) -> Result<Self> {
        std::fs::create_dir_all(&config.data_dir)?;
        std::fs::create_dir_all(config.uploads_dir())?;

        let home_repo = Arc::new(HomeRepository::new(Arc::new(JsonFile::new(
            config.home_file(),
        ))));
        let gallery_repo = Arc::new(GalleryRepository::new(Arc::new(JsonFile::new(
            config.galleries_file(),
        ))));

        match gallery_repo.heal() {
            Ok(count) => tracing::info!(count, "Galleries loaded"),
            Err(e) => tracing::warn!(error = %e, "Gallery store could not be read at startup"),
        }

        tracing::info!(
            data_dir = %config.data_dir.display(),
            uploads_dir = %config.uploads_dir().display(),
            "Server state initialized"
        );
        Ok(Self::new(config.clone(), home_repo, gallery_repo))
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
