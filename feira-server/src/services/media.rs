//! Media Store
//!
//! Uploaded files live flat in the uploads directory and are referenced from
//! documents as `/uploads/<name>`. Deletions are best-effort: a missing or
//! locked file never fails the request that triggered the cleanup.

use rand::Rng;
use shared::util::now_millis;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;

/// URL prefix under which uploads are served
pub const PUBLIC_PREFIX: &str = "/uploads/";

#[derive(Debug, Clone)]
pub struct MediaStore {
    uploads_dir: PathBuf,
}

impl MediaStore {
    pub fn new(uploads_dir: impl Into<PathBuf>) -> Self {
        Self {
            uploads_dir: uploads_dir.into(),
        }
    }

    pub fn uploads_dir(&self) -> &Path {
        &self.uploads_dir
    }

    /// Write `bytes` under a fresh name and return its public path
    pub async fn store(&self, prefix: &str, original_name: Option<&str>, bytes: &[u8]) -> io::Result<String> {
        fs::create_dir_all(&self.uploads_dir).await?;
        let name = upload_name(prefix, original_name);
        fs::write(self.uploads_dir.join(&name), bytes).await?;
        tracing::debug!(file = %name, size = bytes.len(), "Upload stored");
        Ok(format!("{PUBLIC_PREFIX}{name}"))
    }

    /// Filesystem location of a public path
    ///
    /// `None` for anything that is not a plain file name inside the uploads
    /// directory.
    pub fn resolve(&self, public_path: &str) -> Option<PathBuf> {
        let name = public_path
            .strip_prefix(PUBLIC_PREFIX)
            .or_else(|| public_path.strip_prefix('/'))
            .unwrap_or(public_path);
        let is_plain = !name.is_empty()
            && name != "."
            && name != ".."
            && !name.contains(['/', '\\'])
            && !name.contains("..");
        is_plain.then(|| self.uploads_dir.join(name))
    }

    /// Remove the file behind `public_path`; `Ok(false)` when it was not there
    pub async fn delete(&self, public_path: &str) -> io::Result<bool> {
        let Some(path) = self.resolve(public_path) else {
            return Ok(false);
        };
        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Delete every path, logging failures; returns how many were removed
    pub async fn delete_best_effort(&self, paths: &[String]) -> usize {
        let mut deleted_count = 0;

        for path in paths.iter().filter(|p| !p.is_empty()) {
            match self.delete(path).await {
                Ok(true) => deleted_count += 1,
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(path = %path, error = %e, "Failed to delete upload");
                }
            }
        }

        if deleted_count > 0 {
            tracing::info!(count = deleted_count, "Uploads deleted");
        }

        deleted_count
    }
}

/// `<prefix>-<millis>-<random><.ext>`
pub fn upload_name(prefix: &str, original_name: Option<&str>) -> String {
    let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000_000);
    let ext = original_name.and_then(extension).unwrap_or_default();
    format!("{}-{}-{}{}", sanitize_prefix(prefix), now_millis(), suffix, ext)
}

/// Prefix for files of a home update, derived from the form field name
pub fn sanitize_prefix(field: &str) -> String {
    let cleaned: String = field
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
        .collect();
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned
    }
}

/// Lower-cased `.ext` of a client file name, alphanumerics only
fn extension(original_name: &str) -> Option<String> {
    let (_, ext) = original_name.rsplit_once('.')?;
    if ext.is_empty() || ext.len() > 10 || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(format!(".{}", ext.to_ascii_lowercase()))
}
