use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::Write;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use super::{DocumentStore, RepoError, RepoResult};

/// JSON document stored in a single file
///
/// Writes go to a sibling temp file that is renamed over the target, so a
/// reader never sees a half-written document.
#[derive(Debug)]
pub struct JsonFile<T> {
    path: PathBuf,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonFile<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_err(&self, source: std::io::Error) -> RepoError {
        RepoError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }

    fn json_err(&self, source: serde_json::Error) -> RepoError {
        RepoError::Serialization {
            path: self.path.display().to_string(),
            source,
        }
    }
}

fn atomic_write(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    let tmp = path.with_file_name(format!(".{}.tmp", file_name));
    {
        let mut file = fs::File::create(&tmp)?;
        file.write_all(bytes)?;
        file.sync_all()?;
    }
    fs::rename(&tmp, path)
}

impl<T> DocumentStore<T> for JsonFile<T>
where
    T: Serialize + DeserializeOwned,
{
    fn load(&self) -> RepoResult<Option<T>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_err(e)),
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| self.json_err(e))
    }

    fn save(&self, value: &T) -> RepoResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.io_err(e))?;
            }
        }
        let json = serde_json::to_string_pretty(value).map_err(|e| self.json_err(e))?;
        atomic_write(&self.path, json.as_bytes()).map_err(|e| self.io_err(e))?;
        tracing::debug!(path = %self.path.display(), bytes = json.len(), "Document saved");
        Ok(())
    }
}
