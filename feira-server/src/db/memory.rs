use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{DocumentStore, RepoResult};

/// In-memory [`DocumentStore`] that counts writes
#[derive(Debug, Default)]
pub struct MemoryStore<T> {
    value: Mutex<Option<T>>,
    saves: AtomicUsize,
}

impl<T> MemoryStore<T> {
    pub fn new() -> Self {
        Self {
            value: Mutex::new(None),
            saves: AtomicUsize::new(0),
        }
    }

    pub fn with_value(value: T) -> Self {
        Self {
            value: Mutex::new(Some(value)),
            saves: AtomicUsize::new(0),
        }
    }

    /// Number of successful `save` calls
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl<T: Clone> MemoryStore<T> {
    pub fn snapshot(&self) -> Option<T> {
        self.value.lock().clone()
    }
}

impl<T> DocumentStore<T> for MemoryStore<T>
where
    T: Clone + Send,
{
    fn load(&self) -> RepoResult<Option<T>> {
        Ok(self.value.lock().clone())
    }

    fn save(&self, value: &T) -> RepoResult<()> {
        *self.value.lock() = Some(value.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
