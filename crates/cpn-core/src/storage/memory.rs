use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::Storage;
use crate::errors::StorageError;
use crate::model::Uri;

/// Backend `mem://` en memoria. Los clones comparten el mismo contenido, así
/// que un test puede conservar un handle e inspeccionar lo escrito.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStorage {
    inner: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Contenido bajo `path` (sin el prefijo `mem://`).
    pub fn get(&self, path: &str) -> Option<Vec<u8>> {
        self.entries().get(path).cloned()
    }

    pub fn put(&self, path: &str, bytes: impl Into<Vec<u8>>) {
        self.entries().insert(path.to_string(), bytes.into());
    }

    /// Paths almacenados, ordenados.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

impl Storage for InMemoryStorage {
    fn scheme(&self) -> &str {
        "mem"
    }

    fn read(&self, uri: &Uri) -> Result<Vec<u8>, StorageError> {
        self.get(uri.path()).ok_or_else(|| StorageError::NotFound(uri.to_string()))
    }

    fn write(&self, uri: &Uri, bytes: &[u8]) -> Result<(), StorageError> {
        self.put(uri.path(), bytes);
        Ok(())
    }
}
