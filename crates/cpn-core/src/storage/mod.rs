//! Capacidad de almacenamiento: "dada una URI, producir/aceptar bytes".
//!
//! El core no conoce ningún backend concreto salvo `mem://`; los demás
//! (`file://`, ...) se registran desde fuera por esquema.

mod memory;

pub use memory::InMemoryStorage;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::errors::StorageError;
use crate::model::Uri;

pub trait Storage: Send + Sync + fmt::Debug {
    /// Esquema que atiende este backend (`mem`, `file`, ...).
    fn scheme(&self) -> &str;
    fn read(&self, uri: &Uri) -> Result<Vec<u8>, StorageError>;
    fn write(&self, uri: &Uri, bytes: &[u8]) -> Result<(), StorageError>;
}

/// Backends indexados por esquema.
#[derive(Debug, Clone, Default)]
pub struct StorageRegistry {
    backends: BTreeMap<String, Arc<dyn Storage>>,
}

impl StorageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registra un backend; reemplaza al que hubiera para el mismo esquema.
    pub fn register(&mut self, storage: Arc<dyn Storage>) {
        self.backends.insert(storage.scheme().to_ascii_lowercase(), storage);
    }

    pub fn resolve(&self, uri: &Uri) -> Result<Arc<dyn Storage>, StorageError> {
        self.backends
            .get(uri.scheme())
            .cloned()
            .ok_or_else(|| StorageError::UnsupportedScheme(uri.scheme().to_string()))
    }

    pub fn schemes(&self) -> Vec<&str> {
        self.backends.keys().map(String::as_str).collect()
    }
}
