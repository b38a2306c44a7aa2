//! Registro explícito de handlers de artifact y backends de almacenamiento.
//!
//! Los handlers se agrupan por categoría (`data`, `model`, `metric`); dentro
//! de cada categoría se eligen por nombre de tipo, y sin nombre gana el
//! primero registrado. El registro es de sólo lectura durante el binding.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::errors::StorageError;
use crate::model::{ArtifactCategory, Uri};
use crate::storage::{InMemoryStorage, Storage, StorageRegistry};

/// Codec por tipo de artifact: payload JSON <-> bytes.
pub trait ArtifactHandler: Send + Sync + fmt::Debug {
    fn type_name(&self) -> &str;
    /// Formato declarado en la provenance de cada escritura.
    fn file_format(&self) -> &str;
    fn encode(&self, payload: &Value) -> Result<Vec<u8>, StorageError>;
    fn decode(&self, bytes: &[u8]) -> Result<Value, StorageError>;
}

/// Handler genérico: el payload se guarda como un documento JSON.
#[derive(Debug, Clone)]
pub struct JsonHandler {
    type_name: String,
}

impl JsonHandler {
    pub fn new(type_name: &str) -> Self {
        Self { type_name: type_name.to_string() }
    }
}

impl ArtifactHandler for JsonHandler {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn file_format(&self) -> &str {
        "json"
    }

    fn encode(&self, payload: &Value) -> Result<Vec<u8>, StorageError> {
        Ok(serde_json::to_vec(payload)?)
    }

    fn decode(&self, bytes: &[u8]) -> Result<Value, StorageError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ArtifactRegistry {
    handlers: HashMap<ArtifactCategory, Vec<Arc<dyn ArtifactHandler>>>,
    storages: StorageRegistry,
}

impl ArtifactRegistry {
    /// Registro vacío: sin handlers ni backends.
    pub fn new() -> Self {
        Self::default()
    }

    /// Un `JsonHandler` (`json`) por categoría más el backend `mem://`.
    pub fn with_defaults() -> Self {
        let mut reg = Self::new();
        for category in [ArtifactCategory::Data, ArtifactCategory::Model, ArtifactCategory::Metric] {
            reg.register(category, Arc::new(JsonHandler::new("json")));
        }
        reg.register_storage(Arc::new(InMemoryStorage::new()));
        reg
    }

    /// Registra un handler para la categoría. Si ya había uno con el mismo
    /// `type_name` se reemplaza conservando su posición.
    pub fn register(&mut self, category: ArtifactCategory, handler: Arc<dyn ArtifactHandler>) {
        let list = self.handlers.entry(category).or_default();
        match list.iter().position(|h| h.type_name() == handler.type_name()) {
            Some(pos) => list[pos] = handler,
            None => list.push(handler),
        }
    }

    pub fn with_handler(mut self, category: ArtifactCategory, handler: Arc<dyn ArtifactHandler>) -> Self {
        self.register(category, handler);
        self
    }

    pub fn register_storage(&mut self, storage: Arc<dyn Storage>) {
        self.storages.register(storage);
    }

    pub fn with_storage(mut self, storage: Arc<dyn Storage>) -> Self {
        self.register_storage(storage);
        self
    }

    pub fn handler_for(&self, category: ArtifactCategory, type_name: Option<&str>) -> Result<Arc<dyn ArtifactHandler>, String> {
        let list = self.handlers.get(&category).map(Vec::as_slice).unwrap_or_default();
        let found = match type_name {
            Some(t) => list.iter().find(|h| h.type_name() == t),
            None => list.first(),
        };
        found.cloned().ok_or_else(|| match type_name {
                           Some(t) => format!("no handler registered for {category} type `{t}`"),
                           None => format!("no handler registered for {category} artifacts"),
                       })
    }

    /// Tipos registrados para una categoría, en orden de registro.
    pub fn type_names(&self, category: ArtifactCategory) -> Vec<&str> {
        self.handlers
            .get(&category)
            .map(|list| list.iter().map(|h| h.type_name()).collect())
            .unwrap_or_default()
    }

    pub fn storage_for(&self, uri: &Uri) -> Result<Arc<dyn Storage>, StorageError> {
        self.storages.resolve(uri)
    }

    pub fn storages(&self) -> &StorageRegistry {
        &self.storages
    }
}
