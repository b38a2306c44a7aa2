use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::debug;
use serde_json::{Map, Value};

use super::claim;
use crate::errors::BindError;
use crate::model::{lock_record, ArtifactRecord, SharedRecord, Uri};
use crate::registry::ArtifactHandler;
use crate::storage::Storage;

/// Reader de un artifact de entrada. `read()` puede llamarse una sola vez.
#[derive(Debug)]
pub struct ArtifactReader {
    name: String,
    uri: Uri,
    record: SharedRecord,
    handler: Arc<dyn ArtifactHandler>,
    storage: Arc<dyn Storage>,
    consumed: AtomicBool,
}

impl ArtifactReader {
    pub(crate) fn new(name: &str,
                      uri: Uri,
                      record: SharedRecord,
                      handler: Arc<dyn ArtifactHandler>,
                      storage: Arc<dyn Storage>)
                      -> Self {
        Self { name: name.to_string(),
               uri,
               record,
               handler,
               storage,
               consumed: AtomicBool::new(false) }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    pub fn type_name(&self) -> &str {
        self.handler.type_name()
    }

    /// Metadata del apply spec.
    pub fn metadata(&self) -> Map<String, Value> {
        lock_record(&self.record).metadata.metadata.clone()
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed.load(Ordering::Acquire)
    }

    /// Copia del registro tal como se volcará al linaje.
    pub fn record(&self) -> ArtifactRecord {
        lock_record(&self.record).clone()
    }

    pub fn read(&self) -> Result<Value, BindError> {
        let uri = self.uri.to_string();
        claim(&self.consumed, &uri)?;
        lock_record(&self.record).consumed = true;
        debug!("reading `{}` from {uri}", self.name);

        let bytes = self.storage
                        .read(&self.uri)
                        .map_err(|source| BindError::ResourceReadError { uri: uri.clone(),
                                                                         source })?;
        self.handler
            .decode(&bytes)
            .map_err(|source| BindError::ResourceReadError { uri, source })
    }
}
