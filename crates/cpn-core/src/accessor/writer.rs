use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use log::debug;
use serde_json::{Map, Value};

use super::claim;
use crate::errors::BindError;
use crate::hashing::hash_bytes;
use crate::model::{lock_record, ArtifactRecord, SharedRecord, Uri, WriteProvenance};
use crate::registry::ArtifactHandler;
use crate::storage::Storage;

/// Writer de un artifact de salida. `write()` puede llamarse una sola vez.
#[derive(Debug)]
pub struct ArtifactWriter {
    name: String,
    uri: Uri,
    /// Posición dentro de un generador; `None` para salidas `single`.
    index: Option<usize>,
    record: SharedRecord,
    handler: Arc<dyn ArtifactHandler>,
    storage: Arc<dyn Storage>,
    consumed: AtomicBool,
}

impl ArtifactWriter {
    pub(crate) fn new(name: &str,
                      uri: Uri,
                      index: Option<usize>,
                      record: SharedRecord,
                      handler: Arc<dyn ArtifactHandler>,
                      storage: Arc<dyn Storage>)
                      -> Self {
        Self { name: name.to_string(),
               uri,
               index,
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

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn type_name(&self) -> &str {
        self.handler.type_name()
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed.load(Ordering::Acquire)
    }

    pub fn record(&self) -> ArtifactRecord {
        lock_record(&self.record).clone()
    }

    /// Codifica y persiste `payload`. La metadata dada se mergea sobre la del
    /// apply spec (gana la de la escritura) y se añade una entrada de
    /// provenance con hash y tamaño de los bytes escritos.
    pub fn write(&self, payload: &Value, metadata: Option<Map<String, Value>>) -> Result<(), BindError> {
        let uri = self.uri.to_string();
        claim(&self.consumed, &uri)?;
        lock_record(&self.record).consumed = true;

        let bytes = self.handler
                        .encode(payload)
                        .map_err(|source| BindError::ResourceWriteError { uri: uri.clone(),
                                                                          source })?;
        self.storage
            .write(&self.uri, &bytes)
            .map_err(|source| BindError::ResourceWriteError { uri: uri.clone(),
                                                              source })?;

        let provenance = WriteProvenance { created_time: Utc::now(),
                                           file_format: self.handler.file_format().to_string(),
                                           content_hash: hash_bytes(&bytes),
                                           size: bytes.len() };
        let mut record = lock_record(&self.record);
        if let Some(extra) = metadata {
            record.metadata.metadata.extend(extra);
        }
        record.metadata.writes.push(provenance);
        debug!("wrote `{}` to {uri} ({} bytes)", self.name, bytes.len());
        Ok(())
    }
}
