//! Registro de un artifact resuelto: la unidad que termina en el linaje.
//!
//! Un `ArtifactRecord` nunca contiene el payload; sólo ubicación, tipo,
//! metadata y la provenance de cada escritura. Se comparte (`SharedRecord`)
//! entre el accessor que lo actualiza y el binder que lo vuelca al final.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    /// Metadata libre: la del apply spec, mergeada con la de la escritura.
    #[serde(default)]
    pub metadata: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub writes: Vec<WriteProvenance>,
    /// Sello de origen; sólo en salidas, lo añade el volcado de linaje.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceStamp>,
}

/// Provenance de una escritura efectiva.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WriteProvenance {
    pub created_time: DateTime<Utc>,
    pub file_format: String,
    /// BLAKE3 de los bytes codificados.
    pub content_hash: String,
    pub size: usize,
}

/// Identidad del task y argumento que produjo una salida.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceStamp {
    pub task_id: String,
    pub party_task_id: String,
    pub task_name: String,
    pub component: String,
    pub output_artifact_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_index: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactRecord {
    pub uri: String,
    pub type_name: String,
    pub metadata: ArtifactMetadata,
    #[serde(default)]
    pub consumed: bool,
}

pub type SharedRecord = Arc<Mutex<ArtifactRecord>>;

impl ArtifactRecord {
    pub fn new(uri: &str, type_name: &str, metadata: Map<String, Value>) -> Self {
        Self { uri: uri.to_string(),
               type_name: type_name.to_string(),
               metadata: ArtifactMetadata { metadata,
                                            ..Default::default() },
               consumed: false }
    }

    pub fn shared(self) -> SharedRecord {
        Arc::new(Mutex::new(self))
    }
}

/// Bloquea un registro compartido. Un lock envenenado se recupera: el
/// contenido es metadata plana y sigue siendo coherente.
pub fn lock_record(record: &SharedRecord) -> MutexGuard<'_, ArtifactRecord> {
    record.lock().unwrap_or_else(PoisonError::into_inner)
}
