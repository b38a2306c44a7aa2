use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::model::{lock_record, ArtifactRecord, SharedRecord};

/// Secuencia ordenada de registros de un binding `multi`. El orden de
/// inserción es el de resolución y es significativo. Los clones comparten
/// la misma secuencia.
#[derive(Debug, Clone, Default)]
pub struct ArtifactCollection {
    records: Arc<Mutex<Vec<SharedRecord>>>,
}

impl ArtifactCollection {
    pub fn new() -> Self {
        Self::default()
    }

    fn guard(&self) -> MutexGuard<'_, Vec<SharedRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn push(&self, record: SharedRecord) {
        self.guard().push(record);
    }

    /// Añade `record` sólo si la colección tiene exactamente `expected`
    /// elementos; si no, devuelve la longitud real.
    pub fn append_at(&self, expected: usize, record: SharedRecord) -> Result<(), usize> {
        let mut records = self.guard();
        if records.len() != expected {
            return Err(records.len());
        }
        records.push(record);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.guard().len()
    }

    pub fn is_empty(&self) -> bool {
        self.guard().is_empty()
    }

    /// Copia de los registros en orden.
    pub fn snapshot(&self) -> Vec<ArtifactRecord> {
        self.guard().iter().map(|r| lock_record(r).clone()).collect()
    }
}
