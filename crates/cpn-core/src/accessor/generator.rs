//! Generador perezoso de writers para salidas `multi`.
//!
//! El estado vive en un `WriterCursor` explícito que posee el llamador:
//! `next(cursor)` devuelve el writer para `cursor.index()` y el cursor
//! siguiente. Cada writer materializado se añade a la colección compartida,
//! así que el linaje refleja exactamente los writers creados. Un cursor cuyo
//! índice no coincide con el número de writers ya materializados se rechaza
//! (`StaleCursor`): la secuencia queda sin huecos ni duplicados.

use std::sync::Arc;

use log::debug;
use serde_json::{Map, Value};

use super::{ArtifactCollection, ArtifactWriter};
use crate::errors::BindError;
use crate::model::{ArtifactRecord, Uri};
use crate::registry::ArtifactHandler;
use crate::storage::Storage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WriterCursor {
    index: usize,
}

impl WriterCursor {
    pub fn start() -> Self {
        Self { index: 0 }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    fn advance(self) -> Self {
        Self { index: self.index + 1 }
    }
}

#[derive(Debug)]
pub struct WriterGenerator {
    name: String,
    template: String,
    metadata: Map<String, Value>,
    handler: Arc<dyn ArtifactHandler>,
    storage: Arc<dyn Storage>,
    collection: ArtifactCollection,
}

impl WriterGenerator {
    pub(crate) fn new(name: &str,
                      template: &str,
                      metadata: Map<String, Value>,
                      handler: Arc<dyn ArtifactHandler>,
                      storage: Arc<dyn Storage>,
                      collection: ArtifactCollection)
                      -> Self {
        Self { name: name.to_string(),
               template: template.to_string(),
               metadata,
               handler,
               storage,
               collection }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// Writers creados hasta ahora.
    pub fn materialized(&self) -> usize {
        self.collection.len()
    }

    pub fn next(&self, cursor: WriterCursor) -> Result<(ArtifactWriter, WriterCursor), BindError> {
        let index = cursor.index();
        let raw = Uri::render_template(&self.template, index);
        let uri = Uri::parse(&raw)?;
        let record = ArtifactRecord::new(&uri.to_string(), self.handler.type_name(), self.metadata.clone()).shared();

        self.collection
            .append_at(index, record.clone())
            .map_err(|found| BindError::StaleCursor { name: self.name.clone(),
                                                      expected: found,
                                                      found: index })?;
        debug!("materialized writer {index} of `{}` at {uri}", self.name);

        let writer = ArtifactWriter::new(&self.name,
                                         uri,
                                         Some(index),
                                         record,
                                         self.handler.clone(),
                                         self.storage.clone());
        Ok((writer, cursor.advance()))
    }

    /// Iterador infinito que conduce el cursor desde el siguiente índice
    /// libre. Tras el primer error deja de producir elementos.
    pub fn iter(&self) -> WriterIter<'_> {
        WriterIter { generator: self,
                     cursor: Some(WriterCursor { index: self.materialized() }) }
    }
}

#[derive(Debug)]
pub struct WriterIter<'a> {
    generator: &'a WriterGenerator,
    cursor: Option<WriterCursor>,
}

impl Iterator for WriterIter<'_> {
    type Item = Result<ArtifactWriter, BindError>;

    fn next(&mut self) -> Option<Self::Item> {
        let cursor = self.cursor.take()?;
        match self.generator.next(cursor) {
            Ok((writer, next)) => {
                self.cursor = Some(next);
                Some(Ok(writer))
            }
            Err(e) => Some(Err(e)),
        }
    }
}
