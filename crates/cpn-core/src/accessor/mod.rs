//! Accessors de recursos: readers y writers de un solo uso, colecciones
//! ordenadas de registros y el generador de writers para salidas `multi`.

mod collection;
mod generator;
mod reader;
mod writer;

pub use collection::ArtifactCollection;
pub use generator::{WriterCursor, WriterGenerator, WriterIter};
pub use reader::ArtifactReader;
pub use writer::ArtifactWriter;

use std::sync::atomic::{AtomicBool, Ordering};

use crate::errors::BindError;

/// Marca el accessor como consumido antes de cualquier I/O. Sólo el primer
/// llamador gana el compare-and-set.
pub(crate) fn claim(flag: &AtomicBool, uri: &str) -> Result<(), BindError> {
    flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
        .map(|_| ())
        .map_err(|_| BindError::UseAfterConsumed { uri: uri.to_string() })
}
