//! cpn-adapters: piezas concretas alrededor del core.
//!
//! - `storage::FileStorage`: backend `file://` relativo a un directorio raíz.
//! - `handlers`: codecs de tabla (JSON lines), modelo y métrica.
//! - `components`: componentes estructurales de demostración (`union`,
//!   `data_split`, `evaluation`) que ejercitan cada forma de binding.
//!
//! El core no depende de este crate; el binario lo usa para armar el
//! registro por defecto y el catálogo.

pub mod components;
pub mod error;
pub mod handlers;
pub mod storage;

use std::path::Path;
use std::sync::Arc;

use cpn_core::{ArtifactCategory, ArtifactRegistry};

pub use components::{catalog, find, Component, RunContext};
pub use error::ComponentError;
pub use handlers::{JsonMetricHandler, JsonModelHandler, TableHandler};
pub use storage::FileStorage;

/// Registro con los handlers por defecto del core (`json`, `mem://`) más
/// tabla/modelo/métrica y `file://` bajo `storage_root`.
pub fn default_registry(storage_root: &Path) -> ArtifactRegistry {
    ArtifactRegistry::with_defaults().with_handler(ArtifactCategory::Data, Arc::new(TableHandler))
                                     .with_handler(ArtifactCategory::Model, Arc::new(JsonModelHandler))
                                     .with_handler(ArtifactCategory::Metric, Arc::new(JsonMetricHandler))
                                     .with_storage(Arc::new(FileStorage::new(storage_root)))
}
