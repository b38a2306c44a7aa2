//! Registro de linaje: qué leyó y qué escribió realmente una ejecución.
//!
//! El formato (`inputs.data`, `inputs.model`, `outputs.data`,
//! `outputs.model`, `outputs.metric`) es un contrato estable. Nunca contiene
//! payloads, sólo los `ArtifactRecord` resueltos.

mod recorder;
mod record;

pub use record::{InputLineage, LineageEntry, LineageRecord, OutputLineage};
