//! Configuración runtime de una ejecución: apply specs y `TaskConfig`.

mod apply_spec;
mod task;

pub use apply_spec::{ArtifactApply, ArtifactApplySpec};
pub use task::TaskConfig;
