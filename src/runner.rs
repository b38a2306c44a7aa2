//! Ejecución de un task catalogado de punta a punta.

use std::fs;
use std::path::{Path, PathBuf};

use cpn_adapters::{default_registry, find, ComponentError, RunContext};
use cpn_core::{ArtifactRegistry, BindError, Binder, LineageRecord, TaskConfig};
use log::info;
use thiserror::Error;

use crate::config::Settings;

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error(transparent)]
    Bind(#[from] BindError),
    #[error(transparent)]
    Component(#[from] ComponentError),
    #[error("unknown component `{0}`")]
    UnknownComponent(String),
    #[error("task arguments were already taken")]
    ArgumentsTaken,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct TaskRunner {
    registry: ArtifactRegistry,
    strict_config: bool,
}

impl TaskRunner {
    pub fn new(registry: ArtifactRegistry) -> Self {
        Self { registry,
               strict_config: false }
    }

    /// Registro por defecto con `file://` bajo `storage_root`.
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(default_registry(&settings.storage_root)).strict_config(settings.strict_config)
    }

    pub fn strict_config(mut self, strict: bool) -> Self {
        self.strict_config = strict;
        self
    }

    pub fn load_config(path: &Path) -> Result<TaskConfig, RunnerError> {
        let raw = fs::read_to_string(path)?;
        Ok(TaskConfig::from_json_str(&raw)?)
    }

    /// Liga y ejecuta el componente nombrado en `config`; devuelve el linaje.
    pub fn run(&self, config: &TaskConfig) -> Result<LineageRecord, RunnerError> {
        let component = find(&config.component).ok_or_else(|| RunnerError::UnknownComponent(config.component.clone()))?;
        let descriptor = component.descriptor()?;
        info!("task {}: binding `{}` as {} ({})",
              config.task_id,
              config.component,
              config.role,
              config.stage);

        let mut io = Binder::new(&descriptor, &self.registry).strict_config(self.strict_config)
                                                             .bind(config)?;
        let args = io.take_arguments().ok_or(RunnerError::ArgumentsTaken)?;
        let ctx = RunContext { task_id: config.task_id.clone(),
                               stage: config.stage,
                               role: config.role };
        component.run(&ctx, args)?;

        let lineage = io.dump();
        info!("task {}: finished, lineage fingerprint {}", config.task_id, lineage.fingerprint()?);
        Ok(lineage)
    }
}

/// Destino del linaje: `--lineage` explícito, si no
/// `<lineage_dir>/<task_id>.lineage.json`, si no ninguno (se imprime).
pub fn lineage_path(explicit: Option<PathBuf>, settings: &Settings, task_id: &str) -> Option<PathBuf> {
    explicit.or_else(|| {
                settings.lineage_dir
                        .as_ref()
                        .map(|dir| dir.join(format!("{task_id}.lineage.json")))
            })
}
