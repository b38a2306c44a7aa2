//! Configuración central del host.
//! Carga variables de entorno (.env) una vez y expone `SETTINGS`, inmutable.
//!
//! - `CPNFLOW_STORAGE_ROOT`: base de las URIs `file://` relativas (default `.`).
//! - `CPNFLOW_LINEAGE_DIR`: dónde persistir el linaje si no se pasa `--lineage`.
//! - `CPNFLOW_STRICT_CONFIG`: `true`/`1` rechaza apply specs sin artifact.

use std::env;
use std::path::PathBuf;

use dotenvy::dotenv;
use once_cell::sync::Lazy;

// Carga perezosa del archivo .env una sola vez.
static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenv(); // ignora error si no existe .env
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub storage_root: PathBuf,
    pub lineage_dir: Option<PathBuf>,
    pub strict_config: bool,
}

/// Settings globales, evaluados en el primer acceso.
pub static SETTINGS: Lazy<Settings> = Lazy::new(Settings::from_env);

impl Settings {
    pub fn from_env() -> Self {
        Lazy::force(&DOTENV_LOADED);
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Construye settings a partir de una función de búsqueda de variables;
    /// vacío cuenta como ausente.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self { storage_root: get("CPNFLOW_STORAGE_ROOT").map(PathBuf::from).unwrap_or_else(|| PathBuf::from(".")),
               lineage_dir: get("CPNFLOW_LINEAGE_DIR").map(PathBuf::from),
               strict_config: get("CPNFLOW_STRICT_CONFIG").is_some_and(|v| parse_flag(&v)) }
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

/// Forzar carga temprana de .env desde el binario.
pub fn init_dotenv() {
    Lazy::force(&DOTENV_LOADED);
}
