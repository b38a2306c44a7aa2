//! cpnflow: host delgado alrededor del motor de binding.
//!
//! - `config`: settings globales desde el entorno / `.env`.
//! - `runner`: carga una `TaskConfig`, liga el componente catalogado, lo
//!   ejecuta y devuelve el registro de linaje.
//!
//! El core (`cpn-core`) no depende de nada de aquí.

pub mod config;
pub mod runner;

pub use config::{Settings, SETTINGS};
pub use runner::{RunnerError, TaskRunner};
