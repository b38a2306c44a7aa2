use cpn_core::BindError;
use thiserror::Error;

/// Fallo de un componente: o del binding/E/S, o de su propia lógica.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ComponentError {
    #[error(transparent)]
    Bind(#[from] BindError),
    #[error("component `{component}` failed: {cause}")]
    Failed { component: String, cause: String },
}

impl ComponentError {
    pub fn failed(component: &str, cause: impl std::fmt::Display) -> Self {
        Self::Failed { component: component.to_string(),
                       cause: cause.to_string() }
    }
}
