//! Errores del core de binding.
//!
//! `BindError` es la taxonomía completa que un task puede ver. Ninguna
//! variante se reintenta localmente: todas abortan la ejecución y llevan el
//! nombre del argumento, el descriptor y la causa para diagnosticar sin
//! re-ejecutar.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fallos de la capacidad de almacenamiento (esquemas `mem://`, `file://`, ...)
/// y de los codecs de artifacts.
#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum StorageError {
    #[error("unsupported uri scheme `{0}`")]
    UnsupportedScheme(String),
    #[error("resource not found: {0}")]
    NotFound(String),
    #[error("io: {0}")]
    Io(String),
    #[error("codec: {0}")]
    Codec(String),
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(err.to_string()),
            _ => Self::Io(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::Codec(err.to_string())
    }
}

#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum BindError {
    #[error("artifact `{name}` ({descriptor}) is required but no apply spec was supplied")]
    MissingRequiredArtifact { name: String, descriptor: String },

    #[error("apply artifact `{name}` ({descriptor}) failed: {cause}")]
    ArtifactApplyError { name: String, descriptor: String, cause: String },

    #[error("argument `{name}` not provided: it matches no parameter or active artifact")]
    UnresolvedArgument { name: String },

    #[error("parameter `{name}` rejected: {cause}")]
    ParameterError { name: String, cause: String },

    #[error("accessor for `{uri}` already consumed")]
    UseAfterConsumed { uri: String },

    #[error("read `{uri}` failed: {source}")]
    ResourceReadError {
        uri: String,
        #[source]
        source: StorageError,
    },

    #[error("write `{uri}` failed: {source}")]
    ResourceWriteError {
        uri: String,
        #[source]
        source: StorageError,
    },

    #[error("stale writer cursor for `{name}`: expected index {expected}, got {found}")]
    StaleCursor { name: String, expected: usize, found: usize },

    #[error("argument `{name}` is bound as {found}, not {expected}")]
    ArgumentKindMismatch { name: String, expected: String, found: String },

    #[error("component `{component}` does not run as role `{role}`")]
    UnsupportedRole { component: String, role: String },

    #[error("invalid component descriptor `{component}`: {cause}")]
    InvalidDescriptor { component: String, cause: String },

    #[error("invalid uri `{uri}`: {cause}")]
    InvalidUri { uri: String, cause: String },

    #[error("lineage: {0}")]
    Lineage(String),
}

impl BindError {
    /// Construye un `ArtifactApplyError` a partir de cualquier causa mostrable.
    pub fn apply(name: &str, descriptor: &str, cause: impl std::fmt::Display) -> Self {
        Self::ArtifactApplyError { name: name.to_string(),
                                   descriptor: descriptor.to_string(),
                                   cause: cause.to_string() }
    }

    /// Nombre del argumento implicado, cuando el error lo identifica.
    pub fn argument(&self) -> Option<&str> {
        match self {
            Self::MissingRequiredArtifact { name, .. }
            | Self::ArtifactApplyError { name, .. }
            | Self::UnresolvedArgument { name }
            | Self::ParameterError { name, .. }
            | Self::StaleCursor { name, .. }
            | Self::ArgumentKindMismatch { name, .. } => Some(name),
            _ => None,
        }
    }
}
