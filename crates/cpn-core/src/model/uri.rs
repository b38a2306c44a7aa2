//! Ubicación opaca de un recurso.
//!
//! Sólo se interpretan dos cosas: el prefijo `scheme://` (para elegir el
//! backend de `Storage`) y la presencia del marcador `{index}` en las URIs
//! plantilla de salidas `multi`. El resto es opaco y se entrega tal cual al
//! backend.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{DEFAULT_SCHEME, INDEX_PLACEHOLDER};
use crate::errors::BindError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Uri {
    scheme: String,
    path: String,
}

impl Uri {
    /// Parsea `scheme://path`. Sin prefijo se asume `file`.
    pub fn parse(raw: &str) -> Result<Self, BindError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(BindError::InvalidUri { uri: raw.to_string(),
                                               cause: "empty location".into() });
        }
        let (scheme, path) = match raw.split_once("://") {
            Some((scheme, path)) => (scheme, path),
            None => (DEFAULT_SCHEME, raw),
        };
        if scheme.is_empty() || !scheme.chars().all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '-' || c == '.') {
            return Err(BindError::InvalidUri { uri: raw.to_string(),
                                               cause: format!("bad scheme `{scheme}`") });
        }
        if path.is_empty() {
            return Err(BindError::InvalidUri { uri: raw.to_string(),
                                               cause: "empty path".into() });
        }
        Ok(Self { scheme: scheme.to_ascii_lowercase(),
                  path: path.to_string() })
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// `true` si la ubicación contiene el marcador de índice.
    pub fn is_template(raw: &str) -> bool {
        raw.contains(INDEX_PLACEHOLDER)
    }

    /// Sustituye cada `{index}` de la plantilla por `index`.
    pub fn render_template(template: &str, index: usize) -> String {
        template.replace(INDEX_PLACEHOLDER, &index.to_string())
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.scheme, self.path)
    }
}

impl TryFrom<String> for Uri {
    type Error = BindError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Uri::parse(&value)
    }
}

impl From<Uri> for String {
    fn from(value: Uri) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_splits_scheme_and_path() {
        let u = Uri::parse("mem://bucket/a").unwrap();
        assert_eq!(u.scheme(), "mem");
        assert_eq!(u.path(), "bucket/a");
        assert_eq!(u.to_string(), "mem://bucket/a");
    }

    #[test]
    fn bare_path_defaults_to_file_scheme() {
        let u = Uri::parse("/tmp/x.json").unwrap();
        assert_eq!(u.scheme(), "file");
        assert_eq!(u.path(), "/tmp/x.json");
    }

    #[test]
    fn rejects_empty_and_bad_scheme() {
        assert!(matches!(Uri::parse("  "), Err(BindError::InvalidUri { .. })));
        assert!(matches!(Uri::parse("me m://x"), Err(BindError::InvalidUri { .. })));
        assert!(matches!(Uri::parse("mem://"), Err(BindError::InvalidUri { .. })));
    }

    #[test]
    fn template_detection_and_rendering() {
        assert!(Uri::is_template("mem://out-{index}"));
        assert!(!Uri::is_template("mem://out-0"));
        assert_eq!(Uri::render_template("mem://out-{index}/p{index}", 7), "mem://out-7/p7");
    }
}
