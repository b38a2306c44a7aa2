//! Apply specs: la ubicación concreta y metadata que el runtime enlaza a un
//! nombre de artifact para una ejecución.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::model::Uri;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactApplySpec {
    pub uri: String,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    /// Tipo concreto pedido (`table`, `json_model`, ...). Sin él se usa el
    /// tipo por defecto del descriptor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
}

impl ArtifactApplySpec {
    pub fn new(uri: &str) -> Self {
        Self { uri: uri.to_string(),
               metadata: Map::new(),
               type_name: None }
    }

    pub fn with_metadata(mut self, key: &str, value: Value) -> Self {
        self.metadata.insert(key.to_string(), value);
        self
    }

    pub fn with_type(mut self, type_name: &str) -> Self {
        self.type_name = Some(type_name.to_string());
        self
    }

    pub fn is_template(&self) -> bool {
        Uri::is_template(&self.uri)
    }
}

/// Entrada de `input_artifacts`/`output_artifacts`: un spec o una lista.
///
/// En JSON un objeto es `Single` y un array es `Multi`. La coherencia con la
/// cardinalidad declarada la valida el binder, no el deserializador.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArtifactApply {
    Single(ArtifactApplySpec),
    Multi(Vec<ArtifactApplySpec>),
}

impl ArtifactApply {
    pub fn shape(&self) -> &'static str {
        match self {
            ArtifactApply::Single(_) => "single",
            ArtifactApply::Multi(_) => "multi",
        }
    }
}

impl From<ArtifactApplySpec> for ArtifactApply {
    fn from(spec: ArtifactApplySpec) -> Self {
        ArtifactApply::Single(spec)
    }
}

impl From<Vec<ArtifactApplySpec>> for ArtifactApply {
    fn from(specs: Vec<ArtifactApplySpec>) -> Self {
        ArtifactApply::Multi(specs)
    }
}
