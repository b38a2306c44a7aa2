//! Descriptor estático de un slot de artifact.
//!
//! Un `ArtifactDescriptor` se define una vez por tipo de task y se comparte
//! (sólo lectura) entre todas sus ejecuciones. Describe la categoría, la
//! dirección, la cardinalidad, la opcionalidad, los tipos concretos aceptados
//! y el predicado de activación.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Activation, Role, Stage};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactCategory {
    Data,
    Model,
    Metric,
}

impl ArtifactCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactCategory::Data => "data",
            ArtifactCategory::Model => "model",
            ArtifactCategory::Metric => "metric",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Input,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cardinality {
    Single,
    Multi,
}

impl fmt::Display for ArtifactCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct ArtifactDescriptor {
    pub name: String,
    pub category: ArtifactCategory,
    pub direction: Direction,
    pub cardinality: Cardinality,
    pub optional: bool,
    /// Tipos concretos aceptados (p. ej. `table`, `json_model`). Vacío = cualquiera
    /// registrado para la categoría; el primero es el tipo por defecto.
    pub type_names: Vec<String>,
    pub description: Option<String>,
    pub activation: Activation,
}

impl ArtifactDescriptor {
    pub fn new(name: &str, category: ArtifactCategory, direction: Direction) -> Self {
        Self { name: name.to_string(),
               category,
               direction,
               cardinality: Cardinality::Single,
               optional: false,
               type_names: Vec::new(),
               description: None,
               activation: Activation::Always }
    }

    pub fn data_input(name: &str) -> Self {
        Self::new(name, ArtifactCategory::Data, Direction::Input)
    }

    pub fn model_input(name: &str) -> Self {
        Self::new(name, ArtifactCategory::Model, Direction::Input)
    }

    pub fn data_output(name: &str) -> Self {
        Self::new(name, ArtifactCategory::Data, Direction::Output)
    }

    pub fn model_output(name: &str) -> Self {
        Self::new(name, ArtifactCategory::Model, Direction::Output)
    }

    pub fn metric_output(name: &str) -> Self {
        Self::new(name, ArtifactCategory::Metric, Direction::Output)
    }

    pub fn multi(mut self) -> Self {
        self.cardinality = Cardinality::Multi;
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn types<I, S>(mut self, type_names: I) -> Self
        where I: IntoIterator<Item = S>,
              S: Into<String>
    {
        self.type_names = type_names.into_iter().map(Into::into).collect();
        self
    }

    pub fn description(mut self, text: &str) -> Self {
        self.description = Some(text.to_string());
        self
    }

    pub fn roles(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        self.activation = self.activation.with_roles(roles);
        self
    }

    pub fn stages(mut self, stages: impl IntoIterator<Item = Stage>) -> Self {
        self.activation = self.activation.with_stages(stages);
        self
    }

    pub fn activation(mut self, activation: Activation) -> Self {
        self.activation = activation;
        self
    }

    pub fn is_multi(&self) -> bool {
        self.cardinality == Cardinality::Multi
    }

    pub fn is_active_for(&self, stage: Stage, role: Role) -> bool {
        self.activation.is_active(stage, role)
    }

    /// Etiqueta de tipo de argumento: `input:data`, `output:metric`, ...
    pub fn kind_tag(&self) -> String {
        let dir = match self.direction {
            Direction::Input => "input",
            Direction::Output => "output",
        };
        format!("{dir}:{}", self.category)
    }

    /// Elige el tipo concreto para una ejecución. `requested` viene del apply
    /// spec; si el descriptor restringe tipos debe ser uno de ellos. Sin
    /// petición se toma el primer tipo aceptado que esté en `registered`.
    pub fn select_type<'a>(&'a self, requested: Option<&'a str>, registered: &[&str]) -> Result<Option<&'a str>, String> {
        match requested {
            Some(t) if self.type_names.is_empty() || self.type_names.iter().any(|n| n == t) => Ok(Some(t)),
            Some(t) => Err(format!("type `{t}` not accepted, expected one of [{}]", self.type_names.join(", "))),
            None if self.type_names.is_empty() => Ok(None),
            None => self.type_names
                        .iter()
                        .find(|n| registered.contains(&n.as_str()))
                        .map(|n| Some(n.as_str()))
                        .ok_or_else(|| format!("none of the accepted types [{}] is registered", self.type_names.join(", "))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_tag_reflects_direction_and_category() {
        assert_eq!(ArtifactDescriptor::data_input("x").kind_tag(), "input:data");
        assert_eq!(ArtifactDescriptor::model_input("x").kind_tag(), "input:model");
        assert_eq!(ArtifactDescriptor::metric_output("x").kind_tag(), "output:metric");
    }

    #[test]
    fn select_type_honours_restrictions() {
        let registered = ["json", "table"];
        let d = ArtifactDescriptor::data_input("x").types(["table", "json"]);
        assert_eq!(d.select_type(None, &registered).unwrap(), Some("table"));
        assert_eq!(d.select_type(Some("json"), &registered).unwrap(), Some("json"));
        assert!(d.select_type(Some("csv"), &registered).is_err());

        let open = ArtifactDescriptor::data_input("y");
        assert_eq!(open.select_type(None, &registered).unwrap(), None);
        assert_eq!(open.select_type(Some("csv"), &registered).unwrap(), Some("csv"));
    }

    #[test]
    fn select_type_skips_unregistered_accepted_types() {
        let d = ArtifactDescriptor::data_input("x").types(["parquet", "table"]);
        assert_eq!(d.select_type(None, &["json", "table"]).unwrap(), Some("table"));
        let err = d.select_type(None, &["json"]).unwrap_err();
        assert_eq!(err, "none of the accepted types [parquet, table] is registered");
    }

    #[test]
    fn roles_then_stages_build_matrix() {
        let d = ArtifactDescriptor::model_output("m").roles([Role::Guest]).stages([Stage::Train]);
        assert!(d.is_active_for(Stage::Train, Role::Guest));
        assert!(!d.is_active_for(Stage::Predict, Role::Guest));
        assert!(!d.is_active_for(Stage::Train, Role::Host));
    }
}
