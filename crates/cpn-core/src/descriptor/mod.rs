//! Descriptor de componente: la firma declarativa de un tipo de task.
//!
//! Cada argumento declarado se clasifica una sola vez, al construir el
//! descriptor, como parámetro, entrada o salida (`ArgumentKind`). El binder
//! despacha sobre esa etiqueta cerrada; nunca adivina el tipo de un nombre en
//! tiempo de resolución.

mod builder;
mod parameter;

pub use builder::ComponentDescriptorBuilder;
pub use parameter::{ParameterDescriptor, ParameterType};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::{Activation, ArtifactDescriptor, Cardinality, Role, Stage};

/// Clasificación estática de un argumento declarado.
#[derive(Debug, Clone)]
pub enum ArgumentKind {
    Parameter(ParameterDescriptor),
    Input(ArtifactDescriptor),
    Output(ArtifactDescriptor),
}

impl ArgumentKind {
    pub fn name(&self) -> &str {
        match self {
            ArgumentKind::Parameter(p) => &p.name,
            ArgumentKind::Input(a) | ArgumentKind::Output(a) => &a.name,
        }
    }

    /// `parameter`, `input:data`, `output:metric`, ...
    pub fn tag(&self) -> String {
        match self {
            ArgumentKind::Parameter(_) => "parameter".to_string(),
            ArgumentKind::Input(a) | ArgumentKind::Output(a) => a.kind_tag(),
        }
    }

    /// Los parámetros están siempre activos.
    pub fn is_active_for(&self, stage: Stage, role: Role) -> bool {
        match self {
            ArgumentKind::Parameter(_) => true,
            ArgumentKind::Input(a) | ArgumentKind::Output(a) => a.is_active_for(stage, role),
        }
    }

    pub fn artifact(&self) -> Option<&ArtifactDescriptor> {
        match self {
            ArgumentKind::Parameter(_) => None,
            ArgumentKind::Input(a) | ArgumentKind::Output(a) => Some(a),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ComponentDescriptor {
    pub(crate) name: String,
    pub(crate) version: String,
    pub(crate) description: Option<String>,
    pub(crate) roles: Vec<Role>,
    pub(crate) arguments: IndexMap<String, ArgumentKind>,
}

impl ComponentDescriptor {
    pub fn builder(name: &str) -> ComponentDescriptorBuilder {
        ComponentDescriptorBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    pub fn supports_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn get(&self, name: &str) -> Option<&ArgumentKind> {
        self.arguments.get(name)
    }

    /// Argumentos en orden de declaración.
    pub fn arguments(&self) -> impl Iterator<Item = &ArgumentKind> {
        self.arguments.values()
    }

    pub fn inputs(&self) -> impl Iterator<Item = &ArtifactDescriptor> {
        self.arguments.values().filter_map(|a| match a {
                                   ArgumentKind::Input(d) => Some(d),
                                   _ => None,
                               })
    }

    pub fn outputs(&self) -> impl Iterator<Item = &ArtifactDescriptor> {
        self.arguments.values().filter_map(|a| match a {
                                   ArgumentKind::Output(d) => Some(d),
                                   _ => None,
                               })
    }

    /// Nombres de argumentos vigentes para `(stage, role)`, en orden de
    /// declaración; los artifacts inactivos quedan fuera.
    pub fn arguments_for(&self, stage: Stage, role: Role) -> Vec<&str> {
        self.arguments
            .values()
            .filter(|a| a.is_active_for(stage, role))
            .map(ArgumentKind::name)
            .collect()
    }

    pub fn describe(&self) -> DescriptorSummary {
        let arguments = self.arguments.values().map(ArgumentSummary::from_kind).collect();
        DescriptorSummary { component: self.name.clone(),
                            version: self.version.clone(),
                            description: self.description.clone(),
                            roles: self.roles.clone(),
                            arguments }
    }
}

/// Vista serializable de un descriptor (`cpnflow describe`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescriptorSummary {
    pub component: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub roles: Vec<Role>,
    pub arguments: Vec<ArgumentSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArgumentSummary {
    pub name: String,
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cardinality: Option<Cardinality>,
    pub optional: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter_type: Option<ParameterType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Roles/stages de activación; vacío = cualquiera.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub active_roles: Vec<Role>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub active_stages: Vec<Stage>,
    /// `true` cuando la activación es un predicado arbitrario.
    #[serde(default)]
    pub custom_activation: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ArgumentSummary {
    fn from_kind(kind: &ArgumentKind) -> Self {
        match kind {
            ArgumentKind::Parameter(p) => Self { name: p.name.clone(),
                                                 kind: kind.tag(),
                                                 cardinality: None,
                                                 optional: p.optional || p.default.is_some(),
                                                 types: Vec::new(),
                                                 parameter_type: Some(p.ty.clone()),
                                                 default: p.default.clone(),
                                                 active_roles: Vec::new(),
                                                 active_stages: Vec::new(),
                                                 custom_activation: false,
                                                 description: p.description.clone() },
            ArgumentKind::Input(a) | ArgumentKind::Output(a) => {
                let (active_roles, active_stages, custom_activation) = match &a.activation {
                    Activation::Always => (Vec::new(), Vec::new(), false),
                    Activation::Matrix { roles, stages } => (roles.clone(), stages.clone(), false),
                    Activation::Predicate(_) => (Vec::new(), Vec::new(), true),
                };
                Self { name: a.name.clone(),
                       kind: kind.tag(),
                       cardinality: Some(a.cardinality),
                       optional: a.optional,
                       types: a.type_names.clone(),
                       parameter_type: None,
                       default: None,
                       active_roles,
                       active_stages,
                       custom_activation,
                       description: a.description.clone() }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> ComponentDescriptor {
        ComponentDescriptor::builder("evaluation").roles([Role::Guest, Role::Host])
                                                  .parameter(ParameterDescriptor::new("eval_type", ParameterType::String).default_value(json!("binary")))
                                                  .input(ArtifactDescriptor::data_input("input_data"))
                                                  .input(ArtifactDescriptor::model_input("warm_start").optional().stages([Stage::Train]))
                                                  .output(ArtifactDescriptor::metric_output("output_metric").roles([Role::Guest]))
                                                  .build()
                                                  .expect("valid descriptor")
    }

    #[test]
    fn arguments_for_filters_inactive_artifacts() {
        let d = sample();
        assert_eq!(d.arguments_for(Stage::Train, Role::Guest),
                   vec!["eval_type", "input_data", "warm_start", "output_metric"]);
        assert_eq!(d.arguments_for(Stage::Predict, Role::Host), vec!["eval_type", "input_data"]);
    }

    #[test]
    fn tags_follow_declaration() {
        let d = sample();
        let tags: Vec<String> = d.arguments().map(ArgumentKind::tag).collect();
        assert_eq!(tags, vec!["parameter", "input:data", "input:model", "output:metric"]);
        assert_eq!(d.inputs().count(), 2);
        assert_eq!(d.outputs().count(), 1);
    }

    #[test]
    fn describe_is_serializable_and_keeps_order() {
        let summary = sample().describe();
        let v = serde_json::to_value(&summary).unwrap();
        assert_eq!(v["component"], "evaluation");
        assert_eq!(v["arguments"][0]["name"], "eval_type");
        assert_eq!(v["arguments"][0]["default"], "binary");
        assert_eq!(v["arguments"][2]["active_stages"], json!(["train"]));
        assert_eq!(v["arguments"][3]["active_roles"], json!(["guest"]));
        let back: DescriptorSummary = serde_json::from_value(v).unwrap();
        assert_eq!(back, summary);
    }
}
