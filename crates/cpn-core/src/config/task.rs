//! `TaskConfig`: lo que el runtime entrega a una ejecución concreta.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::{ArtifactApply, ArtifactApplySpec};
use crate::model::{Role, Stage};

fn generate_task_id() -> String {
    Uuid::new_v4().to_string()
}

fn default_stage() -> Stage {
    Stage::Default
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskConfig {
    #[serde(default = "generate_task_id")]
    pub task_id: String,
    #[serde(default)]
    pub party_task_id: String,
    #[serde(default)]
    pub task_name: String,
    pub component: String,
    pub role: Role,
    #[serde(default)]
    pub party_id: String,
    #[serde(default = "default_stage")]
    pub stage: Stage,
    #[serde(default)]
    pub parameters: IndexMap<String, Value>,
    #[serde(default)]
    pub input_artifacts: IndexMap<String, ArtifactApply>,
    #[serde(default)]
    pub output_artifacts: IndexMap<String, ArtifactApply>,
}

impl TaskConfig {
    pub fn new(component: &str, role: Role, stage: Stage) -> Self {
        Self { task_id: generate_task_id(),
               party_task_id: String::new(),
               task_name: component.to_string(),
               component: component.to_string(),
               role,
               party_id: String::new(),
               stage,
               parameters: IndexMap::new(),
               input_artifacts: IndexMap::new(),
               output_artifacts: IndexMap::new() }
    }

    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Nombre del task; sin `task_name` explícito es el del componente.
    pub fn task_name(&self) -> &str {
        if self.task_name.is_empty() {
            &self.component
        } else {
            &self.task_name
        }
    }

    pub fn with_task_id(mut self, task_id: &str) -> Self {
        self.task_id = task_id.to_string();
        self
    }

    pub fn with_party(mut self, party_id: &str, party_task_id: &str) -> Self {
        self.party_id = party_id.to_string();
        self.party_task_id = party_task_id.to_string();
        self
    }

    pub fn with_parameter(mut self, name: &str, value: Value) -> Self {
        self.parameters.insert(name.to_string(), value);
        self
    }

    pub fn with_input(mut self, name: &str, spec: ArtifactApplySpec) -> Self {
        self.input_artifacts.insert(name.to_string(), ArtifactApply::Single(spec));
        self
    }

    pub fn with_inputs(mut self, name: &str, specs: Vec<ArtifactApplySpec>) -> Self {
        self.input_artifacts.insert(name.to_string(), ArtifactApply::Multi(specs));
        self
    }

    pub fn with_output(mut self, name: &str, spec: ArtifactApplySpec) -> Self {
        self.output_artifacts.insert(name.to_string(), ArtifactApply::Single(spec));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_json_fills_defaults() {
        let cfg = TaskConfig::from_json_str(r#"{"component": "union", "role": "guest"}"#).unwrap();
        assert_eq!(cfg.stage, Stage::Default);
        assert!(Uuid::parse_str(&cfg.task_id).is_ok());
        assert!(cfg.parameters.is_empty());
        assert!(cfg.input_artifacts.is_empty());
        assert_eq!(cfg.task_name(), "union");
        assert_eq!(cfg.task_name(), TaskConfig::new("union", Role::Guest, Stage::Default).task_name());
    }

    #[test]
    fn full_json_keeps_artifact_order() {
        let raw = r#"{
            "task_id": "t-1",
            "component": "union",
            "role": "host",
            "stage": "train",
            "parameters": {"axis": 0},
            "input_artifacts": {
                "input_data_list": [{"uri": "mem://b"}, {"uri": "mem://a"}]
            },
            "output_artifacts": {"output_data": {"uri": "mem://out"}}
        }"#;
        let cfg = TaskConfig::from_json_str(raw).unwrap();
        assert_eq!(cfg.task_id, "t-1");
        assert_eq!(cfg.role, Role::Host);
        assert_eq!(cfg.stage, Stage::Train);
        match &cfg.input_artifacts["input_data_list"] {
            ArtifactApply::Multi(specs) => {
                let uris: Vec<&str> = specs.iter().map(|s| s.uri.as_str()).collect();
                assert_eq!(uris, vec!["mem://b", "mem://a"]);
            }
            other => panic!("expected multi, got {other:?}"),
        }
    }

    #[test]
    fn unknown_role_is_rejected() {
        assert!(TaskConfig::from_json_str(r#"{"component": "c", "role": "observer"}"#).is_err());
    }
}
