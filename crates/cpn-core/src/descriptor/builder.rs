//! Builder validado de `ComponentDescriptor`.
//!
//! La validación ocurre una vez, en `build()`, independiente de cualquier
//! ejecución: nombres únicos y no reservados, al menos un rol, dirección de
//! cada artifact coherente con el método que lo declara, entradas sólo de
//! `data` o `model` y defaults de parámetros bien tipados.

use indexmap::IndexMap;

use super::{ArgumentKind, ComponentDescriptor, ParameterDescriptor};
use crate::constants::RESERVED_ARGUMENTS;
use crate::errors::BindError;
use crate::model::{ArtifactCategory, ArtifactDescriptor, Direction, Role};

#[derive(Debug)]
pub struct ComponentDescriptorBuilder {
    name: String,
    version: String,
    description: Option<String>,
    roles: Vec<Role>,
    arguments: Vec<ArgumentKind>,
}

impl ComponentDescriptorBuilder {
    pub(crate) fn new(name: &str) -> Self {
        Self { name: name.to_string(),
               version: "1.0.0".to_string(),
               description: None,
               roles: Vec::new(),
               arguments: Vec::new() }
    }

    pub fn version(mut self, version: &str) -> Self {
        self.version = version.to_string();
        self
    }

    pub fn description(mut self, text: &str) -> Self {
        self.description = Some(text.to_string());
        self
    }

    pub fn roles(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        for role in roles {
            if !self.roles.contains(&role) {
                self.roles.push(role);
            }
        }
        self
    }

    pub fn parameter(mut self, parameter: ParameterDescriptor) -> Self {
        self.arguments.push(ArgumentKind::Parameter(parameter));
        self
    }

    pub fn input(mut self, artifact: ArtifactDescriptor) -> Self {
        self.arguments.push(ArgumentKind::Input(artifact));
        self
    }

    pub fn output(mut self, artifact: ArtifactDescriptor) -> Self {
        self.arguments.push(ArgumentKind::Output(artifact));
        self
    }

    pub fn build(self) -> Result<ComponentDescriptor, BindError> {
        let invalid = |cause: String| BindError::InvalidDescriptor { component: self.name.clone(),
                                                                     cause };
        if self.name.trim().is_empty() {
            return Err(invalid("component name is empty".into()));
        }
        if self.roles.is_empty() {
            return Err(invalid("at least one role is required".into()));
        }

        let mut arguments = IndexMap::with_capacity(self.arguments.len());
        for arg in &self.arguments {
            let name = arg.name();
            if name.trim().is_empty() {
                return Err(invalid("argument with empty name".into()));
            }
            if RESERVED_ARGUMENTS.iter().any(|r| *r == name) {
                return Err(invalid(format!("argument name `{name}` is reserved")));
            }
            match arg {
                ArgumentKind::Input(a) if a.direction != Direction::Input => {
                    return Err(invalid(format!("`{name}` declared as input but described as {}", a.kind_tag())));
                }
                ArgumentKind::Input(a) if a.category == ArtifactCategory::Metric => {
                    return Err(invalid(format!("`{name}`: metric artifacts can only be outputs")));
                }
                ArgumentKind::Output(a) if a.direction != Direction::Output => {
                    return Err(invalid(format!("`{name}` declared as output but described as {}", a.kind_tag())));
                }
                ArgumentKind::Parameter(p) => {
                    if let Some(default) = &p.default {
                        p.check(default)
                         .map_err(|e| invalid(format!("default of parameter `{name}`: {e}")))?;
                    }
                }
                _ => {}
            }
            if arguments.insert(name.to_string(), arg.clone()).is_some() {
                return Err(invalid(format!("duplicate argument name `{name}`")));
            }
        }

        Ok(ComponentDescriptor { name: self.name.clone(),
                                 version: self.version.clone(),
                                 description: self.description.clone(),
                                 roles: self.roles.clone(),
                                 arguments })
    }
}
