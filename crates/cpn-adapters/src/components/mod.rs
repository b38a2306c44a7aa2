//! Componentes de demostración y su catálogo.
//!
//! Cada componente expone su `ComponentDescriptor` y un cuerpo que recibe
//! los argumentos ya ligados. El cuerpo no sabe de dónde vienen los readers
//! ni a dónde van los writers.

mod data_split;
mod evaluation;
mod union;

pub use data_split::DataSplit;
pub use evaluation::Evaluation;
pub use union::Union;

use std::collections::BTreeSet;

use cpn_core::{BindError, ComponentDescriptor, Role, Stage, TaskArguments};
use serde_json::{Map, Value};

use crate::error::ComponentError;

/// Lo que el cuerpo de un componente ve de la ejecución además de sus
/// argumentos (las posiciones reservadas `ctx` y `role`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    pub task_id: String,
    pub stage: Stage,
    pub role: Role,
}

pub trait Component: Send + Sync {
    fn name(&self) -> &'static str;
    fn descriptor(&self) -> Result<ComponentDescriptor, BindError>;
    fn run(&self, ctx: &RunContext, args: TaskArguments) -> Result<(), ComponentError>;
}

/// Componentes conocidos, en orden alfabético.
pub fn catalog() -> Vec<Box<dyn Component>> {
    vec![Box::new(DataSplit), Box::new(Evaluation), Box::new(Union)]
}

pub fn find(name: &str) -> Option<Box<dyn Component>> {
    catalog().into_iter().find(|c| c.name() == name)
}

/// Filas de una tabla decodificada.
pub(crate) fn rows(component: &str, table: Value) -> Result<Vec<Map<String, Value>>, ComponentError> {
    let Value::Array(items) = table else {
        return Err(ComponentError::failed(component, "table payload is not an array"));
    };
    items.into_iter()
         .enumerate()
         .map(|(i, row)| match row {
             Value::Object(map) => Ok(map),
             _ => Err(ComponentError::failed(component, format!("row {i} is not an object"))),
         })
         .collect()
}

/// Conjunto de columnas presentes en alguna fila.
pub(crate) fn columns(rows: &[Map<String, Value>]) -> BTreeSet<String> {
    rows.iter().flat_map(|r| r.keys().cloned()).collect()
}

pub(crate) fn table(rows: Vec<Map<String, Value>>) -> Value {
    Value::Array(rows.into_iter().map(Value::Object).collect())
}
