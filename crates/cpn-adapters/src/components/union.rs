//! `union`: combina varias tablas en una.
//!
//! - `axis = 0`: concatena filas; todas las tablas no vacías deben tener el
//!   mismo conjunto de columnas.
//! - `axis = 1`: une fila a fila por posición; las tablas deben tener el
//!   mismo número de filas y ninguna columna puede repetirse entre tablas.

use cpn_core::{ArtifactDescriptor, BindError, ComponentDescriptor, ParameterDescriptor, ParameterType, Role, TaskArguments};
use log::info;
use serde_json::{json, Map, Value};

use super::{columns, rows, table, Component, RunContext};
use crate::error::ComponentError;

const NAME: &str = "union";

#[derive(Debug, Clone, Copy, Default)]
pub struct Union;

impl Component for Union {
    fn name(&self) -> &'static str {
        NAME
    }

    fn descriptor(&self) -> Result<ComponentDescriptor, BindError> {
        ComponentDescriptor::builder(NAME).description("combine several tables by rows or by columns")
                                          .roles([Role::Guest, Role::Host, Role::Local])
                                          .parameter(ParameterDescriptor::new("axis", ParameterType::Int).default_value(json!(0))
                                                                                                         .description("0 stacks rows, 1 joins columns"))
                                          .input(ArtifactDescriptor::data_input("input_data_list").multi().types(["table"]))
                                          .output(ArtifactDescriptor::data_output("output_data").types(["table"]))
                                          .build()
    }

    fn run(&self, ctx: &RunContext, mut args: TaskArguments) -> Result<(), ComponentError> {
        let axis: i64 = args.param_as("axis")?;
        let mut tables = Vec::new();
        for reader in args.take_readers("input_data_list")? {
            tables.push(rows(NAME, reader.read()?)?);
        }
        let merged = match axis {
            0 => stack_rows(tables)?,
            1 => join_columns(tables)?,
            other => return Err(ComponentError::failed(NAME, format!("axis must be 0 or 1, got {other}"))),
        };
        let row_count = merged.len();
        let mut meta = Map::new();
        meta.insert("row_count".into(), json!(row_count));
        meta.insert("axis".into(), json!(axis));
        args.take_writer("output_data")?.write(&table(merged), Some(meta))?;
        info!("task {} ({}): union produced {row_count} rows", ctx.task_id, ctx.role);
        Ok(())
    }
}

fn stack_rows(tables: Vec<Vec<Map<String, Value>>>) -> Result<Vec<Map<String, Value>>, ComponentError> {
    let mut expected = None;
    let mut out = Vec::new();
    for (i, t) in tables.into_iter().enumerate().filter(|(_, t)| !t.is_empty()) {
        let cols = columns(&t);
        match &expected {
            None => expected = Some(cols),
            Some(first) if *first != cols => {
                return Err(ComponentError::failed(NAME,
                                                  format!("table {i} columns differ: all tables must have the same columns on axis 0")));
            }
            Some(_) => {}
        }
        out.extend(t);
    }
    Ok(out)
}

fn join_columns(tables: Vec<Vec<Map<String, Value>>>) -> Result<Vec<Map<String, Value>>, ComponentError> {
    let mut seen = std::collections::BTreeSet::new();
    for t in &tables {
        let cols = columns(t);
        if let Some(dup) = seen.intersection(&cols).next() {
            return Err(ComponentError::failed(NAME, format!("column name conflict: `{dup}`")));
        }
        seen.extend(cols);
    }
    let Some(height) = tables.first().map(Vec::len) else {
        return Ok(Vec::new());
    };
    if let Some((i, t)) = tables.iter().enumerate().find(|(_, t)| t.len() != height) {
        return Err(ComponentError::failed(NAME, format!("table {i} has {} rows, expected {height}", t.len())));
    }

    let mut out: Vec<Map<String, Value>> = vec![Map::new(); height];
    for t in tables {
        for (row, extra) in out.iter_mut().zip(t) {
            row.extend(extra);
        }
    }
    Ok(out)
}
