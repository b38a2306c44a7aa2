//! `data_split`: reparte las filas de una tabla en `parts` tablas por
//! round-robin. Las salidas se materializan con el generador de writers, una
//! por parte, sobre la plantilla `{index}`. `parts` va de 1 a `MAX_PARTS`.

use cpn_core::{ArtifactDescriptor, BindError, ComponentDescriptor, ParameterDescriptor, ParameterType, Role, TaskArguments};
use log::info;
use serde_json::{json, Map, Value};

use super::{rows, table, Component, RunContext};
use crate::error::ComponentError;

const NAME: &str = "data_split";

/// Tope de partes por ejecución; cada parte es un artifact escrito.
const MAX_PARTS: usize = 1024;

#[derive(Debug, Clone, Copy, Default)]
pub struct DataSplit;

impl Component for DataSplit {
    fn name(&self) -> &'static str {
        NAME
    }

    fn descriptor(&self) -> Result<ComponentDescriptor, BindError> {
        ComponentDescriptor::builder(NAME).description("split a table into round-robin parts")
                                          .roles([Role::Guest, Role::Host, Role::Local])
                                          .parameter(ParameterDescriptor::new("parts", ParameterType::Int).default_value(json!(2)))
                                          .input(ArtifactDescriptor::data_input("input_data").types(["table"]))
                                          .output(ArtifactDescriptor::data_output("output_data").multi().types(["table"]))
                                          .build()
    }

    fn run(&self, ctx: &RunContext, mut args: TaskArguments) -> Result<(), ComponentError> {
        let parts: usize = args.param_as("parts")
                               .map_err(|_| ComponentError::failed(NAME, "parts must be a positive integer"))?;
        if parts == 0 {
            return Err(ComponentError::failed(NAME, "parts must be a positive integer"));
        }
        if parts > MAX_PARTS {
            return Err(ComponentError::failed(NAME, format!("parts must be at most {MAX_PARTS}, got {parts}")));
        }
        let input = rows(NAME, args.take_reader("input_data")?.read()?)?;
        let total = input.len();
        let buckets = split(input, parts);

        let writers = args.take_writers("output_data")?;
        for (writer, bucket) in writers.iter().zip(buckets) {
            let writer = writer?;
            let mut meta = Map::new();
            meta.insert("part".into(), json!(writer.index()));
            meta.insert("row_count".into(), json!(bucket.len()));
            writer.write(&table(bucket), Some(meta))?;
        }
        info!("task {} ({}): split {total} rows into {parts} parts", ctx.task_id, ctx.role);
        Ok(())
    }
}

fn split(input: Vec<Map<String, Value>>, parts: usize) -> Vec<Vec<Map<String, Value>>> {
    let mut buckets = vec![Vec::new(); parts];
    for (i, row) in input.into_iter().enumerate() {
        buckets[i % parts].push(row);
    }
    buckets
}
