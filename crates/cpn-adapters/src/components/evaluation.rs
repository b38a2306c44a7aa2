//! `evaluation`: métricas sobre una tabla con columnas `label` y
//! `predict_score`.
//!
//! - `binary`: AUC (por rangos, empates promediados) y accuracy con umbral 0.5.
//! - `regression`: MSE, MAE y RMSE.

use cpn_core::{ArtifactDescriptor, BindError, ComponentDescriptor, ParameterDescriptor, ParameterType, Role, TaskArguments};
use log::info;
use serde_json::{json, Map, Value};

use super::{rows, Component, RunContext};
use crate::error::ComponentError;

const NAME: &str = "evaluation";

#[derive(Debug, Clone, Copy, Default)]
pub struct Evaluation;

impl Component for Evaluation {
    fn name(&self) -> &'static str {
        NAME
    }

    fn descriptor(&self) -> Result<ComponentDescriptor, BindError> {
        let eval_type = ParameterType::Choice(vec!["binary".into(), "regression".into()]);
        ComponentDescriptor::builder(NAME).description("evaluate predictions against labels")
                                          .roles([Role::Guest, Role::Host, Role::Arbiter])
                                          .parameter(ParameterDescriptor::new("eval_type", eval_type).default_value(json!("binary")))
                                          .input(ArtifactDescriptor::data_input("input_data").types(["table"]))
                                          .output(ArtifactDescriptor::metric_output("output_metric").types(["json_metric"]))
                                          .build()
    }

    fn run(&self, ctx: &RunContext, mut args: TaskArguments) -> Result<(), ComponentError> {
        let eval_type: String = args.param_as("eval_type")?;
        let data = rows(NAME, args.take_reader("input_data")?.read()?)?;
        let pairs = label_score_pairs(&data)?;
        let metrics = match eval_type.as_str() {
            "binary" => binary_metrics(&pairs),
            _ => regression_metrics(&pairs),
        };
        let mut meta = Map::new();
        meta.insert("eval_type".into(), json!(eval_type));
        args.take_writer("output_metric")?.write(&metrics, Some(meta))?;
        info!("task {} ({}): {eval_type} evaluation over {} rows", ctx.task_id, ctx.role, pairs.len());
        Ok(())
    }
}

fn label_score_pairs(data: &[Map<String, Value>]) -> Result<Vec<(f64, f64)>, ComponentError> {
    data.iter()
        .enumerate()
        .map(|(i, row)| -> Result<(f64, f64), ComponentError> {
            let field = |key: &str| {
                row.get(key)
                   .and_then(Value::as_f64)
                   .ok_or_else(|| ComponentError::failed(NAME, format!("row {i}: `{key}` missing or not numeric")))
            };
            Ok((field("label")?, field("predict_score")?))
        })
        .collect()
}

fn binary_metrics(pairs: &[(f64, f64)]) -> Value {
    let correct = pairs.iter()
                       .filter(|(label, score)| (*score >= 0.5) == (*label >= 0.5))
                       .count();
    let accuracy = if pairs.is_empty() { Value::Null } else { json!(correct as f64 / pairs.len() as f64) };
    json!({"auc": auc(pairs).map_or(Value::Null, Value::from), "accuracy": accuracy, "count": pairs.len()})
}

/// AUC por suma de rangos (Mann-Whitney). `None` si falta alguna clase.
fn auc(pairs: &[(f64, f64)]) -> Option<f64> {
    let mut sorted: Vec<(f64, bool)> = pairs.iter().map(|(l, s)| (*s, *l >= 0.5)).collect();
    sorted.sort_by(|a, b| a.0.total_cmp(&b.0));
    let positives = sorted.iter().filter(|(_, p)| *p).count();
    let negatives = sorted.len() - positives;
    if positives == 0 || negatives == 0 {
        return None;
    }

    let mut rank_sum = 0.0;
    let mut i = 0;
    while i < sorted.len() {
        let mut j = i;
        while j + 1 < sorted.len() && sorted[j + 1].0 == sorted[i].0 {
            j += 1;
        }
        // rangos 1-based, empates reciben el promedio
        let avg_rank = (i + j) as f64 / 2.0 + 1.0;
        rank_sum += avg_rank * sorted[i..=j].iter().filter(|(_, p)| *p).count() as f64;
        i = j + 1;
    }
    let (p, n) = (positives as f64, negatives as f64);
    Some((rank_sum - p * (p + 1.0) / 2.0) / (p * n))
}

fn regression_metrics(pairs: &[(f64, f64)]) -> Value {
    if pairs.is_empty() {
        return json!({"mse": null, "mae": null, "rmse": null, "count": 0});
    }
    let n = pairs.len() as f64;
    let mse = pairs.iter().map(|(l, s)| (l - s).powi(2)).sum::<f64>() / n;
    let mae = pairs.iter().map(|(l, s)| (l - s).abs()).sum::<f64>() / n;
    json!({"mse": mse, "mae": mae, "rmse": mse.sqrt(), "count": pairs.len()})
}
