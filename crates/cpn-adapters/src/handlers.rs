//! Codecs concretos de artifacts.
//!
//! Una tabla es un array JSON de objetos (una fila por objeto) y se guarda
//! como JSON lines. Modelos y métricas son documentos JSON legibles; una
//! métrica debe ser un objeto.

use cpn_core::{ArtifactHandler, StorageError};
use serde_json::Value;

#[derive(Debug, Clone, Copy, Default)]
pub struct TableHandler;

impl ArtifactHandler for TableHandler {
    fn type_name(&self) -> &str {
        "table"
    }

    fn file_format(&self) -> &str {
        "jsonl"
    }

    fn encode(&self, payload: &Value) -> Result<Vec<u8>, StorageError> {
        let rows = payload.as_array()
                          .ok_or_else(|| StorageError::Codec("table payload must be an array of rows".into()))?;
        let mut out = Vec::new();
        for (i, row) in rows.iter().enumerate() {
            if !row.is_object() {
                return Err(StorageError::Codec(format!("table row {i} is not an object")));
            }
            serde_json::to_writer(&mut out, row)?;
            out.push(b'\n');
        }
        Ok(out)
    }

    fn decode(&self, bytes: &[u8]) -> Result<Value, StorageError> {
        let text = std::str::from_utf8(bytes).map_err(|e| StorageError::Codec(e.to_string()))?;
        let mut rows = Vec::new();
        for (n, line) in text.lines().enumerate().filter(|(_, l)| !l.trim().is_empty()) {
            let row: Value = serde_json::from_str(line).map_err(|e| StorageError::Codec(format!("line {}: {e}", n + 1)))?;
            if !row.is_object() {
                return Err(StorageError::Codec(format!("line {}: row is not an object", n + 1)));
            }
            rows.push(row);
        }
        Ok(Value::Array(rows))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonModelHandler;

impl ArtifactHandler for JsonModelHandler {
    fn type_name(&self) -> &str {
        "json_model"
    }

    fn file_format(&self) -> &str {
        "json"
    }

    fn encode(&self, payload: &Value) -> Result<Vec<u8>, StorageError> {
        Ok(serde_json::to_vec_pretty(payload)?)
    }

    fn decode(&self, bytes: &[u8]) -> Result<Value, StorageError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonMetricHandler;

impl ArtifactHandler for JsonMetricHandler {
    fn type_name(&self) -> &str {
        "json_metric"
    }

    fn file_format(&self) -> &str {
        "json"
    }

    fn encode(&self, payload: &Value) -> Result<Vec<u8>, StorageError> {
        if !payload.is_object() {
            return Err(StorageError::Codec("metric payload must be an object".into()));
        }
        Ok(serde_json::to_vec_pretty(payload)?)
    }

    fn decode(&self, bytes: &[u8]) -> Result<Value, StorageError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
