//! Declaración de parámetros de un componente y su aplicación en runtime.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "values", rename_all = "snake_case")]
pub enum ParameterType {
    Bool,
    Int,
    Float,
    String,
    /// Cualquier JSON.
    Json,
    /// Uno de un conjunto cerrado de strings.
    Choice(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDescriptor {
    pub name: String,
    pub ty: ParameterType,
    pub default: Option<Value>,
    pub optional: bool,
    pub description: Option<String>,
}

impl ParameterDescriptor {
    pub fn new(name: &str, ty: ParameterType) -> Self {
        Self { name: name.to_string(),
               ty,
               default: None,
               optional: false,
               description: None }
    }

    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn description(mut self, text: &str) -> Self {
        self.description = Some(text.to_string());
        self
    }

    /// Aplica el valor suministrado (o el default). `null` cuenta como ausente.
    ///
    /// - valor presente: se valida contra `ty` (un entero se acepta como float);
    /// - ausente con default: el default;
    /// - ausente y opcional: `null`;
    /// - ausente y requerido: error.
    pub fn apply(&self, supplied: Option<&Value>) -> Result<Value, String> {
        match supplied {
            Some(v) if !v.is_null() => self.check(v),
            _ => match (&self.default, self.optional) {
                (Some(d), _) => Ok(d.clone()),
                (None, true) => Ok(Value::Null),
                (None, false) => Err("required parameter not supplied and has no default".into()),
            },
        }
    }

    /// Valida `v` contra el tipo declarado y devuelve el valor normalizado.
    pub fn check(&self, v: &Value) -> Result<Value, String> {
        let ok = match &self.ty {
            ParameterType::Bool => v.is_boolean(),
            ParameterType::Int => v.is_i64() || v.is_u64(),
            ParameterType::Float => v.is_number(),
            ParameterType::String => v.is_string(),
            ParameterType::Json => true,
            ParameterType::Choice(options) => v.as_str().map(|s| options.iter().any(|o| o == s)).unwrap_or(false),
        };
        if !ok {
            return Err(format!("expected {}, got {v}", self.type_label()));
        }
        match (&self.ty, v.as_f64()) {
            (ParameterType::Float, Some(f)) if !v.is_f64() => Ok(Value::from(f)),
            _ => Ok(v.clone()),
        }
    }

    fn type_label(&self) -> String {
        match &self.ty {
            ParameterType::Bool => "bool".into(),
            ParameterType::Int => "int".into(),
            ParameterType::Float => "float".into(),
            ParameterType::String => "string".into(),
            ParameterType::Json => "json".into(),
            ParameterType::Choice(options) => format!("one of [{}]", options.join(", ")),
        }
    }
}
