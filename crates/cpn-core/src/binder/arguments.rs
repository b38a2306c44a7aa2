//! Mapping plano nombre -> valor ligado que recibe el cuerpo del task.

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::accessor::{ArtifactReader, ArtifactWriter, WriterGenerator};
use crate::errors::BindError;

#[derive(Debug)]
pub enum BoundValue {
    Parameter(Value),
    Reader(ArtifactReader),
    Readers(Vec<ArtifactReader>),
    Writer(ArtifactWriter),
    Writers(WriterGenerator),
    /// Artifact opcional sin apply spec.
    Absent,
}

impl BoundValue {
    pub fn kind(&self) -> &'static str {
        match self {
            BoundValue::Parameter(_) => "parameter",
            BoundValue::Reader(_) => "reader",
            BoundValue::Readers(_) => "readers",
            BoundValue::Writer(_) => "writer",
            BoundValue::Writers(_) => "writers",
            BoundValue::Absent => "absent",
        }
    }
}

/// Argumentos ligados de una ejecución. Los parámetros se consultan por
/// referencia; readers y writers se extraen (`take_*`) una sola vez.
#[derive(Debug, Default)]
pub struct TaskArguments {
    values: IndexMap<String, Option<BoundValue>>,
}

impl TaskArguments {
    pub(crate) fn insert(&mut self, name: &str, value: BoundValue) {
        self.values.insert(name.to_string(), Some(value));
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Clase del valor ligado (`reader`, `writers`, ...); `taken` si ya se extrajo.
    pub fn kind_of(&self, name: &str) -> Option<&'static str> {
        self.values.get(name).map(|v| v.as_ref().map(BoundValue::kind).unwrap_or("taken"))
    }

    pub fn param(&self, name: &str) -> Result<&Value, BindError> {
        match self.values.get(name) {
            Some(Some(BoundValue::Parameter(v))) => Ok(v),
            Some(other) => Err(mismatch(name, "parameter", other.as_ref())),
            None => Err(unresolved(name)),
        }
    }

    /// Deserializa el parámetro a `T`.
    pub fn param_as<T: DeserializeOwned>(&self, name: &str) -> Result<T, BindError> {
        let value = self.param(name)?;
        T::deserialize(value).map_err(|e| BindError::ParameterError { name: name.to_string(),
                                                                      cause: e.to_string() })
    }

    fn take(&mut self, name: &str, expected: &str, accepts: fn(&BoundValue) -> bool) -> Result<BoundValue, BindError> {
        let slot = self.values.get_mut(name).ok_or_else(|| unresolved(name))?;
        if !slot.as_ref().is_some_and(accepts) {
            return Err(mismatch(name, expected, slot.as_ref()));
        }
        slot.take().ok_or_else(|| unresolved(name))
    }

    pub fn take_reader(&mut self, name: &str) -> Result<ArtifactReader, BindError> {
        match self.take(name, "reader", |v| matches!(v, BoundValue::Reader(_)))? {
            BoundValue::Reader(r) => Ok(r),
            other => Err(mismatch(name, "reader", Some(&other))),
        }
    }

    pub fn take_optional_reader(&mut self, name: &str) -> Result<Option<ArtifactReader>, BindError> {
        match self.take(name, "reader", |v| matches!(v, BoundValue::Reader(_) | BoundValue::Absent))? {
            BoundValue::Reader(r) => Ok(Some(r)),
            BoundValue::Absent => Ok(None),
            other => Err(mismatch(name, "reader", Some(&other))),
        }
    }

    /// Readers de una entrada `multi`, en orden. Una entrada opcional ausente
    /// da una lista vacía.
    pub fn take_readers(&mut self, name: &str) -> Result<Vec<ArtifactReader>, BindError> {
        match self.take(name, "readers", |v| matches!(v, BoundValue::Readers(_) | BoundValue::Absent))? {
            BoundValue::Readers(rs) => Ok(rs),
            BoundValue::Absent => Ok(Vec::new()),
            other => Err(mismatch(name, "readers", Some(&other))),
        }
    }

    pub fn take_writer(&mut self, name: &str) -> Result<ArtifactWriter, BindError> {
        match self.take(name, "writer", |v| matches!(v, BoundValue::Writer(_)))? {
            BoundValue::Writer(w) => Ok(w),
            other => Err(mismatch(name, "writer", Some(&other))),
        }
    }

    pub fn take_optional_writer(&mut self, name: &str) -> Result<Option<ArtifactWriter>, BindError> {
        match self.take(name, "writer", |v| matches!(v, BoundValue::Writer(_) | BoundValue::Absent))? {
            BoundValue::Writer(w) => Ok(Some(w)),
            BoundValue::Absent => Ok(None),
            other => Err(mismatch(name, "writer", Some(&other))),
        }
    }

    pub fn take_writers(&mut self, name: &str) -> Result<WriterGenerator, BindError> {
        match self.take(name, "writers", |v| matches!(v, BoundValue::Writers(_)))? {
            BoundValue::Writers(g) => Ok(g),
            other => Err(mismatch(name, "writers", Some(&other))),
        }
    }

    pub fn take_optional_writers(&mut self, name: &str) -> Result<Option<WriterGenerator>, BindError> {
        match self.take(name, "writers", |v| matches!(v, BoundValue::Writers(_) | BoundValue::Absent))? {
            BoundValue::Writers(g) => Ok(Some(g)),
            BoundValue::Absent => Ok(None),
            other => Err(mismatch(name, "writers", Some(&other))),
        }
    }
}

fn unresolved(name: &str) -> BindError {
    BindError::UnresolvedArgument { name: name.to_string() }
}

fn mismatch(name: &str, expected: &str, found: Option<&BoundValue>) -> BindError {
    BindError::ArgumentKindMismatch { name: name.to_string(),
                                      expected: expected.to_string(),
                                      found: found.map(BoundValue::kind).unwrap_or("taken").to_string() }
}
