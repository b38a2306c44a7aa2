use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::constants::LINEAGE_VERSION;
use crate::errors::BindError;
use crate::hashing::hash_value;
use crate::model::{ArtifactCategory, ArtifactRecord};

/// Entrada de un nombre: un registro (`single`) o un array en orden de
/// colección (`multi`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LineageEntry {
    Single(ArtifactRecord),
    Multi(Vec<ArtifactRecord>),
}

impl LineageEntry {
    /// Registros de la entrada en orden.
    pub fn records(&self) -> Vec<&ArtifactRecord> {
        match self {
            LineageEntry::Single(r) => vec![r],
            LineageEntry::Multi(rs) => rs.iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputLineage {
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub data: IndexMap<String, LineageEntry>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub model: IndexMap<String, LineageEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputLineage {
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub data: IndexMap<String, LineageEntry>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub model: IndexMap<String, LineageEntry>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub metric: IndexMap<String, LineageEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineageRecord {
    #[serde(default)]
    pub inputs: InputLineage,
    #[serde(default)]
    pub outputs: OutputLineage,
}

/// Insumos del fingerprint: versión del formato + registro.
#[derive(Serialize)]
struct LineageFingerprintInput<'a> {
    lineage_version: &'a str,
    record: &'a LineageRecord,
}

impl InputLineage {
    pub(crate) fn section_mut(&mut self, category: ArtifactCategory) -> Option<&mut IndexMap<String, LineageEntry>> {
        match category {
            ArtifactCategory::Data => Some(&mut self.data),
            ArtifactCategory::Model => Some(&mut self.model),
            ArtifactCategory::Metric => None,
        }
    }
}

impl OutputLineage {
    pub(crate) fn section_mut(&mut self, category: ArtifactCategory) -> &mut IndexMap<String, LineageEntry> {
        match category {
            ArtifactCategory::Data => &mut self.data,
            ArtifactCategory::Model => &mut self.model,
            ArtifactCategory::Metric => &mut self.metric,
        }
    }
}

impl LineageRecord {
    pub fn input(&self, category: ArtifactCategory, name: &str) -> Option<&LineageEntry> {
        match category {
            ArtifactCategory::Data => self.inputs.data.get(name),
            ArtifactCategory::Model => self.inputs.model.get(name),
            ArtifactCategory::Metric => None,
        }
    }

    pub fn output(&self, category: ArtifactCategory, name: &str) -> Option<&LineageEntry> {
        match category {
            ArtifactCategory::Data => self.outputs.data.get(name),
            ArtifactCategory::Model => self.outputs.model.get(name),
            ArtifactCategory::Metric => self.outputs.metric.get(name),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == LineageRecord::default()
    }

    pub fn to_json_pretty(&self) -> Result<String, BindError> {
        serde_json::to_string_pretty(self).map_err(|e| BindError::Lineage(e.to_string()))
    }

    /// BLAKE3 sobre el JSON canónico del registro y la versión del formato.
    pub fn fingerprint(&self) -> Result<String, BindError> {
        let input = LineageFingerprintInput { lineage_version: LINEAGE_VERSION,
                                              record: self };
        let value = serde_json::to_value(&input).map_err(|e| BindError::Lineage(e.to_string()))?;
        Ok(hash_value(&value))
    }

    /// Persiste el registro como JSON legible. Escribe en un temporal junto
    /// al destino y lo renombra; crea los directorios padre.
    pub fn save(&self, path: &Path) -> Result<(), BindError> {
        let io = |e: std::io::Error| BindError::Lineage(format!("{}: {e}", path.display()));
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io)?;
        }
        let body = self.to_json_pretty()?;
        let tmp = temp_path(path);
        let mut file = fs::File::create(&tmp).map_err(io)?;
        file.write_all(body.as_bytes()).map_err(io)?;
        file.sync_all().map_err(io)?;
        fs::rename(&tmp, path).map_err(io)
    }

    pub fn load(path: &Path) -> Result<Self, BindError> {
        let raw = fs::read_to_string(path).map_err(|e| BindError::Lineage(format!("{}: {e}", path.display())))?;
        serde_json::from_str(&raw).map_err(|e| BindError::Lineage(format!("{}: {e}", path.display())))
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map};

    fn record() -> LineageRecord {
        let mut lineage = LineageRecord::default();
        lineage.inputs
               .data
               .insert("train".into(), LineageEntry::Single(ArtifactRecord::new("mem://a", "json", Map::new())));
        lineage
    }

    #[test]
    fn empty_sections_are_omitted() {
        let v = serde_json::to_value(record()).unwrap();
        assert_eq!(v["inputs"]["data"]["train"]["uri"], "mem://a");
        assert!(v["inputs"].get("model").is_none());
        assert_eq!(v["outputs"], json!({}));
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let r: LineageRecord = serde_json::from_value(json!({})).unwrap();
        assert!(r.is_empty());
    }

    #[test]
    fn fingerprint_changes_with_content() {
        let a = record();
        let mut b = record();
        assert_eq!(a.fingerprint().unwrap(), b.fingerprint().unwrap());
        b.inputs.model.insert("m".into(), LineageEntry::Multi(vec![]));
        assert_ne!(a.fingerprint().unwrap(), b.fingerprint().unwrap());
    }
}
