//! Volcado de linaje a partir de un `ExecutionIo`.

use log::{debug, warn};

use super::{LineageEntry, LineageRecord};
use crate::binder::{BoundArtifact, ExecutionIo, LineageSlot, TaskIdentity};
use crate::model::{lock_record, ArtifactRecord, SourceStamp};

impl ExecutionIo {
    /// Serializa los registros resueltos de cada entrada y salida ligada.
    ///
    /// Las salidas reciben un sello de origen (`source`) con el task y el
    /// nombre del argumento; en salidas `multi` también la posición. Los
    /// writers materializados y nunca escritos se registran con
    /// `consumed: false` y un aviso.
    pub fn dump(&self) -> LineageRecord {
        let mut lineage = LineageRecord::default();

        for (name, bound) in &self.inputs {
            match lineage.inputs.section_mut(bound.category) {
                Some(section) => {
                    section.insert(name.clone(), input_entry(bound));
                }
                // el builder rechaza entradas `metric`
                None => warn!("input `{name}` has category {} with no lineage section", bound.category),
            }
        }

        for (name, bound) in &self.outputs {
            let entry = output_entry(&self.task, name, bound);
            for r in entry.records().into_iter().filter(|r| !r.consumed) {
                warn!("output `{name}` at {} was bound but never written", r.uri);
            }
            lineage.outputs.section_mut(bound.category).insert(name.clone(), entry);
        }

        debug!("lineage of task {} dumped: {} inputs, {} outputs",
               self.task.task_id,
               self.inputs.len(),
               self.outputs.len());
        lineage
    }
}

fn input_entry(bound: &BoundArtifact) -> LineageEntry {
    match &bound.slot {
        LineageSlot::Single(record) => LineageEntry::Single(lock_record(record).clone()),
        LineageSlot::Multi(collection) => LineageEntry::Multi(collection.snapshot()),
    }
}

fn output_entry(task: &TaskIdentity, name: &str, bound: &BoundArtifact) -> LineageEntry {
    let stamp = |mut record: ArtifactRecord, index: Option<usize>| {
        record.metadata.source = Some(SourceStamp { task_id: task.task_id.clone(),
                                                    party_task_id: task.party_task_id.clone(),
                                                    task_name: task.task_name.clone(),
                                                    component: task.component.clone(),
                                                    output_artifact_key: name.to_string(),
                                                    output_index: index });
        record
    };
    match &bound.slot {
        LineageSlot::Single(record) => LineageEntry::Single(stamp(lock_record(record).clone(), None)),
        LineageSlot::Multi(collection) => LineageEntry::Multi(collection.snapshot()
                                                                        .into_iter()
                                                                        .enumerate()
                                                                        .map(|(i, r)| stamp(r, Some(i)))
                                                                        .collect()),
    }
}
