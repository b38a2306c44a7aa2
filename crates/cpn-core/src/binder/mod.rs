//! Binder de E/S de una ejecución.
//!
//! Recorre la lista de argumentos declarados (o una firma explícita) y, para
//! cada nombre, despacha sobre su `ArgumentKind`:
//!
//! - parámetro: valor suministrado o default, validado contra su tipo;
//! - entrada: uno o varios readers según la cardinalidad, `Absent` si es
//!   opcional y no hay apply spec;
//! - salida: un writer inmediato (`single`) o un `WriterGenerator` perezoso
//!   sobre una URI plantilla (`multi`).
//!
//! Cualquier error aborta el binding completo; nunca se devuelve un mapping
//! parcial. El resultado (`ExecutionIo`) conserva los registros de cada
//! artifact para volcar el linaje al terminar.

mod arguments;

pub use arguments::{BoundValue, TaskArguments};

use std::collections::HashSet;
use std::sync::Arc;

use indexmap::IndexMap;
use log::{debug, warn};
use serde_json::Value;

use crate::accessor::{ArtifactCollection, ArtifactReader, ArtifactWriter, WriterGenerator};
use crate::config::{ArtifactApply, ArtifactApplySpec, TaskConfig};
use crate::constants::RESERVED_ARGUMENTS;
use crate::descriptor::{ArgumentKind, ComponentDescriptor};
use crate::errors::BindError;
use crate::model::{ArtifactCategory, ArtifactDescriptor, ArtifactRecord, Role, SharedRecord, Stage, Uri};
use crate::registry::{ArtifactHandler, ArtifactRegistry};
use crate::storage::Storage;

/// Registro(s) de linaje de un artifact ligado.
#[derive(Debug, Clone)]
pub(crate) enum LineageSlot {
    Single(SharedRecord),
    Multi(ArtifactCollection),
}

#[derive(Debug, Clone)]
pub(crate) struct BoundArtifact {
    pub(crate) category: ArtifactCategory,
    pub(crate) slot: LineageSlot,
}

/// Identidad del task que produce las salidas; se sella en el linaje.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TaskIdentity {
    pub(crate) task_id: String,
    pub(crate) party_task_id: String,
    pub(crate) task_name: String,
    pub(crate) component: String,
}

/// Resultado de un binding: argumentos para el cuerpo del task y mapas
/// internos de parámetros/entradas/salidas para el linaje.
#[derive(Debug)]
pub struct ExecutionIo {
    pub(crate) task: TaskIdentity,
    stage: Stage,
    role: Role,
    parameters: IndexMap<String, Value>,
    pub(crate) inputs: IndexMap<String, BoundArtifact>,
    pub(crate) outputs: IndexMap<String, BoundArtifact>,
    arguments: Option<TaskArguments>,
}

impl ExecutionIo {
    /// Entrega los argumentos al cuerpo del task. Sólo la primera llamada
    /// devuelve `Some`.
    pub fn take_arguments(&mut self) -> Option<TaskArguments> {
        self.arguments.take()
    }

    pub fn parameters(&self) -> &IndexMap<String, Value> {
        &self.parameters
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn component(&self) -> &str {
        &self.task.component
    }

    /// Nombres de entradas ligadas (las opcionales ausentes no aparecen).
    pub fn input_names(&self) -> impl Iterator<Item = &str> {
        self.inputs.keys().map(String::as_str)
    }

    pub fn output_names(&self) -> impl Iterator<Item = &str> {
        self.outputs.keys().map(String::as_str)
    }
}

struct Resolved {
    uri: Uri,
    handler: Arc<dyn ArtifactHandler>,
    storage: Arc<dyn Storage>,
}

#[derive(Debug, Clone, Copy)]
pub struct Binder<'a> {
    descriptor: &'a ComponentDescriptor,
    registry: &'a ArtifactRegistry,
    strict_config: bool,
}

impl<'a> Binder<'a> {
    pub fn new(descriptor: &'a ComponentDescriptor, registry: &'a ArtifactRegistry) -> Self {
        Self { descriptor,
               registry,
               strict_config: false }
    }

    /// En modo estricto un apply spec que no corresponde a ningún artifact
    /// declarado es un error en vez de un aviso.
    pub fn strict_config(mut self, strict: bool) -> Self {
        self.strict_config = strict;
        self
    }

    /// Liga la lista declarada vigente para `(stage, role)` de la config.
    pub fn bind(&self, config: &TaskConfig) -> Result<ExecutionIo, BindError> {
        let names = self.descriptor.arguments_for(config.stage, config.role);
        self.bind_names(config, &names)
    }

    /// Liga una firma explícita. Los nombres reservados iniciales (`ctx`,
    /// `role`) se saltan; un nombre no declarado o un artifact inactivo para
    /// `(stage, role)` falla con `UnresolvedArgument`; un nombre repetido, con
    /// `ArtifactApplyError`.
    pub fn bind_arguments(&self, config: &TaskConfig, args: &[&str]) -> Result<ExecutionIo, BindError> {
        let skip = args.iter().take_while(|a| RESERVED_ARGUMENTS.iter().any(|r| r == *a)).count();
        let names = &args[skip..];
        let mut seen = HashSet::with_capacity(names.len());
        if let Some(dup) = names.iter().find(|n| !seen.insert(**n)) {
            return Err(BindError::apply(dup, "signature", "argument listed more than once"));
        }
        self.bind_names(config, names)
    }

    fn bind_names(&self, config: &TaskConfig, names: &[&str]) -> Result<ExecutionIo, BindError> {
        let (stage, role) = (config.stage, config.role);
        if !self.descriptor.supports_role(role) {
            return Err(BindError::UnsupportedRole { component: self.descriptor.name().to_string(),
                                                    role: role.to_string() });
        }
        if config.component != self.descriptor.name() {
            warn!("config names component `{}` but binding `{}`", config.component, self.descriptor.name());
        }
        self.log_inactive(config);

        let mut parameters = IndexMap::new();
        let mut inputs = IndexMap::new();
        let mut outputs = IndexMap::new();
        let mut arguments = TaskArguments::default();

        for &name in names {
            let kind = self.descriptor
                           .get(name)
                           .filter(|k| k.is_active_for(stage, role))
                           .ok_or_else(|| BindError::UnresolvedArgument { name: name.to_string() })?;
            match kind {
                ArgumentKind::Parameter(p) => {
                    let value = p.apply(config.parameters.get(name))
                                 .map_err(|cause| BindError::ParameterError { name: name.to_string(),
                                                                              cause })?;
                    debug!("parameter `{name}` = {value}");
                    parameters.insert(name.to_string(), value.clone());
                    arguments.insert(name, BoundValue::Parameter(value));
                }
                ArgumentKind::Input(a) => {
                    let (value, slot) = self.bind_input(a, config.input_artifacts.get(name))?;
                    if let Some(slot) = slot {
                        inputs.insert(name.to_string(), BoundArtifact { category: a.category, slot });
                    }
                    arguments.insert(name, value);
                }
                ArgumentKind::Output(a) => {
                    let (value, slot) = self.bind_output(a, config.output_artifacts.get(name))?;
                    if let Some(slot) = slot {
                        outputs.insert(name.to_string(), BoundArtifact { category: a.category, slot });
                    }
                    arguments.insert(name, value);
                }
            }
        }

        self.check_unused(config, names)?;

        Ok(ExecutionIo { task: TaskIdentity { task_id: config.task_id.clone(),
                                              party_task_id: config.party_task_id.clone(),
                                              task_name: config.task_name().to_string(),
                                              component: self.descriptor.name().to_string() },
                         stage,
                         role,
                         parameters,
                         inputs,
                         outputs,
                         arguments: Some(arguments) })
    }

    fn log_inactive(&self, config: &TaskConfig) {
        for a in self.descriptor.inputs().chain(self.descriptor.outputs()) {
            if !a.is_active_for(config.stage, config.role) {
                debug!("artifact `{}` ({}) inactive for stage={} role={}, skipped",
                       a.name,
                       a.kind_tag(),
                       config.stage,
                       config.role);
            }
        }
    }

    fn resolve(&self, a: &ArtifactDescriptor, spec: &ArtifactApplySpec, location: &str) -> Result<Resolved, BindError> {
        let tag = a.kind_tag();
        let requested = a.select_type(spec.type_name.as_deref(), &self.registry.type_names(a.category))
                         .map_err(|cause| BindError::apply(&a.name, &tag, cause))?;
        let handler = self.registry
                          .handler_for(a.category, requested)
                          .map_err(|cause| BindError::apply(&a.name, &tag, cause))?;
        let uri = Uri::parse(location).map_err(|cause| BindError::apply(&a.name, &tag, cause))?;
        let storage = self.registry
                          .storage_for(&uri)
                          .map_err(|cause| BindError::apply(&a.name, &tag, cause))?;
        Ok(Resolved { uri, handler, storage })
    }

    fn open_reader(&self, a: &ArtifactDescriptor, spec: &ArtifactApplySpec) -> Result<(ArtifactReader, SharedRecord), BindError> {
        let Resolved { uri, handler, storage } = self.resolve(a, spec, &spec.uri)?;
        let record = ArtifactRecord::new(&uri.to_string(), handler.type_name(), spec.metadata.clone()).shared();
        let reader = ArtifactReader::new(&a.name, uri, record.clone(), handler, storage);
        Ok((reader, record))
    }

    fn bind_input(&self, a: &ArtifactDescriptor, apply: Option<&ArtifactApply>) -> Result<(BoundValue, Option<LineageSlot>), BindError> {
        let tag = a.kind_tag();
        let Some(apply) = apply else {
            if a.optional {
                debug!("optional input `{}` ({tag}) not supplied, bound as absent", a.name);
                return Ok((BoundValue::Absent, None));
            }
            return Err(BindError::MissingRequiredArtifact { name: a.name.clone(),
                                                            descriptor: tag });
        };

        match (a.is_multi(), apply) {
            (true, ArtifactApply::Multi(specs)) => {
                let collection = ArtifactCollection::new();
                let mut readers = Vec::with_capacity(specs.len());
                for spec in specs {
                    let (reader, record) = self.open_reader(a, spec)?;
                    collection.push(record);
                    readers.push(reader);
                }
                debug!("input `{}` ({tag}) bound to {} readers", a.name, readers.len());
                Ok((BoundValue::Readers(readers), Some(LineageSlot::Multi(collection))))
            }
            (false, ArtifactApply::Single(spec)) => {
                let (reader, record) = self.open_reader(a, spec)?;
                debug!("input `{}` ({tag}) bound to {}", a.name, reader.uri());
                Ok((BoundValue::Reader(reader), Some(LineageSlot::Single(record))))
            }
            (true, ArtifactApply::Single(_)) => {
                Err(BindError::apply(&a.name, &tag, "multi input expects a list of apply specs"))
            }
            (false, ArtifactApply::Multi(_)) => {
                Err(BindError::apply(&a.name, &tag, "single input expects one apply spec, got a list"))
            }
        }
    }

    fn bind_output(&self, a: &ArtifactDescriptor, apply: Option<&ArtifactApply>) -> Result<(BoundValue, Option<LineageSlot>), BindError> {
        let tag = a.kind_tag();
        let spec = match apply {
            Some(ArtifactApply::Single(spec)) => spec,
            Some(ArtifactApply::Multi(_)) => {
                return Err(BindError::apply(&a.name, &tag, "output expects one apply spec, got a list"));
            }
            None if a.optional => {
                debug!("optional output `{}` ({tag}) not supplied, bound as absent", a.name);
                return Ok((BoundValue::Absent, None));
            }
            None => {
                return Err(BindError::MissingRequiredArtifact { name: a.name.clone(),
                                                                descriptor: tag });
            }
        };

        if a.is_multi() {
            if !spec.is_template() {
                return Err(BindError::apply(&a.name, &tag, "template uri required for multi output"));
            }
            let first = Uri::render_template(&spec.uri, 0);
            let Resolved { handler, storage, .. } = self.resolve(a, spec, &first)?;
            let collection = ArtifactCollection::new();
            let generator = WriterGenerator::new(&a.name,
                                                 &spec.uri,
                                                 spec.metadata.clone(),
                                                 handler,
                                                 storage,
                                                 collection.clone());
            debug!("output `{}` ({tag}) bound to generator over {}", a.name, spec.uri);
            Ok((BoundValue::Writers(generator), Some(LineageSlot::Multi(collection))))
        } else {
            if spec.is_template() {
                return Err(BindError::apply(&a.name, &tag, "template uri not supported for single output"));
            }
            let Resolved { uri, handler, storage } = self.resolve(a, spec, &spec.uri)?;
            let record = ArtifactRecord::new(&uri.to_string(), handler.type_name(), spec.metadata.clone()).shared();
            debug!("output `{}` ({tag}) bound to {uri}", a.name);
            let writer = ArtifactWriter::new(&a.name, uri, None, record.clone(), handler, storage);
            Ok((BoundValue::Writer(writer), Some(LineageSlot::Single(record))))
        }
    }

    /// Apply specs que no corresponden a ningún artifact declarado: aviso, o
    /// error en modo estricto. Los de artifacts declarados pero no ligados en
    /// esta ejecución (inactivos o fuera de la firma) sólo se registran en debug.
    fn check_unused(&self, config: &TaskConfig, names: &[&str]) -> Result<(), BindError> {
        let walked: HashSet<&str> = names.iter().copied().collect();
        let sections = [("input", config.input_artifacts.keys()), ("output", config.output_artifacts.keys())];
        for (section, keys) in sections {
            for key in keys {
                let declared = matches!((section, self.descriptor.get(key)),
                                        ("input", Some(ArgumentKind::Input(_))) | ("output", Some(ArgumentKind::Output(_))));
                if declared {
                    if !walked.contains(key.as_str()) {
                        debug!("{section} apply spec `{key}` not bound in this execution, ignored");
                    }
                    continue;
                }
                if self.strict_config {
                    return Err(BindError::apply(key, section, "apply spec matches no declared artifact"));
                }
                warn!("{section} apply spec `{key}` matches no declared artifact of `{}`, ignored",
                      self.descriptor.name());
            }
        }
        for key in config.parameters.keys() {
            if !matches!(self.descriptor.get(key), Some(ArgumentKind::Parameter(_))) {
                warn!("parameter `{key}` is not declared by `{}`, ignored", self.descriptor.name());
            }
        }
        Ok(())
    }
}
