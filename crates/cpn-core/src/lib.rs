//! cpn-core: resolución de artifacts y binding de E/S de componentes.
pub mod accessor;
pub mod binder;
pub mod config;
pub mod constants;
pub mod descriptor;
pub mod errors;
pub mod hashing;
pub mod lineage;
pub mod model;
pub mod registry;
pub mod storage;

pub use accessor::{ArtifactCollection, ArtifactReader, ArtifactWriter, WriterCursor, WriterGenerator};
pub use binder::{Binder, BoundValue, ExecutionIo, TaskArguments};
pub use config::{ArtifactApply, ArtifactApplySpec, TaskConfig};
pub use descriptor::{ArgumentKind, ComponentDescriptor, DescriptorSummary, ParameterDescriptor, ParameterType};
pub use errors::{BindError, StorageError};
pub use lineage::{LineageEntry, LineageRecord};
pub use model::{Activation, ArtifactCategory, ArtifactDescriptor, ArtifactRecord, Cardinality, Role, Stage, Uri};
pub use registry::{ArtifactHandler, ArtifactRegistry, JsonHandler};
pub use storage::{InMemoryStorage, Storage, StorageRegistry};
