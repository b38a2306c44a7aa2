//! Modelos neutrales del binding: roles/stages, URIs, descriptores de
//! artifact, predicados de activación y registros de linaje por artifact.

pub mod activation;
pub mod artifact;
pub mod record;
pub mod role;
pub mod uri;

pub use activation::Activation;
pub use artifact::{ArtifactCategory, ArtifactDescriptor, Cardinality, Direction};
pub use record::{lock_record, ArtifactMetadata, ArtifactRecord, SharedRecord, SourceStamp, WriteProvenance};
pub use role::{Role, Stage};
pub use uri::Uri;
