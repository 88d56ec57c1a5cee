//! core::metadata
//!
//! Resource metadata schema and persistence.
//!
//! # Modules
//!
//! - [`schema`] - Metadata schema types (v1)
//! - [`store`] - Artifact persistence between passes
//!
//! # Architecture
//!
//! Metadata is the only channel between a common pass and the platform
//! passes that link against it. Each pass writes exactly one artifact;
//! later passes read zero or more of them as opaque, versioned input.
//!
//! # Schema Design
//!
//! - Self-describing: includes `kind` and `schema_version`
//! - Fingerprinted: the container tree is hashed on write, verified on read
//! - Strict parsing: unknown fields are rejected

pub mod schema;
pub mod store;

pub use schema::{
    parse_artifact, ColorMetadata, ColorValue, ContainerMetadata, ImageFormat, ImageMetadata,
    ImageSource, MetadataArtifact, MetadataError, NamespaceMetadata, ObjectKind, ObjectMetadata,
    PluralForms, PluralMetadata, Quantity, ResourceMetadata, ResourceType, StringMetadata,
    Visibility, METADATA_KIND, SCHEMA_VERSION,
};
pub use store::{read_artifact, read_artifacts, write_artifact, StoreError};
