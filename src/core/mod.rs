//! core
//!
//! Core domain types, schemas, and operations for polyres.
//!
//! # Modules
//!
//! - [`types`] - Strong types: ResourceKey, LocaleTag, ScaleQualifier, etc.
//! - [`metadata`] - Resource metadata schema and persistence
//! - [`merge`] - Precedence-ordered merging of metadata fragments
//! - [`config`] - Configuration schema and loading
//! - [`paths`] - Output locations of a pass
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid states at compile time
//! - Schemas are strict and self-describing
//! - Merging is deterministic: identical inputs give identical output

pub mod config;
pub mod merge;
pub mod metadata;
pub mod paths;
pub mod types;
