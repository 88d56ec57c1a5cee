//! platform::nop
//!
//! Generators for platforms with nothing to write.

use std::path::PathBuf;

use super::{ContainerGenerator, GenerateError, ResourceGenerator};
use crate::core::metadata::ObjectMetadata;

/// Accepts any entries and writes nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NopGenerator;

impl<T> ResourceGenerator<T> for NopGenerator {
    fn generate(&self, _entries: &[T]) -> Result<Vec<PathBuf>, GenerateError> {
        Ok(Vec::new())
    }
}

impl ContainerGenerator for NopGenerator {
    fn generate(&self, _objects: &[&ObjectMetadata]) -> Result<Vec<PathBuf>, GenerateError> {
        Ok(Vec::new())
    }
}
