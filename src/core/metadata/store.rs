//! core::metadata::store
//!
//! Persistence channel for metadata artifacts.
//!
//! # Invariants
//!
//! - Writes are atomic: the artifact is written to a sibling temp file and
//!   renamed into place, so readers never observe a half-written file
//! - Reads fail fast on corrupt or version-incompatible artifacts; there is
//!   no partial recovery
//! - Multiple artifacts are returned in the order given so callers can
//!   concatenate their containers deterministically

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::schema::{parse_artifact, MetadataArtifact, MetadataError};

/// Errors from artifact persistence.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read metadata artifact '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write metadata artifact '{path}': {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("metadata artifact '{path}' is unusable: {source}")]
    Corrupt {
        path: PathBuf,
        source: MetadataError,
    },
}

/// Write an artifact atomically.
///
/// Creates parent directories if needed.
pub fn write_artifact(path: &Path, artifact: &MetadataArtifact) -> Result<(), StoreError> {
    let write_err = |source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    };

    let contents = artifact.to_json().map_err(|source| StoreError::Corrupt {
        path: path.to_path_buf(),
        source,
    })?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(write_err)?;
    }

    let temp_path = path.with_extension("json.tmp");
    let mut file = fs::File::create(&temp_path).map_err(|source| StoreError::Write {
        path: temp_path.clone(),
        source,
    })?;
    file.write_all(contents.as_bytes())
        .and_then(|()| file.sync_all())
        .map_err(|source| StoreError::Write {
            path: temp_path.clone(),
            source,
        })?;

    fs::rename(&temp_path, path).map_err(write_err)?;
    tracing::debug!(path = %path.display(), "metadata artifact written");
    Ok(())
}

/// Read and validate one artifact.
pub fn read_artifact(path: &Path) -> Result<MetadataArtifact, StoreError> {
    let contents = fs::read_to_string(path).map_err(|source| StoreError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_artifact(&contents).map_err(|source| StoreError::Corrupt {
        path: path.to_path_buf(),
        source,
    })
}

/// Read several artifacts, stopping at the first failure.
pub fn read_artifacts<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<MetadataArtifact>, StoreError> {
    paths
        .iter()
        .map(|path| read_artifact(path.as_ref()))
        .collect()
}
