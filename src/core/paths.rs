//! core::paths
//!
//! Centralized routing for the outputs of a pass.
//!
//! # Storage Layout
//!
//! A pass owns four exclusive outputs:
//! - `resources_dir` - native resource files (string tables, drawables, ...)
//! - `assets_dir` - asset catalogs (Apple)
//! - `sources_dir` - the resource holder artifact
//! - `metadata_file` - the serialized metadata of the pass
//!
//! **Hard rule:** every output is cleared before a pass writes anything, so
//! the outputs only ever reflect the current inputs.
//!
//! # Example
//!
//! ```
//! use polyres::core::paths::OutputPaths;
//! use std::path::PathBuf;
//!
//! let paths = OutputPaths::under(PathBuf::from("/build/polyres/iosMain"));
//! assert_eq!(paths.metadata_file, PathBuf::from("/build/polyres/iosMain/metadata.json"));
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Output locations of one pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub resources_dir: PathBuf,
    pub assets_dir: PathBuf,
    pub sources_dir: PathBuf,
    pub metadata_file: PathBuf,
}

impl OutputPaths {
    /// Conventional layout below a single build directory.
    pub fn under(root: PathBuf) -> Self {
        Self {
            resources_dir: root.join("res"),
            assets_dir: root.join("assets"),
            sources_dir: root.join("src"),
            metadata_file: root.join("metadata.json"),
        }
    }

    /// Output directories, in a fixed order.
    pub fn dirs(&self) -> [&Path; 3] {
        [&self.resources_dir, &self.assets_dir, &self.sources_dir]
    }

    /// Remove every output and recreate the (empty) directories.
    ///
    /// The metadata file is removed so a failed pass leaves none behind.
    pub fn clear(&self) -> io::Result<()> {
        for dir in self.dirs() {
            remove_if_exists(dir)?;
            fs::create_dir_all(dir)?;
        }
        remove_if_exists(&self.metadata_file)
    }

    /// Whether any output directory contains an entry.
    pub fn has_native_output(&self) -> io::Result<bool> {
        for dir in self.dirs() {
            if dir.is_dir() && fs::read_dir(dir)?.next().is_some() {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

fn remove_if_exists(path: &Path) -> io::Result<()> {
    let result = if path.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    match result {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}
