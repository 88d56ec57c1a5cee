//! engine::collect
//!
//! Discovery of resource files in the source sets of a pass.
//!
//! # Layout
//!
//! ```text
//! <resources>/
//!   base/strings.xml
//!   fr/strings.xml
//!   base/plurals.xml
//!   base/colors.xml
//!   images/logo.png
//!   images/logo@2x.png
//! ```
//!
//! Each kind has a fixed file filter (see [`kind_patterns`]). A source set
//! whose resources directory does not exist simply contributes nothing.
//!
//! # Ordering
//!
//! Files are returned sorted by path so builders see them in the same order
//! on every run.

use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use indexmap::IndexMap;
use thiserror::Error;
use walkdir::WalkDir;

use crate::core::metadata::ResourceType;
use crate::core::types::SourceSetName;

/// Errors from file discovery.
#[derive(Debug, Error)]
pub enum CollectError {
    #[error("invalid file pattern '{pattern}': {source}")]
    Pattern {
        pattern: &'static str,
        source: globset::Error,
    },

    #[error("failed to scan resources of source set '{source_set}': {source}")]
    Walk {
        source_set: SourceSetName,
        source: walkdir::Error,
    },
}

/// A source set and its resources directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSetResources {
    pub name: SourceSetName,
    pub root: PathBuf,
}

impl SourceSetResources {
    pub fn new(name: SourceSetName, root: PathBuf) -> Self {
        Self { name, root }
    }

    /// Files under the root matching `filter`, sorted by path.
    pub fn files_matching(&self, filter: &GlobSet) -> Result<Vec<PathBuf>, CollectError> {
        if !self.root.is_dir() {
            tracing::debug!(
                source_set = %self.name,
                root = %self.root.display(),
                "resources directory absent"
            );
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root).sort_by_file_name() {
            let entry = entry.map_err(|source| CollectError::Walk {
                source_set: self.name.clone(),
                source,
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry.path().strip_prefix(&self.root).unwrap_or(entry.path());
            if filter.is_match(relative) {
                files.push(entry.into_path());
            }
        }
        files.sort();
        Ok(files)
    }
}

/// The source sets contributing to one pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceFiles {
    pub own: SourceSetResources,
    /// Nearest ancestor first
    pub upper: Vec<SourceSetResources>,
}

impl ResourceFiles {
    /// Source sets from least to most specific: furthest ancestor first,
    /// own source set last.
    pub fn by_precedence(&self) -> impl Iterator<Item = &SourceSetResources> {
        self.upper.iter().rev().chain(std::iter::once(&self.own))
    }
}

/// File patterns of a resource kind, relative to a resources directory.
pub fn kind_patterns(kind: ResourceType) -> &'static [&'static str] {
    match kind {
        ResourceType::Strings => &["**/strings*.xml"],
        ResourceType::Plurals => &["**/plurals*.xml"],
        ResourceType::Images => &[
            "images/**/*.png",
            "images/**/*.jpg",
            "images/**/*.jpeg",
            "images/**/*.svg",
        ],
        ResourceType::Colors => &["**/colors*.xml"],
    }
}

/// Compile the filter of a resource kind.
pub fn kind_filter(kind: ResourceType) -> Result<GlobSet, CollectError> {
    let mut builder = GlobSetBuilder::new();
    for &pattern in kind_patterns(kind) {
        let glob = GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()
            .map_err(|source| CollectError::Pattern { pattern, source })?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|source| CollectError::Pattern {
            pattern: kind_patterns(kind)[0],
            source,
        })
}

/// Files of every kind found in one source set.
#[derive(Debug, Clone)]
pub struct CollectedSourceSet {
    pub name: SourceSetName,
    pub root: PathBuf,
    pub files: IndexMap<ResourceType, Vec<PathBuf>>,
}

impl CollectedSourceSet {
    /// Files of `kind`, empty if none were found.
    pub fn files_of(&self, kind: ResourceType) -> &[PathBuf] {
        self.files.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Collect the files of every kind in every source set, least specific first.
pub fn collect(files: &ResourceFiles) -> Result<Vec<CollectedSourceSet>, CollectError> {
    let filters = ResourceType::ALL
        .iter()
        .map(|kind| Ok((*kind, kind_filter(*kind)?)))
        .collect::<Result<Vec<_>, CollectError>>()?;

    files
        .by_precedence()
        .map(|source_set| {
            let mut found = IndexMap::new();
            for (kind, filter) in &filters {
                found.insert(*kind, source_set.files_matching(filter)?);
            }
            tracing::debug!(
                source_set = %source_set.name,
                files = found.values().map(Vec::len).sum::<usize>(),
                "collected resource files"
            );
            Ok(CollectedSourceSet {
                name: source_set.name.clone(),
                root: source_set.root.clone(),
                files: found,
            })
        })
        .collect()
}
