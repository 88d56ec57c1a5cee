//! builder
//!
//! Per-kind metadata builders.
//!
//! # Architecture
//!
//! Each resource kind has one [`MetadataBuilder`]. A builder turns the
//! files one source set contributes for its kind into typed entries; the
//! engine then hands one [`Fragment`] per source set to the merger.
//!
//! Builders only see a single source set at a time. Conflicts *within* a
//! source set (the same key declared twice for the same locale or scale)
//! are input errors; conflicts *between* source sets are resolved by
//! precedence during merging.
//!
//! # Modules
//!
//! - [`strings`] - `strings*.xml` under a locale directory
//! - [`plurals`] - `plurals*.xml` under a locale directory
//! - [`images`] - `images/` files with `@<scale>` suffixes
//! - [`colors`] - `colors*.xml` with single or light/dark values

pub mod colors;
pub mod images;
pub mod plurals;
pub mod strings;
mod xml;

use std::fmt::Display;
use std::fs;
use std::hash::Hash;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use thiserror::Error;

use crate::core::merge::{Fragment, ResourceEntry};
use crate::core::metadata::ResourceType;
use crate::core::types::{LocaleTag, ResourceKey, SourceSetName};
use crate::engine::collect::CollectedSourceSet;

pub use colors::ColorsBuilder;
pub use images::ImagesBuilder;
pub use plurals::PluralsBuilder;
pub use strings::StringsBuilder;

/// Errors reading resource files.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("failed to read '{path}' in source set '{source_set}': {source}")]
    Read {
        source_set: SourceSetName,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed {kind} file '{path}' in source set '{source_set}': {message}")]
    Malformed {
        source_set: SourceSetName,
        kind: ResourceType,
        path: PathBuf,
        message: String,
    },

    #[error(
        "{kind} resource '{key}' is declared twice for '{qualifier}' in source set \
         '{source_set}' ('{first}' and '{second}')"
    )]
    Duplicate {
        source_set: SourceSetName,
        kind: ResourceType,
        key: ResourceKey,
        qualifier: String,
        first: PathBuf,
        second: PathBuf,
    },
}

/// Turns the files of one kind in one source set into metadata entries.
pub trait MetadataBuilder {
    type Entry: ResourceEntry;

    /// Build entries from `files`, which all live below `root`.
    fn build(
        &self,
        source_set: &SourceSetName,
        root: &Path,
        files: &[PathBuf],
    ) -> Result<Vec<Self::Entry>, BuildError>;
}

/// Run `builder` over every collected source set, keeping their order.
pub fn build_fragments<B: MetadataBuilder>(
    builder: &B,
    source_sets: &[CollectedSourceSet],
) -> Result<Vec<Fragment<B::Entry>>, BuildError> {
    source_sets
        .iter()
        .map(|set| {
            let files = set.files_of(<B::Entry as crate::core::merge::Mergeable>::RESOURCE_TYPE);
            let entries = builder.build(&set.name, set.root(), files)?;
            Ok(Fragment::new(set.name.clone(), entries))
        })
        .collect()
}

/// Shared file-level context for builder errors.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FileContext<'a> {
    pub source_set: &'a SourceSetName,
    pub kind: ResourceType,
    pub path: &'a Path,
}

impl<'a> FileContext<'a> {
    pub fn new(source_set: &'a SourceSetName, kind: ResourceType, path: &'a Path) -> Self {
        Self {
            source_set,
            kind,
            path,
        }
    }

    pub fn read_to_string(&self) -> Result<String, BuildError> {
        fs::read_to_string(self.path).map_err(|source| BuildError::Read {
            source_set: self.source_set.clone(),
            path: self.path.to_path_buf(),
            source,
        })
    }

    pub fn malformed(&self, message: impl Into<String>) -> BuildError {
        BuildError::Malformed {
            source_set: self.source_set.clone(),
            kind: self.kind,
            path: self.path.to_path_buf(),
            message: message.into(),
        }
    }

    /// Parse the file as an XML document whose root is `<resources>`.
    pub fn read_resources(&self) -> Result<xml::Element, BuildError> {
        let contents = self.read_to_string()?;
        let root = xml::parse_document(&contents).map_err(|message| self.malformed(message))?;
        if root.name != "resources" {
            return Err(self.malformed(format!(
                "root element must be <resources>, found <{}>",
                root.name
            )));
        }
        Ok(root)
    }

    /// Locale of a file, taken from its parent directory. Files placed
    /// directly in the resources directory belong to the base locale.
    pub fn locale(&self, root: &Path) -> Result<LocaleTag, BuildError> {
        let parent = self.path.parent().unwrap_or(root);
        if parent == root {
            return Ok(LocaleTag::base());
        }
        let name = parent
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        LocaleTag::new(name).map_err(|e| self.malformed(e.to_string()))
    }

    /// The `name` attribute of an entry element as a resource key.
    pub fn key_of(&self, element: &xml::Element) -> Result<ResourceKey, BuildError> {
        let name = element.attribute("name").ok_or_else(|| {
            self.malformed(format!("<{}> is missing the 'name' attribute", element.name))
        })?;
        ResourceKey::new(name).map_err(|e| self.malformed(e.to_string()))
    }
}

/// Values declared by one source set, keyed by resource and qualifier.
///
/// Rejects a second declaration of the same `(key, qualifier)` pair.
pub(crate) struct Declarations<Q, V> {
    source_set: SourceSetName,
    kind: ResourceType,
    entries: IndexMap<ResourceKey, IndexMap<Q, (V, PathBuf)>>,
}

impl<Q, V> Declarations<Q, V>
where
    Q: Hash + Eq + Display,
{
    pub fn new(source_set: &SourceSetName, kind: ResourceType) -> Self {
        Self {
            source_set: source_set.clone(),
            kind,
            entries: IndexMap::new(),
        }
    }

    pub fn declare(
        &mut self,
        key: ResourceKey,
        qualifier: Q,
        value: V,
        path: &Path,
    ) -> Result<(), BuildError> {
        let qualified = self.entries.entry(key.clone()).or_default();
        if let Some((_, first)) = qualified.get(&qualifier) {
            return Err(BuildError::Duplicate {
                source_set: self.source_set.clone(),
                kind: self.kind,
                key,
                qualifier: qualifier.to_string(),
                first: first.clone(),
                second: path.to_path_buf(),
            });
        }
        qualified.insert(qualifier, (value, path.to_path_buf()));
        Ok(())
    }

    /// Finish, building one entry per key in first-declaration order.
    pub fn into_entries<T>(self, mut build: impl FnMut(ResourceKey, IndexMap<Q, V>) -> T) -> Vec<T> {
        self.entries
            .into_iter()
            .map(|(key, values)| {
                let values = values
                    .into_iter()
                    .map(|(qualifier, (value, _))| (qualifier, value))
                    .collect();
                build(key, values)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set() -> SourceSetName {
        SourceSetName::new("commonMain").unwrap()
    }

    mod declarations {
        use super::*;

        #[test]
        fn duplicate_qualifier_rejected() {
            let mut declarations = Declarations::new(&set(), ResourceType::Strings);
            let key = ResourceKey::new("title").unwrap();
            declarations
                .declare(key.clone(), LocaleTag::base(), "a", Path::new("base/strings.xml"))
                .unwrap();
            declarations
                .declare(
                    key.clone(),
                    LocaleTag::new("fr").unwrap(),
                    "b",
                    Path::new("fr/strings.xml"),
                )
                .unwrap();

            let err = declarations
                .declare(key, LocaleTag::base(), "c", Path::new("base/strings_more.xml"))
                .unwrap_err();
            match err {
                BuildError::Duplicate {
                    qualifier,
                    first,
                    second,
                    ..
                } => {
                    assert_eq!(qualifier, "base");
                    assert_eq!(first, PathBuf::from("base/strings.xml"));
                    assert_eq!(second, PathBuf::from("base/strings_more.xml"));
                }
                other => panic!("unexpected error: {other}"),
            }
        }

        #[test]
        fn first_declaration_order() {
            let mut declarations = Declarations::new(&set(), ResourceType::Colors);
            for name in ["b", "a", "c"] {
                declarations
                    .declare(ResourceKey::new(name).unwrap(), "value", 1, Path::new("x"))
                    .unwrap();
            }
            let keys = declarations.into_entries(|key, _| key.to_string());
            assert_eq!(keys, ["b", "a", "c"]);
        }
    }

    mod locale {
        use super::*;

        #[test]
        fn from_parent_directory() {
            let root = Path::new("/res");
            let path = Path::new("/res/fr-CA/strings.xml");
            let set = set();
            let context = FileContext::new(&set, ResourceType::Strings, path);
            assert_eq!(context.locale(root).unwrap().as_str(), "fr-CA");
        }

        #[test]
        fn root_level_file_is_base() {
            let root = Path::new("/res");
            let path = Path::new("/res/strings.xml");
            let set = set();
            let context = FileContext::new(&set, ResourceType::Strings, path);
            assert!(context.locale(root).unwrap().is_base());
        }

        #[test]
        fn invalid_directory_name() {
            let root = Path::new("/res");
            let path = Path::new("/res/values-fr/strings.xml");
            let set = set();
            let context = FileContext::new(&set, ResourceType::Strings, path);
            assert!(matches!(
                context.locale(root),
                Err(BuildError::Malformed { .. })
            ));
        }
    }
}
