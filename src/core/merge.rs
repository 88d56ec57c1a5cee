//! core::merge
//!
//! Folding of per-source-set metadata fragments into one collection.
//!
//! # Precedence
//!
//! Fragments are supplied from least specific (furthest ancestor, or linked
//! metadata) to most specific (own source set). A key seen for the first
//! time is inserted; a key seen again is combined with the existing value
//! through [`Mergeable::combine`]:
//!
//! - flat kinds (colors) replace the existing value entirely
//! - locale/qualifier scoped kinds (strings, plurals, images) merge per
//!   locale/qualifier, the newer value winning for a locale present in both
//!
//! The result keeps first-declaration order, so unchanged inputs always
//! merge to the same sequence.
//!
//! # Example
//!
//! ```
//! use polyres::core::merge::{merge_fragments, Fragment};
//! use polyres::core::metadata::StringMetadata;
//! use polyres::core::types::{LocaleTag, ResourceKey, SourceSetName};
//!
//! let string = |pairs: &[(&str, &str)]| {
//!     let mut entry = StringMetadata::new(ResourceKey::new("greeting").unwrap());
//!     for (locale, text) in pairs {
//!         entry.values.insert(LocaleTag::new(*locale).unwrap(), text.to_string());
//!     }
//!     entry
//! };
//!
//! let merged = merge_fragments(vec![
//!     Fragment::new(
//!         SourceSetName::new("commonMain").unwrap(),
//!         vec![string(&[("en", "Hello"), ("fr", "Bonjour")])],
//!     ),
//!     Fragment::new(SourceSetName::new("iosMain").unwrap(), vec![string(&[("en", "Hi")])]),
//! ])
//! .unwrap();
//!
//! let en = LocaleTag::new("en").unwrap();
//! let fr = LocaleTag::new("fr").unwrap();
//! assert_eq!(merged[0].values[&en], "Hi");
//! assert_eq!(merged[0].values[&fr], "Bonjour");
//! ```

use indexmap::IndexMap;
use thiserror::Error;

use crate::core::metadata::{
    ColorMetadata, ImageMetadata, PluralMetadata, ResourceMetadata, ResourceType, StringMetadata,
};
use crate::core::types::{ResourceKey, SourceSetName};

/// Errors from merging.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MergeError {
    #[error("{kind} resource '{key}' (last declared in source set '{source_set}') has no value after merging")]
    MissingDefault {
        kind: ResourceType,
        key: ResourceKey,
        source_set: SourceSetName,
    },
}

/// Capability a resource kind supplies to take part in merging.
pub trait Mergeable: Sized {
    /// Kind of the entries.
    const RESOURCE_TYPE: ResourceType;

    /// Key identifying the entry within its container.
    fn key(&self) -> &ResourceKey;

    /// Combine with a more specific declaration of the same key.
    fn combine(self, newer: Self) -> Self;

    /// Whether a usable default exists; checked once the whole chain has
    /// been merged.
    fn has_default(&self) -> bool {
        true
    }
}

/// Entries of one kind declared by one source set.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment<T> {
    pub source_set: SourceSetName,
    pub entries: Vec<T>,
}

impl<T> Fragment<T> {
    pub fn new(source_set: SourceSetName, entries: Vec<T>) -> Self {
        Self {
            source_set,
            entries,
        }
    }
}

/// Merge fragments ordered from least to most specific.
///
/// # Errors
///
/// Returns [`MergeError::MissingDefault`] for the first key (in declaration
/// order) that has no default once every fragment has been applied.
pub fn merge_fragments<T: Mergeable>(
    fragments: impl IntoIterator<Item = Fragment<T>>,
) -> Result<Vec<T>, MergeError> {
    let mut merged: IndexMap<ResourceKey, (T, SourceSetName)> = IndexMap::new();

    for fragment in fragments {
        for entry in fragment.entries {
            let key = entry.key().clone();
            match merged.shift_remove_full(&key) {
                Some((index, key, (existing, _))) => {
                    let combined = existing.combine(entry);
                    merged.shift_insert(index, key, (combined, fragment.source_set.clone()));
                }
                None => {
                    merged.insert(key, (entry, fragment.source_set.clone()));
                }
            }
        }
    }

    if let Some((key, (_, source_set))) = merged.iter().find(|(_, (entry, _))| !entry.has_default())
    {
        return Err(MergeError::MissingDefault {
            kind: T::RESOURCE_TYPE,
            key: key.clone(),
            source_set: source_set.clone(),
        });
    }

    Ok(merged.into_values().map(|(entry, _)| entry).collect())
}

/// Overlay `newer` onto `base`, keeping base order and appending new entries.
fn overlay<K, V>(mut base: IndexMap<K, V>, newer: IndexMap<K, V>) -> IndexMap<K, V>
where
    K: std::hash::Hash + Eq,
{
    for (qualifier, value) in newer {
        base.insert(qualifier, value);
    }
    base
}

impl Mergeable for StringMetadata {
    const RESOURCE_TYPE: ResourceType = ResourceType::Strings;

    fn key(&self) -> &ResourceKey {
        &self.key
    }

    fn combine(self, newer: Self) -> Self {
        Self {
            key: self.key,
            values: overlay(self.values, newer.values),
        }
    }

    fn has_default(&self) -> bool {
        !self.values.is_empty()
    }
}

impl Mergeable for PluralMetadata {
    const RESOURCE_TYPE: ResourceType = ResourceType::Plurals;

    fn key(&self) -> &ResourceKey {
        &self.key
    }

    fn combine(self, newer: Self) -> Self {
        Self {
            key: self.key,
            values: overlay(self.values, newer.values),
        }
    }

    fn has_default(&self) -> bool {
        !self.values.is_empty()
    }
}

impl Mergeable for ImageMetadata {
    const RESOURCE_TYPE: ResourceType = ResourceType::Images;

    fn key(&self) -> &ResourceKey {
        &self.key
    }

    fn combine(self, newer: Self) -> Self {
        Self {
            key: self.key,
            values: overlay(self.values, newer.values),
        }
    }

    fn has_default(&self) -> bool {
        !self.values.is_empty()
    }
}

impl Mergeable for ColorMetadata {
    const RESOURCE_TYPE: ResourceType = ResourceType::Colors;

    fn key(&self) -> &ResourceKey {
        &self.key
    }

    fn combine(self, newer: Self) -> Self {
        newer
    }
}

/// Conversion between a kind's entry type and [`ResourceMetadata`].
pub trait ResourceEntry: Mergeable + Clone {
    fn from_metadata(metadata: &ResourceMetadata) -> Option<&Self>;
    fn into_metadata(self) -> ResourceMetadata;
}

macro_rules! resource_entry {
    ($ty:ty, $variant:ident) => {
        impl ResourceEntry for $ty {
            fn from_metadata(metadata: &ResourceMetadata) -> Option<&Self> {
                match metadata {
                    ResourceMetadata::$variant(entry) => Some(entry),
                    _ => None,
                }
            }

            fn into_metadata(self) -> ResourceMetadata {
                ResourceMetadata::$variant(self)
            }
        }
    };
}

resource_entry!(StringMetadata, String);
resource_entry!(PluralMetadata, Plural);
resource_entry!(ImageMetadata, Image);
resource_entry!(ColorMetadata, Color);

/// The merged entries of every kind for one pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedResources {
    pub strings: Vec<StringMetadata>,
    pub plurals: Vec<PluralMetadata>,
    pub images: Vec<ImageMetadata>,
    pub colors: Vec<ColorMetadata>,
}

impl MergedResources {
    /// Total number of entries across kinds.
    pub fn len(&self) -> usize {
        self.strings.len() + self.plurals.len() + self.images.len() + self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
