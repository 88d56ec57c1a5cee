//! platform::js
//!
//! JSON string maps and bundled images for JS and Wasm.
//!
//! ```text
//! localization/com.example_strings.json         {"greeting": "Hello"}
//! localization/com.example_strings_fr.json
//! localization/com.example_plurals.json         {"items": {"one": "...", "other": "..."}}
//! images/logo@2x.png
//! ```

use std::path::PathBuf;

use indexmap::IndexMap;
use serde::Serialize;

use super::{copy_image, require_base, write_file, GenerateError, ResourceGenerator};
use crate::core::metadata::{
    ColorMetadata, ImageMetadata, PluralMetadata, ResourceType, StringMetadata,
};
use crate::core::types::{LocaleTag, PackageName};

const PLATFORM: &str = "js";

/// Writes JS resources.
#[derive(Debug, Clone)]
pub struct JsGenerator {
    package: PackageName,
    resources_dir: PathBuf,
}

impl JsGenerator {
    pub fn new(package: PackageName, resources_dir: PathBuf) -> Self {
        Self {
            package,
            resources_dir,
        }
    }

    /// Path of the JSON map holding one kind for one locale.
    pub fn bundle_path(&self, kind: ResourceType, locale: &LocaleTag) -> PathBuf {
        let suffix = if locale.is_base() {
            String::new()
        } else {
            format!("_{locale}")
        };
        self.resources_dir
            .join("localization")
            .join(format!("{}_{}{suffix}.json", self.package, kind.name()))
    }

    fn write_maps<V: Serialize>(
        &self,
        kind: ResourceType,
        maps: IndexMap<&LocaleTag, IndexMap<&str, V>>,
    ) -> Result<Vec<PathBuf>, GenerateError> {
        let mut written = Vec::new();
        for (locale, map) in maps {
            let path = self.bundle_path(kind, locale);
            let mut json =
                serde_json::to_string_pretty(&map).map_err(|e| GenerateError::Encode {
                    path: path.clone(),
                    message: e.to_string(),
                })?;
            json.push('\n');
            written.push(write_file(&path, &json)?);
        }
        Ok(written)
    }
}

impl ResourceGenerator<StringMetadata> for JsGenerator {
    fn generate(&self, entries: &[StringMetadata]) -> Result<Vec<PathBuf>, GenerateError> {
        let mut maps: IndexMap<&LocaleTag, IndexMap<&str, &String>> = IndexMap::new();
        for entry in entries {
            require_base(PLATFORM, ResourceType::Strings, &entry.key, &entry.values)?;
            for (locale, text) in &entry.values {
                maps.entry(locale)
                    .or_default()
                    .insert(entry.key.as_str(), text);
            }
        }
        self.write_maps(ResourceType::Strings, maps)
    }
}

impl ResourceGenerator<PluralMetadata> for JsGenerator {
    fn generate(&self, entries: &[PluralMetadata]) -> Result<Vec<PathBuf>, GenerateError> {
        let mut maps: IndexMap<&LocaleTag, IndexMap<&str, _>> = IndexMap::new();
        for entry in entries {
            require_base(PLATFORM, ResourceType::Plurals, &entry.key, &entry.values)?;
            for (locale, forms) in &entry.values {
                maps.entry(locale)
                    .or_default()
                    .insert(entry.key.as_str(), forms);
            }
        }
        self.write_maps(ResourceType::Plurals, maps)
    }
}

impl ResourceGenerator<ImageMetadata> for JsGenerator {
    fn generate(&self, entries: &[ImageMetadata]) -> Result<Vec<PathBuf>, GenerateError> {
        let mut written = Vec::new();
        for entry in entries {
            for (scale, source) in &entry.values {
                let dest = self.resources_dir.join("images").join(format!(
                    "{}{}.{}",
                    entry.key,
                    scale.file_suffix(),
                    source.format.extension()
                ));
                written.push(copy_image(PLATFORM, &entry.key, &source.path, &dest)?);
            }
        }
        Ok(written)
    }
}

impl ResourceGenerator<ColorMetadata> for JsGenerator {
    fn generate(&self, _entries: &[ColorMetadata]) -> Result<Vec<PathBuf>, GenerateError> {
        Ok(Vec::new())
    }
}
