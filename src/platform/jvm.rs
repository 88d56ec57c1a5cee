//! platform::jvm
//!
//! Property bundles and classpath images for the JVM.
//!
//! ```text
//! localization/comexample_MR_strings.properties        base locale
//! localization/comexample_MR_strings_fr_CA.properties
//! localization/comexample_MR_plurals.properties        key.quantity=text
//! images/logo.png
//! images/logo@2x.png
//! ```
//!
//! Colors are compiled into accessor code and produce no files.

use std::path::PathBuf;

use super::{copy_image, group_by_locale, require_base, write_file, GenerateError, ResourceGenerator};
use crate::core::metadata::{
    ColorMetadata, ImageMetadata, PluralMetadata, ResourceType, StringMetadata,
};
use crate::core::types::{ClassName, LocaleTag, PackageName};

const PLATFORM: &str = "jvm";

/// Base name of the bundle holding one kind, relative to the resources root.
pub fn bundle_name(package: &PackageName, class_name: &ClassName, kind: ResourceType) -> String {
    format!("localization/{}_{}_{}", package.flat_name(), class_name, kind.name())
}

/// Suffix appended to a bundle name for a locale (`_fr_CA`), empty for base.
pub fn locale_suffix(locale: &LocaleTag) -> String {
    if locale.is_base() {
        String::new()
    } else {
        format!("_{}", locale.as_str().replace('-', "_"))
    }
}

/// Escape a property key or value.
pub fn escape_property(text: &str, is_key: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for (index, c) in text.chars().enumerate() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{c}' => out.push_str("\\f"),
            '=' | ':' if is_key => {
                out.push('\\');
                out.push(c);
            }
            '#' | '!' if index == 0 => {
                out.push('\\');
                out.push(c);
            }
            ' ' if index == 0 || is_key => out.push_str("\\ "),
            c if c.is_ascii() && !c.is_ascii_control() => out.push(c),
            c => {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    out.push_str(&format!("\\u{unit:04X}"));
                }
            }
        }
    }
    out
}

/// Writes JVM resources.
#[derive(Debug, Clone)]
pub struct JvmGenerator {
    package: PackageName,
    class_name: ClassName,
    resources_dir: PathBuf,
}

impl JvmGenerator {
    pub fn new(package: PackageName, class_name: ClassName, resources_dir: PathBuf) -> Self {
        Self {
            package,
            class_name,
            resources_dir,
        }
    }

    fn write_bundle(
        &self,
        kind: ResourceType,
        locale: &LocaleTag,
        lines: &[String],
    ) -> Result<PathBuf, GenerateError> {
        let name = format!(
            "{}{}.properties",
            bundle_name(&self.package, &self.class_name, kind),
            locale_suffix(locale)
        );
        let mut contents = String::new();
        for line in lines {
            contents.push_str(line);
            contents.push('\n');
        }
        write_file(&self.resources_dir.join(name), &contents)
    }
}

impl ResourceGenerator<StringMetadata> for JvmGenerator {
    fn generate(&self, entries: &[StringMetadata]) -> Result<Vec<PathBuf>, GenerateError> {
        for entry in entries {
            require_base(PLATFORM, ResourceType::Strings, &entry.key, &entry.values)?;
        }

        let groups = group_by_locale(entries.iter().flat_map(|entry| {
            entry.values.iter().map(move |(locale, text)| {
                (
                    locale,
                    format!(
                        "{}={}",
                        escape_property(entry.key.as_str(), true),
                        escape_property(text, false)
                    ),
                )
            })
        }));

        groups
            .into_iter()
            .map(|(locale, lines)| self.write_bundle(ResourceType::Strings, locale, &lines))
            .collect()
    }
}

impl ResourceGenerator<PluralMetadata> for JvmGenerator {
    fn generate(&self, entries: &[PluralMetadata]) -> Result<Vec<PathBuf>, GenerateError> {
        for entry in entries {
            require_base(PLATFORM, ResourceType::Plurals, &entry.key, &entry.values)?;
        }

        let groups = group_by_locale(entries.iter().flat_map(|entry| {
            entry.values.iter().flat_map(move |(locale, forms)| {
                forms.iter().map(move |(quantity, text)| {
                    (
                        locale,
                        format!(
                            "{}.{quantity}={}",
                            escape_property(entry.key.as_str(), true),
                            escape_property(text, false)
                        ),
                    )
                })
            })
        }));

        groups
            .into_iter()
            .map(|(locale, lines)| self.write_bundle(ResourceType::Plurals, locale, &lines))
            .collect()
    }
}

impl ResourceGenerator<ImageMetadata> for JvmGenerator {
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

impl ResourceGenerator<ColorMetadata> for JvmGenerator {
    fn generate(&self, _entries: &[ColorMetadata]) -> Result<Vec<PathBuf>, GenerateError> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::metadata::{PluralForms, Quantity};
    use crate::core::types::ResourceKey;
    use std::fs;
    use tempfile::TempDir;

    fn generator(temp: &TempDir) -> JvmGenerator {
        JvmGenerator::new(
            PackageName::new("com.example").unwrap(),
            ClassName::default(),
            temp.path().to_path_buf(),
        )
    }

    mod naming {
        use super::*;

        #[test]
        fn bundle_names() {
            let package = PackageName::new("com.example.app").unwrap();
            assert_eq!(
                bundle_name(&package, &ClassName::default(), ResourceType::Strings),
                "localization/comexampleapp_MR_strings"
            );
            assert_eq!(locale_suffix(&LocaleTag::base()), "");
            assert_eq!(locale_suffix(&LocaleTag::new("fr-CA").unwrap()), "_fr_CA");
        }

        #[test]
        fn property_escaping() {
            assert_eq!(escape_property("a=b: c", true), r"a\=b\:\ c");
            assert_eq!(escape_property("a=b: c", false), "a=b: c");
            assert_eq!(escape_property("#1\nnext", false), r"\#1\nnext");
            assert_eq!(escape_property("Grüße", false), r"Gr\u00FC\u00DFe");
            assert_eq!(escape_property("😀", false), r"\uD83D\uDE00");
        }
    }

    #[test]
    fn string_bundles_per_locale() {
        let temp = TempDir::new().unwrap();
        let mut entry = StringMetadata::new(ResourceKey::new("greeting").unwrap());
        entry.values.insert(LocaleTag::base(), "Hello".into());
        entry
            .values
            .insert(LocaleTag::new("fr-CA").unwrap(), "Allô".into());

        let written = generator(&temp).generate(&[entry]).unwrap();

        assert_eq!(written.len(), 2);
        let base = fs::read_to_string(
            temp.path()
                .join("localization/comexample_MR_strings.properties"),
        )
        .unwrap();
        assert_eq!(base, "greeting=Hello\n");
        let fr = fs::read_to_string(
            temp.path()
                .join("localization/comexample_MR_strings_fr_CA.properties"),
        )
        .unwrap();
        assert_eq!(fr, "greeting=All\\u00F4\n");
    }

    #[test]
    fn plural_bundle_lines() {
        let temp = TempDir::new().unwrap();
        let mut entry = PluralMetadata::new(ResourceKey::new("items").unwrap());
        let mut forms = PluralForms::new();
        forms.insert(Quantity::One, "%d item".into());
        forms.insert(Quantity::Other, "%d items".into());
        entry.values.insert(LocaleTag::base(), forms);

        generator(&temp).generate(&[entry]).unwrap();

        let bundle = fs::read_to_string(
            temp.path()
                .join("localization/comexample_MR_plurals.properties"),
        )
        .unwrap();
        assert_eq!(bundle, "items.one=%d item\nitems.other=%d items\n");
    }

    #[test]
    fn strings_need_base() {
        let temp = TempDir::new().unwrap();
        let mut entry = StringMetadata::new(ResourceKey::new("greeting").unwrap());
        entry
            .values
            .insert(LocaleTag::new("fr").unwrap(), "Salut".into());
        assert!(matches!(
            generator(&temp).generate(&[entry]),
            Err(GenerateError::MissingBaseLocale { .. })
        ));
    }

    #[test]
    fn colors_write_nothing() {
        let temp = TempDir::new().unwrap();
        let written =
            ResourceGenerator::<ColorMetadata>::generate(&generator(&temp), &[]).unwrap();
        assert!(written.is_empty());
    }
}
