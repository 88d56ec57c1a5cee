//! platform::android
//!
//! Android resource tables and drawables.
//!
//! # Layout
//!
//! ```text
//! values/strings.xml            base locale
//! values-fr/strings.xml
//! values-en-rUS/plurals.xml
//! values-b+sr+Latn/strings.xml  script subtags use the BCP 47 form
//! values/colors.xml             light (or only) colors
//! values-night/colors.xml       dark variants
//! drawable-xhdpi/logo.png       2x
//! ```

use std::path::PathBuf;

use super::{
    copy_image, group_by_locale, require_base, write_file, GenerateError, ResourceGenerator,
};
use crate::core::metadata::{
    ColorMetadata, ImageMetadata, PluralMetadata, ResourceType, StringMetadata,
};
use crate::core::types::{LocaleTag, PackageName, ScaleQualifier};

const PLATFORM: &str = "android";

/// Writes Android `res/` content.
#[derive(Debug, Clone)]
pub struct AndroidGenerator {
    r_class_package: PackageName,
    resources_dir: PathBuf,
}

impl AndroidGenerator {
    pub fn new(r_class_package: PackageName, resources_dir: PathBuf) -> Self {
        Self {
            r_class_package,
            resources_dir,
        }
    }

    fn document(&self, body: &str) -> String {
        format!(
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n\
             <!-- Generated by polyres for {}.R, do not edit. -->\n\
             <resources>\n{body}</resources>\n",
            self.r_class_package
        )
    }

    fn write_table(&self, dir: &str, file: &str, body: &str) -> Result<PathBuf, GenerateError> {
        write_file(
            &self.resources_dir.join(dir).join(file),
            &self.document(body),
        )
    }
}

/// `values` directory name for a locale.
pub fn values_dir(locale: &LocaleTag) -> String {
    if locale.is_base() {
        return "values".to_string();
    }
    let language = locale.language().unwrap_or_default();
    match (locale.script(), locale.region()) {
        (None, None) => format!("values-{language}"),
        (None, Some(region)) if region.len() == 2 => format!("values-{language}-r{region}"),
        (script, region) => {
            let mut dir = format!("values-b+{language}");
            for subtag in script.into_iter().chain(region) {
                dir.push('+');
                dir.push_str(subtag);
            }
            dir
        }
    }
}

/// Density bucket of a raster scale.
pub fn density(scale: &ScaleQualifier) -> Option<&'static str> {
    match scale.as_str() {
        "0.75x" => Some("ldpi"),
        "1x" => Some("mdpi"),
        "1.5x" => Some("hdpi"),
        "2x" => Some("xhdpi"),
        "3x" => Some("xxhdpi"),
        "4x" => Some("xxxhdpi"),
        _ => None,
    }
}

/// Escape text for an Android string resource.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for (index, c) in text.chars().enumerate() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '@' | '?' if index == 0 => {
                out.push('\\');
                out.push(c);
            }
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

impl ResourceGenerator<StringMetadata> for AndroidGenerator {
    fn generate(&self, entries: &[StringMetadata]) -> Result<Vec<PathBuf>, GenerateError> {
        for entry in entries {
            require_base(PLATFORM, ResourceType::Strings, &entry.key, &entry.values)?;
        }

        let groups = group_by_locale(entries.iter().flat_map(|entry| {
            entry
                .values
                .iter()
                .map(move |(locale, text)| (locale, (&entry.key, text)))
        }));

        let mut written = Vec::new();
        for (locale, items) in groups {
            let mut body = String::new();
            for (key, text) in items {
                body.push_str(&format!(
                    "    <string name=\"{key}\">{}</string>\n",
                    escape_text(text)
                ));
            }
            written.push(self.write_table(&values_dir(locale), "strings.xml", &body)?);
        }
        Ok(written)
    }
}

impl ResourceGenerator<PluralMetadata> for AndroidGenerator {
    fn generate(&self, entries: &[PluralMetadata]) -> Result<Vec<PathBuf>, GenerateError> {
        for entry in entries {
            require_base(PLATFORM, ResourceType::Plurals, &entry.key, &entry.values)?;
        }

        let groups = group_by_locale(entries.iter().flat_map(|entry| {
            entry
                .values
                .iter()
                .map(move |(locale, forms)| (locale, (&entry.key, forms)))
        }));

        let mut written = Vec::new();
        for (locale, items) in groups {
            let mut body = String::new();
            for (key, forms) in items {
                body.push_str(&format!("    <plurals name=\"{key}\">\n"));
                for (quantity, text) in forms {
                    body.push_str(&format!(
                        "        <item quantity=\"{quantity}\">{}</item>\n",
                        escape_text(text)
                    ));
                }
                body.push_str("    </plurals>\n");
            }
            written.push(self.write_table(&values_dir(locale), "plurals.xml", &body)?);
        }
        Ok(written)
    }
}

impl ResourceGenerator<ImageMetadata> for AndroidGenerator {
    fn generate(&self, entries: &[ImageMetadata]) -> Result<Vec<PathBuf>, GenerateError> {
        let mut written = Vec::new();
        for entry in entries {
            if !entry.key.is_lowercase() {
                return Err(GenerateError::Unsupported {
                    platform: PLATFORM,
                    kind: ResourceType::Images,
                    key: entry.key.clone(),
                    reason: "drawable names must be lowercase".to_string(),
                });
            }
            for (scale, source) in &entry.values {
                let unsupported = |reason: String| GenerateError::Unsupported {
                    platform: PLATFORM,
                    kind: ResourceType::Images,
                    key: entry.key.clone(),
                    reason,
                };
                if scale.is_vector() {
                    return Err(unsupported(
                        "svg images must be converted to vector drawables".to_string(),
                    ));
                }
                let bucket = density(scale)
                    .ok_or_else(|| unsupported(format!("no density bucket for scale '{scale}'")))?;
                let dest = self
                    .resources_dir
                    .join(format!("drawable-{bucket}"))
                    .join(format!("{}.{}", entry.key, source.format.extension()));
                written.push(copy_image(PLATFORM, &entry.key, &source.path, &dest)?);
            }
        }
        Ok(written)
    }
}

impl ResourceGenerator<ColorMetadata> for AndroidGenerator {
    fn generate(&self, entries: &[ColorMetadata]) -> Result<Vec<PathBuf>, GenerateError> {
        if entries.is_empty() {
            return Ok(Vec::new());
        }

        let mut light = String::new();
        let mut dark = String::new();
        for entry in entries {
            light.push_str(&format!(
                "    <color name=\"{}\">{}</color>\n",
                entry.key,
                entry.value.light().to_argb_hex()
            ));
            if let Some(color) = entry.value.dark() {
                dark.push_str(&format!(
                    "    <color name=\"{}\">{}</color>\n",
                    entry.key,
                    color.to_argb_hex()
                ));
            }
        }

        let mut written = vec![self.write_table("values", "colors.xml", &light)?];
        if !dark.is_empty() {
            written.push(self.write_table("values-night", "colors.xml", &dark)?);
        }
        Ok(written)
    }
}
