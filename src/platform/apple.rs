//! platform::apple
//!
//! Apple string tables and asset catalogs.
//!
//! # Layout
//!
//! ```text
//! resources_dir/
//!   Base.lproj/Localizable.strings
//!   en.lproj/Localizable.strings          base localization region
//!   fr.lproj/Localizable.stringsdict
//! assets_dir/
//!   Assets.xcassets/Contents.json
//!   Assets.xcassets/logo.imageset/{Contents.json, logo.png, logo@2x.png}
//!   Assets.xcassets/accent.colorset/Contents.json
//! ```
//!
//! Base values are written to `Base.lproj` and to the directory of the base
//! localization region. A value declared explicitly for that region wins
//! over the base value in its directory.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Serialize;

use super::{copy_image, escape_xml, write_file, GenerateError, ResourceGenerator};
use crate::core::metadata::{
    ColorMetadata, ImageMetadata, PluralForms, PluralMetadata, ResourceType, StringMetadata,
};
use crate::core::types::{LocaleTag, ResourceKey, Rgba};

const PLATFORM: &str = "apple";
const CATALOG: &str = "Assets.xcassets";
const STRINGS_FILE: &str = "Localizable.strings";
const PLURALS_FILE: &str = "Localizable.stringsdict";
const RASTER_SCALES: [&str; 3] = ["1x", "2x", "3x"];

/// Writes `.lproj` tables and the asset catalog.
#[derive(Debug, Clone)]
pub struct AppleGenerator {
    base_region: LocaleTag,
    resources_dir: PathBuf,
    assets_dir: PathBuf,
}

impl AppleGenerator {
    pub fn new(base_region: LocaleTag, resources_dir: PathBuf, assets_dir: PathBuf) -> Self {
        Self {
            base_region,
            resources_dir,
            assets_dir,
        }
    }

    /// Arrange locale-scoped values into `.lproj` directories.
    fn tables<'a, V>(
        &self,
        entries: impl IntoIterator<Item = (&'a ResourceKey, &'a IndexMap<LocaleTag, V>)>,
    ) -> IndexMap<String, Vec<(&'a ResourceKey, &'a V)>> {
        let mut tables: IndexMap<String, Vec<(&ResourceKey, &V)>> = IndexMap::new();
        for (key, values) in entries {
            for (locale, value) in values {
                if locale.is_base() {
                    tables.entry("Base".to_string()).or_default().push((key, value));
                    if !values.contains_key(&self.base_region) {
                        tables
                            .entry(self.base_region.to_string())
                            .or_default()
                            .push((key, value));
                    }
                } else {
                    tables
                        .entry(locale.to_string())
                        .or_default()
                        .push((key, value));
                }
            }
        }
        tables
    }

    fn lproj(&self, dir: &str, file: &str) -> PathBuf {
        self.resources_dir.join(format!("{dir}.lproj")).join(file)
    }

    fn catalog(&self) -> PathBuf {
        self.assets_dir.join(CATALOG)
    }

    fn write_catalog_root(&self) -> Result<PathBuf, GenerateError> {
        let path = self.catalog().join("Contents.json");
        write_json(&path, &CatalogContents { info: Info::default() })
    }
}

/// Escape text for a `.strings` literal.
pub fn escape_strings_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}

impl ResourceGenerator<StringMetadata> for AppleGenerator {
    fn generate(&self, entries: &[StringMetadata]) -> Result<Vec<PathBuf>, GenerateError> {
        let tables = self.tables(entries.iter().map(|entry| (&entry.key, &entry.values)));

        let mut written = Vec::new();
        for (dir, items) in tables {
            let mut body = String::new();
            for (key, text) in items {
                body.push_str(&format!(
                    "\"{key}\" = \"{}\";\n",
                    escape_strings_literal(text)
                ));
            }
            written.push(write_file(&self.lproj(&dir, STRINGS_FILE), &body)?);
        }
        Ok(written)
    }
}

impl ResourceGenerator<PluralMetadata> for AppleGenerator {
    fn generate(&self, entries: &[PluralMetadata]) -> Result<Vec<PathBuf>, GenerateError> {
        let tables = self.tables(entries.iter().map(|entry| (&entry.key, &entry.values)));

        let mut written = Vec::new();
        for (dir, items) in tables {
            let mut body = String::new();
            for (key, forms) in items {
                body.push_str(&stringsdict_entry(key, forms));
            }
            let document = format!(
                "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
                 <!DOCTYPE plist PUBLIC \"-//Apple//DTD PLIST 1.0//EN\" \
                 \"http://www.apple.com/DTDs/PropertyList-1.0.dtd\">\n\
                 <plist version=\"1.0\">\n<dict>\n{body}</dict>\n</plist>\n"
            );
            written.push(write_file(&self.lproj(&dir, PLURALS_FILE), &document)?);
        }
        Ok(written)
    }
}

fn stringsdict_entry(key: &ResourceKey, forms: &PluralForms) -> String {
    let mut out = format!(
        "    <key>{key}</key>\n    <dict>\n\
         \x20       <key>NSStringLocalizedFormatKey</key>\n\
         \x20       <string>%#@value@</string>\n\
         \x20       <key>value</key>\n\
         \x20       <dict>\n\
         \x20           <key>NSStringFormatSpecTypeKey</key>\n\
         \x20           <string>NSStringPluralRuleType</string>\n\
         \x20           <key>NSStringFormatValueTypeKey</key>\n\
         \x20           <string>d</string>\n"
    );
    for (quantity, text) in forms {
        out.push_str(&format!(
            "            <key>{quantity}</key>\n            <string>{}</string>\n",
            escape_xml(text)
        ));
    }
    out.push_str("        </dict>\n    </dict>\n");
    out
}

impl ResourceGenerator<ImageMetadata> for AppleGenerator {
    fn generate(&self, entries: &[ImageMetadata]) -> Result<Vec<PathBuf>, GenerateError> {
        if entries.is_empty() {
            return Ok(Vec::new());
        }

        let mut written = vec![self.write_catalog_root()?];
        for entry in entries {
            let unsupported = |reason: String| GenerateError::Unsupported {
                platform: PLATFORM,
                kind: ResourceType::Images,
                key: entry.key.clone(),
                reason,
            };

            let vector = entry.values.keys().filter(|scale| scale.is_vector()).count();
            if vector > 0 && vector != entry.values.len() {
                return Err(unsupported(
                    "an image set cannot mix vector and raster variants".to_string(),
                ));
            }

            let set_dir = self.catalog().join(format!("{}.imageset", entry.key));
            let mut images = Vec::new();
            for (scale, source) in &entry.values {
                if !scale.is_vector() && !RASTER_SCALES.contains(&scale.as_str()) {
                    return Err(unsupported(format!("asset catalogs have no '{scale}' scale")));
                }
                let filename = format!(
                    "{}{}.{}",
                    entry.key,
                    scale.file_suffix(),
                    source.format.extension()
                );
                written.push(copy_image(
                    PLATFORM,
                    &entry.key,
                    &source.path,
                    &set_dir.join(&filename),
                )?);
                images.push(CatalogImage {
                    idiom: "universal",
                    filename,
                    scale: (!scale.is_vector()).then(|| scale.to_string()),
                });
            }

            let contents = ImageSetContents {
                images,
                info: Info::default(),
                properties: (vector > 0).then_some(VectorProperties {
                    preserves_vector_representation: true,
                }),
            };
            written.push(write_json(&set_dir.join("Contents.json"), &contents)?);
        }
        Ok(written)
    }
}

impl ResourceGenerator<ColorMetadata> for AppleGenerator {
    fn generate(&self, entries: &[ColorMetadata]) -> Result<Vec<PathBuf>, GenerateError> {
        if entries.is_empty() {
            return Ok(Vec::new());
        }

        let mut written = vec![self.write_catalog_root()?];
        for entry in entries {
            let mut colors = vec![CatalogColor::new(entry.value.light(), None)];
            if let Some(dark) = entry.value.dark() {
                colors.push(CatalogColor::new(
                    dark,
                    Some(vec![Appearance {
                        appearance: "luminosity",
                        value: "dark",
                    }]),
                ));
            }
            let contents = ColorSetContents {
                colors,
                info: Info::default(),
            };
            let path = self
                .catalog()
                .join(format!("{}.colorset", entry.key))
                .join("Contents.json");
            written.push(write_json(&path, &contents)?);
        }
        Ok(written)
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<PathBuf, GenerateError> {
    let mut json = serde_json::to_string_pretty(value).map_err(|e| GenerateError::Encode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    json.push('\n');
    write_file(path, &json)
}

#[derive(Debug, Serialize)]
struct Info {
    author: &'static str,
    version: u32,
}

impl Default for Info {
    fn default() -> Self {
        Self {
            author: "polyres",
            version: 1,
        }
    }
}

#[derive(Debug, Serialize)]
struct CatalogContents {
    info: Info,
}

#[derive(Debug, Serialize)]
struct ImageSetContents {
    images: Vec<CatalogImage>,
    info: Info,
    #[serde(skip_serializing_if = "Option::is_none")]
    properties: Option<VectorProperties>,
}

#[derive(Debug, Serialize)]
struct CatalogImage {
    idiom: &'static str,
    filename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    scale: Option<String>,
}

#[derive(Debug, Serialize)]
struct VectorProperties {
    #[serde(rename = "preserves-vector-representation")]
    preserves_vector_representation: bool,
}

#[derive(Debug, Serialize)]
struct ColorSetContents {
    colors: Vec<CatalogColor>,
    info: Info,
}

#[derive(Debug, Serialize)]
struct CatalogColor {
    idiom: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    appearances: Option<Vec<Appearance>>,
    color: ColorDefinition,
}

impl CatalogColor {
    fn new(color: Rgba, appearances: Option<Vec<Appearance>>) -> Self {
        Self {
            idiom: "universal",
            appearances,
            color: ColorDefinition {
                color_space: "srgb",
                components: Components {
                    red: format!("0x{:02X}", color.red()),
                    green: format!("0x{:02X}", color.green()),
                    blue: format!("0x{:02X}", color.blue()),
                    alpha: format!("{:.3}", f64::from(color.alpha()) / 255.0),
                },
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct Appearance {
    appearance: &'static str,
    value: &'static str,
}

#[derive(Debug, Serialize)]
struct ColorDefinition {
    #[serde(rename = "color-space")]
    color_space: &'static str,
    components: Components,
}

#[derive(Debug, Serialize)]
struct Components {
    red: String,
    green: String,
    blue: String,
    alpha: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::metadata::{ColorValue, ImageFormat, ImageSource, Quantity};
    use crate::core::types::ScaleQualifier;
    use std::fs;
    use tempfile::TempDir;

    fn generator(temp: &TempDir) -> AppleGenerator {
        AppleGenerator::new(
            LocaleTag::new("en").unwrap(),
            temp.path().join("res"),
            temp.path().join("assets"),
        )
    }

    fn string(key: &str, pairs: &[(&str, &str)]) -> StringMetadata {
        let mut entry = StringMetadata::new(ResourceKey::new(key).unwrap());
        for (locale, text) in pairs {
            entry
                .values
                .insert(LocaleTag::new(*locale).unwrap(), text.to_string());
        }
        entry
    }

    mod strings {
        use super::*;

        #[test]
        fn base_feeds_base_region() {
            let temp = TempDir::new().unwrap();
            let entries = vec![
                string("greeting", &[("base", "Hello"), ("fr", "Bonjour")]),
                string("farewell", &[("base", "Bye"), ("en", "Goodbye")]),
            ];

            generator(&temp).generate(&entries).unwrap();

            let read = |dir: &str| {
                fs::read_to_string(temp.path().join("res").join(dir).join(STRINGS_FILE)).unwrap()
            };
            assert_eq!(
                read("Base.lproj"),
                "\"greeting\" = \"Hello\";\n\"farewell\" = \"Bye\";\n"
            );
            assert_eq!(
                read("en.lproj"),
                "\"greeting\" = \"Hello\";\n\"farewell\" = \"Goodbye\";\n"
            );
            assert_eq!(read("fr.lproj"), "\"greeting\" = \"Bonjour\";\n");
        }

        #[test]
        fn no_base_is_fine() {
            let temp = TempDir::new().unwrap();
            let written = generator(&temp)
                .generate(&[string("title", &[("de", "Titel")])])
                .unwrap();
            assert_eq!(written.len(), 1);
        }

        #[test]
        fn literal_escaping() {
            assert_eq!(
                escape_strings_literal("say \"hi\"\n\\"),
                r#"say \"hi\"\n\\"#
            );
        }
    }

    mod plurals {
        use super::*;

        #[test]
        fn stringsdict_rules() {
            let temp = TempDir::new().unwrap();
            let mut entry = PluralMetadata::new(ResourceKey::new("items").unwrap());
            let mut forms = PluralForms::new();
            forms.insert(Quantity::One, "%d item".into());
            forms.insert(Quantity::Other, "%d items & more".into());
            entry.values.insert(LocaleTag::base(), forms);

            generator(&temp).generate(&[entry]).unwrap();

            let dict = fs::read_to_string(temp.path().join("res/Base.lproj").join(PLURALS_FILE))
                .unwrap();
            assert!(dict.contains("<key>items</key>"));
            assert!(dict.contains("<key>one</key>\n            <string>%d item</string>"));
            assert!(dict.contains("%d items &amp; more"));
            assert!(temp.path().join("res/en.lproj").join(PLURALS_FILE).is_file());
        }
    }

    mod images {
        use super::*;

        fn image(temp: &TempDir, key: &str, variants: &[(&str, &str)]) -> ImageMetadata {
            let mut entry = ImageMetadata::new(ResourceKey::new(key).unwrap());
            for (scale, file) in variants {
                let path = temp.path().join(file);
                fs::write(&path, file.as_bytes()).unwrap();
                entry.values.insert(
                    ScaleQualifier::new(*scale).unwrap(),
                    ImageSource {
                        path,
                        format: ImageFormat::from_extension(file.rsplit('.').next().unwrap())
                            .unwrap(),
                    },
                );
            }
            entry
        }

        #[test]
        fn imageset_with_contents() {
            let temp = TempDir::new().unwrap();
            let entry = image(&temp, "logo", &[("1x", "logo.png"), ("2x", "logo@2x.png")]);

            generator(&temp).generate(&[entry]).unwrap();

            let set = temp.path().join("assets").join(CATALOG).join("logo.imageset");
            assert!(set.join("logo@2x.png").is_file());
            let contents: serde_json::Value =
                serde_json::from_str(&fs::read_to_string(set.join("Contents.json")).unwrap())
                    .unwrap();
            assert_eq!(contents["images"][1]["filename"], "logo@2x.png");
            assert_eq!(contents["images"][1]["scale"], "2x");
            assert!(contents.get("properties").is_none());
            assert!(temp
                .path()
                .join("assets")
                .join(CATALOG)
                .join("Contents.json")
                .is_file());
        }

        #[test]
        fn vector_set() {
            let temp = TempDir::new().unwrap();
            let entry = image(&temp, "star", &[("vector", "star.svg")]);

            generator(&temp).generate(&[entry]).unwrap();

            let path = temp
                .path()
                .join("assets")
                .join(CATALOG)
                .join("star.imageset/Contents.json");
            let contents: serde_json::Value =
                serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
            assert_eq!(
                contents["properties"]["preserves-vector-representation"],
                true
            );
            assert!(contents["images"][0].get("scale").is_none());
        }

        #[test]
        fn unsupported_variants() {
            let temp = TempDir::new().unwrap();
            let mixed = image(&temp, "mixed", &[("1x", "mixed.png"), ("vector", "mixed.svg")]);
            assert!(matches!(
                generator(&temp).generate(&[mixed]),
                Err(GenerateError::Unsupported { .. })
            ));

            let odd = image(&temp, "odd", &[("1.5x", "odd@1.5x.png")]);
            assert!(generator(&temp).generate(&[odd]).is_err());
        }
    }

    mod colors {
        use super::*;

        #[test]
        fn colorset_components() {
            let temp = TempDir::new().unwrap();
            let entry = ColorMetadata {
                key: ResourceKey::new("surface").unwrap(),
                value: ColorValue::Themed {
                    light: Rgba::parse("#FFFFFF").unwrap(),
                    dark: Rgba::parse("#33669980").unwrap(),
                },
            };

            generator(&temp).generate(&[entry]).unwrap();

            let path = temp
                .path()
                .join("assets")
                .join(CATALOG)
                .join("surface.colorset/Contents.json");
            let contents: serde_json::Value =
                serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
            let dark = &contents["colors"][1];
            assert_eq!(dark["appearances"][0]["value"], "dark");
            assert_eq!(dark["color"]["components"]["red"], "0x33");
            assert_eq!(dark["color"]["components"]["alpha"], "0.502");
            assert!(contents["colors"][0].get("appearances").is_none());
        }
    }
}
