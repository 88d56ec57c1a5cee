//! platform
//!
//! Target platform identity and native resource generation.
//!
//! # Architecture
//!
//! The [`GeneratorSet`] registry maps a [`Platform`] to one generator per
//! resource kind plus a container generator. The mapping is total: every
//! platform supplies every generator, using [`NopGenerator`] where the
//! platform has nothing to write. The pipeline therefore never branches on
//! what a platform supports.
//!
//! Adding a platform means adding a [`Platform`] variant, one arm in
//! [`GeneratorSet::for_platform`] and a generator type implementing
//! [`ResourceGenerator`] for each entry type. Metadata, merging and
//! persistence are platform agnostic.
//!
//! # Modules
//!
//! - [`android`] - `values*/` XML tables and density drawables
//! - [`apple`] - `.lproj` string tables and asset catalogs
//! - [`jvm`] - property bundles and classpath images
//! - [`js`] - JSON string maps and bundled images
//! - [`container`] - resource holder artifacts
//! - `nop` - generators that write nothing
//!
//! # Example
//!
//! ```
//! use polyres::platform::Platform;
//!
//! let platform = Platform::resolve("apple", Some("ios_arm64")).unwrap();
//! assert_eq!(platform.name(), "apple:ios_arm64");
//!
//! assert!(Platform::resolve("apple", None).is_err());
//! assert!(Platform::resolve("wasm", None).unwrap() == Platform::Js);
//! ```

pub mod android;
pub mod apple;
pub mod container;
pub mod js;
pub mod jvm;
mod nop;

pub use nop::NopGenerator;

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::{IndexMap, IndexSet};
use thiserror::Error;

use crate::core::merge::MergedResources;
use crate::core::metadata::{
    ColorMetadata, ImageMetadata, ObjectMetadata, PluralMetadata, ResourceType, StringMetadata,
};
use crate::core::paths::OutputPaths;
use crate::core::types::{ClassName, LocaleTag, PackageName, ResourceKey};

/// Errors selecting a platform or its generators.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PlatformError {
    #[error("unknown platform '{0}', must be one of: common, android, apple, jvm, js, wasm")]
    UnknownPlatform(String),

    #[error("platform 'apple' requires a native target (for example ios_arm64)")]
    MissingAppleTarget,

    #[error("unknown apple target '{0}'")]
    UnknownAppleTarget(String),

    #[error("an apple target was given for platform '{0}'")]
    UnexpectedAppleTarget(String),

    #[error("platform '{platform}' requires setting '{setting}'")]
    MissingSetting {
        platform: String,
        setting: &'static str,
    },
}

/// Errors writing native output.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("{platform} cannot represent {kind} resource '{key}': {reason}")]
    Unsupported {
        platform: &'static str,
        kind: ResourceType,
        key: ResourceKey,
        reason: String,
    },

    #[error("{platform} requires a base locale for {kind} resource '{key}'")]
    MissingBaseLocale {
        platform: &'static str,
        kind: ResourceType,
        key: ResourceKey,
    },

    #[error("{platform}: image '{key}' references missing file '{path}'")]
    MissingImage {
        platform: &'static str,
        key: ResourceKey,
        path: PathBuf,
    },

    #[error("failed to write '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to encode '{path}': {message}")]
    Encode { path: PathBuf, message: String },
}

/// Native targets of the Apple family.
pub const APPLE_TARGETS: &[&str] = &[
    "ios_arm64",
    "ios_x64",
    "ios_simulator_arm64",
    "macos_arm64",
    "macos_x64",
    "tvos_arm64",
    "tvos_x64",
    "tvos_simulator_arm64",
    "watchos_arm32",
    "watchos_arm64",
    "watchos_device_arm64",
    "watchos_x64",
    "watchos_simulator_arm64",
];

/// A validated Apple native target.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AppleTarget(String);

impl AppleTarget {
    pub fn new(name: &str) -> Result<Self, PlatformError> {
        let name = name.to_lowercase();
        if APPLE_TARGETS.contains(&name.as_str()) {
            Ok(Self(name))
        } else {
            Err(PlatformError::UnknownAppleTarget(name))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identity of the pass being run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Platform {
    /// Metadata only, no native output
    Common,
    Android,
    Apple(AppleTarget),
    Jvm,
    /// JS and Wasm
    Js,
}

impl Platform {
    /// Resolve a platform from its configured name and optional Apple target.
    ///
    /// # Errors
    ///
    /// - `UnknownPlatform` for an unrecognized name
    /// - `MissingAppleTarget` for `apple` without a target
    /// - `UnexpectedAppleTarget` for a target on a non-Apple platform
    pub fn resolve(name: &str, apple_target: Option<&str>) -> Result<Self, PlatformError> {
        let platform = match name.to_lowercase().as_str() {
            "common" => Platform::Common,
            "android" => Platform::Android,
            "jvm" => Platform::Jvm,
            "js" | "wasm" => Platform::Js,
            "apple" => {
                let target = apple_target.ok_or(PlatformError::MissingAppleTarget)?;
                return Ok(Platform::Apple(AppleTarget::new(target)?));
            }
            _ => return Err(PlatformError::UnknownPlatform(name.to_string())),
        };

        if apple_target.is_some() {
            return Err(PlatformError::UnexpectedAppleTarget(name.to_string()));
        }
        Ok(platform)
    }

    /// Name recorded in metadata artifacts.
    pub fn name(&self) -> String {
        match self {
            Platform::Common => "common".to_string(),
            Platform::Android => "android".to_string(),
            Platform::Apple(target) => format!("apple:{}", target.as_str()),
            Platform::Jvm => "jvm".to_string(),
            Platform::Js => "js".to_string(),
        }
    }

    /// Whether this is the metadata-only common pass.
    pub fn is_common(&self) -> bool {
        matches!(self, Platform::Common)
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Configuration threaded through to the generators.
#[derive(Debug, Clone)]
pub struct GeneratorSettings {
    pub package: PackageName,
    pub class_name: ClassName,
    pub android_r_class_package: Option<PackageName>,
    pub base_localization_region: LocaleTag,
    pub output: OutputPaths,
}

impl GeneratorSettings {
    /// Apple bundle identifier of the resource holder.
    pub fn bundle_identifier(&self) -> String {
        format!("{}.{}", self.package, self.class_name)
    }
}

/// Writes native output for the entries of one resource kind.
pub trait ResourceGenerator<T> {
    /// Write native files for `entries`, returning the files written.
    fn generate(&self, entries: &[T]) -> Result<Vec<PathBuf>, GenerateError>;
}

/// Writes the resource holder once every kind has been generated.
pub trait ContainerGenerator {
    /// Write the holder for the merged object graph, returning the files written.
    fn generate(&self, objects: &[&ObjectMetadata]) -> Result<Vec<PathBuf>, GenerateError>;
}

/// The generators of one platform.
pub struct GeneratorSet {
    pub strings: Box<dyn ResourceGenerator<StringMetadata>>,
    pub plurals: Box<dyn ResourceGenerator<PluralMetadata>>,
    pub images: Box<dyn ResourceGenerator<ImageMetadata>>,
    pub colors: Box<dyn ResourceGenerator<ColorMetadata>>,
    pub container: Box<dyn ContainerGenerator>,
}

impl GeneratorSet {
    /// Build the registry entry for `platform`.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::MissingSetting` if a setting the platform
    /// needs is absent.
    pub fn for_platform(
        platform: &Platform,
        settings: &GeneratorSettings,
    ) -> Result<Self, PlatformError> {
        let set = match platform {
            Platform::Common => Self::uniform(NopGenerator, NopGenerator),
            Platform::Android => {
                let r_class_package = settings.android_r_class_package.clone().ok_or_else(|| {
                    PlatformError::MissingSetting {
                        platform: platform.name(),
                        setting: "android_r_class_package",
                    }
                })?;
                Self::uniform(
                    android::AndroidGenerator::new(
                        r_class_package,
                        settings.output.resources_dir.clone(),
                    ),
                    NopGenerator,
                )
            }
            Platform::Apple(_) => Self::uniform(
                apple::AppleGenerator::new(
                    settings.base_localization_region.clone(),
                    settings.output.resources_dir.clone(),
                    settings.output.assets_dir.clone(),
                ),
                container::AppleContainerGenerator::new(
                    settings.bundle_identifier(),
                    settings.class_name.clone(),
                    settings.base_localization_region.clone(),
                    settings.output.sources_dir.clone(),
                ),
            ),
            Platform::Jvm => Self::uniform(
                jvm::JvmGenerator::new(
                    settings.package.clone(),
                    settings.class_name.clone(),
                    settings.output.resources_dir.clone(),
                ),
                container::JvmContainerGenerator::new(
                    settings.package.clone(),
                    settings.class_name.clone(),
                    settings.output.sources_dir.clone(),
                ),
            ),
            Platform::Js => Self::uniform(
                js::JsGenerator::new(
                    settings.package.clone(),
                    settings.output.resources_dir.clone(),
                ),
                NopGenerator,
            ),
        };
        Ok(set)
    }

    fn uniform<G, C>(generator: G, container: C) -> Self
    where
        G: ResourceGenerator<StringMetadata>
            + ResourceGenerator<PluralMetadata>
            + ResourceGenerator<ImageMetadata>
            + ResourceGenerator<ColorMetadata>
            + Clone
            + 'static,
        C: ContainerGenerator + 'static,
    {
        Self {
            strings: Box::new(generator.clone()),
            plurals: Box::new(generator.clone()),
            images: Box::new(generator.clone()),
            colors: Box::new(generator),
            container: Box::new(container),
        }
    }

    /// Run every kind generator, in [`ResourceType::ALL`] order.
    ///
    /// Files shared between kinds (the Apple catalog root) are listed once,
    /// at their first occurrence.
    pub fn generate_resources(
        &self,
        resources: &MergedResources,
    ) -> Result<Vec<PathBuf>, GenerateError> {
        let mut written: IndexSet<PathBuf> =
            self.strings.generate(&resources.strings)?.into_iter().collect();
        written.extend(self.plurals.generate(&resources.plurals)?);
        written.extend(self.images.generate(&resources.images)?);
        written.extend(self.colors.generate(&resources.colors)?);
        Ok(written.into_iter().collect())
    }
}

/// Fail unless a locale-scoped entry has a base value.
pub(crate) fn require_base<V>(
    platform: &'static str,
    kind: ResourceType,
    key: &ResourceKey,
    values: &IndexMap<LocaleTag, V>,
) -> Result<(), GenerateError> {
    if values.keys().any(LocaleTag::is_base) {
        Ok(())
    } else {
        Err(GenerateError::MissingBaseLocale {
            platform,
            kind,
            key: key.clone(),
        })
    }
}

/// Write a file, creating parent directories.
pub(crate) fn write_file(path: &Path, contents: &str) -> Result<PathBuf, GenerateError> {
    let io_err = |source| GenerateError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(path, contents).map_err(io_err)?;
    Ok(path.to_path_buf())
}

/// Copy an image source into the output tree.
pub(crate) fn copy_image(
    platform: &'static str,
    key: &ResourceKey,
    source: &Path,
    dest: &Path,
) -> Result<PathBuf, GenerateError> {
    if !source.is_file() {
        return Err(GenerateError::MissingImage {
            platform,
            key: key.clone(),
            path: source.to_path_buf(),
        });
    }
    let io_err = |source| GenerateError::Io {
        path: dest.to_path_buf(),
        source,
    };
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::copy(source, dest).map_err(io_err)?;
    Ok(dest.to_path_buf())
}

/// Escape text for XML element content and attribute values.
pub(crate) fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Group `(locale, item)` pairs by locale, keeping first-seen order.
pub(crate) fn group_by_locale<'a, T>(
    pairs: impl IntoIterator<Item = (&'a LocaleTag, T)>,
) -> IndexMap<&'a LocaleTag, Vec<T>> {
    let mut groups: IndexMap<&LocaleTag, Vec<T>> = IndexMap::new();
    for (locale, item) in pairs {
        groups.entry(locale).or_default().push(item);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(android_r: Option<&str>) -> GeneratorSettings {
        GeneratorSettings {
            package: PackageName::new("com.example").unwrap(),
            class_name: ClassName::default(),
            android_r_class_package: android_r.map(|p| PackageName::new(p).unwrap()),
            base_localization_region: LocaleTag::new("en").unwrap(),
            output: OutputPaths::under(PathBuf::from("/tmp/polyres-test")),
        }
    }

    mod platform {
        use super::*;

        #[test]
        fn resolve_each_family() {
            assert_eq!(Platform::resolve("common", None), Ok(Platform::Common));
            assert_eq!(Platform::resolve("Android", None), Ok(Platform::Android));
            assert_eq!(Platform::resolve("jvm", None), Ok(Platform::Jvm));
            assert_eq!(Platform::resolve("js", None), Ok(Platform::Js));
            assert_eq!(Platform::resolve("wasm", None), Ok(Platform::Js));
        }

        #[test]
        fn apple_requires_known_target() {
            assert_eq!(
                Platform::resolve("apple", None),
                Err(PlatformError::MissingAppleTarget)
            );
            assert!(matches!(
                Platform::resolve("apple", Some("ios_pdp11")),
                Err(PlatformError::UnknownAppleTarget(_))
            ));
            assert!(Platform::resolve("apple", Some("macos_arm64")).is_ok());
        }

        #[test]
        fn target_on_other_platform_rejected() {
            assert!(matches!(
                Platform::resolve("jvm", Some("ios_arm64")),
                Err(PlatformError::UnexpectedAppleTarget(_))
            ));
        }

        #[test]
        fn unknown_platform() {
            assert!(matches!(
                Platform::resolve("symbian", None),
                Err(PlatformError::UnknownPlatform(_))
            ));
        }

        #[test]
        fn names() {
            assert_eq!(Platform::Common.name(), "common");
            let apple = Platform::resolve("apple", Some("ios_x64")).unwrap();
            assert_eq!(apple.to_string(), "apple:ios_x64");
        }
    }

    mod generator_set {
        use super::*;

        #[test]
        fn every_platform_has_generators() {
            let platforms = [
                Platform::Common,
                Platform::Android,
                Platform::resolve("apple", Some("ios_arm64")).unwrap(),
                Platform::Jvm,
                Platform::Js,
            ];
            for platform in &platforms {
                assert!(
                    GeneratorSet::for_platform(platform, &settings(Some("com.example"))).is_ok(),
                    "{platform}"
                );
            }
        }

        #[test]
        fn android_requires_r_class_package() {
            let result = GeneratorSet::for_platform(&Platform::Android, &settings(None));
            assert!(matches!(
                result,
                Err(PlatformError::MissingSetting {
                    setting: "android_r_class_package",
                    ..
                })
            ));
        }

        #[test]
        fn common_generates_nothing() {
            let set = GeneratorSet::for_platform(&Platform::Common, &settings(None)).unwrap();
            let written = set.generate_resources(&MergedResources::default()).unwrap();
            assert!(written.is_empty());
            assert!(set.container.generate(&[]).unwrap().is_empty());
        }

        #[test]
        fn shared_catalog_root_listed_once() {
            use crate::core::metadata::{ColorValue, ImageFormat, ImageSource};
            use crate::core::types::{Rgba, ScaleQualifier};

            let temp = tempfile::TempDir::new().unwrap();
            let source = temp.path().join("logo.png");
            fs::write(&source, b"png").unwrap();

            let mut image = ImageMetadata::new(ResourceKey::new("logo").unwrap());
            image.values.insert(
                ScaleQualifier::new("1x").unwrap(),
                ImageSource {
                    path: source,
                    format: ImageFormat::Png,
                },
            );
            let resources = MergedResources {
                images: vec![image],
                colors: vec![ColorMetadata {
                    key: ResourceKey::new("accent").unwrap(),
                    value: ColorValue::Single {
                        color: Rgba::parse("#336699").unwrap(),
                    },
                }],
                ..Default::default()
            };

            let mut apple_settings = settings(None);
            apple_settings.output = OutputPaths::under(temp.path().join("build"));
            let apple = Platform::resolve("apple", Some("ios_arm64")).unwrap();
            let written = GeneratorSet::for_platform(&apple, &apple_settings)
                .unwrap()
                .generate_resources(&resources)
                .unwrap();

            let root = apple_settings
                .output
                .assets_dir
                .join("Assets.xcassets/Contents.json");
            assert_eq!(written.iter().filter(|path| **path == root).count(), 1);
            assert_eq!(written[0], root);
            assert!(written.iter().any(|path| path.ends_with("accent.colorset/Contents.json")));
        }

        #[test]
        fn bundle_identifier_uses_class_name() {
            assert_eq!(settings(None).bundle_identifier(), "com.example.MR");
        }
    }

    mod helpers {
        use super::*;

        #[test]
        fn escape_xml_entities() {
            assert_eq!(escape_xml("a < b & \"c\" > d"), "a &lt; b &amp; &quot;c&quot; &gt; d");
        }

        #[test]
        fn require_base_locale() {
            let key = ResourceKey::new("title").unwrap();
            let mut values = IndexMap::new();
            values.insert(LocaleTag::new("fr").unwrap(), "Titre");
            assert!(require_base("jvm", ResourceType::Strings, &key, &values).is_err());

            values.insert(LocaleTag::base(), "Title");
            assert!(require_base("jvm", ResourceType::Strings, &key, &values).is_ok());
        }

        #[test]
        fn missing_image_source() {
            let key = ResourceKey::new("logo").unwrap();
            let result = copy_image(
                "jvm",
                &key,
                Path::new("/definitely/not/here.png"),
                Path::new("/tmp/out.png"),
            );
            assert!(matches!(result, Err(GenerateError::MissingImage { .. })));
        }
    }
}
