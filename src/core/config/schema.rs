//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Generation File
//!
//! A pass is described by one TOML file, usually `polyres.toml` next to the
//! resources it processes. Every field is optional at this layer so files
//! can be overlaid by CLI flags before validation.
//!
//! # Paths
//!
//! Relative paths are resolved against the directory containing the file
//! (see [`GenerationFile::rebase`]), never against the working directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::core::metadata::Visibility;

/// Configuration of one generation pass.
///
/// # Example
///
/// ```toml
/// source_set = "iosMain"
/// own_resources = "src/iosMain/resources/MR"
/// platform = "apple"
/// apple_target = "ios_arm64"
/// package_name = "com.example.app"
/// input_metadata = ["build/polyres/commonMain/metadata.json"]
///
/// [[upper_source_sets]]
/// name = "commonMain"
/// path = "src/commonMain/resources/MR"
///
/// [output]
/// root = "build/polyres/iosMain"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GenerationFile {
    /// Name of the source set being processed
    pub source_set: Option<String>,

    /// Resources directory of that source set
    pub own_resources: Option<PathBuf>,

    /// Ancestor source sets, nearest first
    pub upper_source_sets: Option<Vec<UpperSourceSetConfig>>,

    /// common, android, apple, jvm, js (or wasm)
    pub platform: Option<String>,

    /// Native target, required for apple
    pub apple_target: Option<String>,

    /// Package of the generated resource holder
    pub package_name: Option<String>,

    /// Class name of the generated resource holder (default: MR)
    pub class_name: Option<String>,

    /// public or internal
    pub visibility: Option<String>,

    /// Only explicit `\n` escapes produce line breaks
    pub strict_line_breaks: Option<bool>,

    /// Package of the Android `R` class
    pub android_r_class_package: Option<String>,

    /// Development region of the Apple bundle (default: en)
    pub ios_base_localization_region: Option<String>,

    /// Metadata artifacts of upstream passes, in link order
    pub input_metadata: Option<Vec<PathBuf>>,

    /// Output locations
    pub output: Option<OutputConfig>,
}

/// An ancestor source set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct UpperSourceSetConfig {
    pub name: String,
    pub path: PathBuf,
}

/// Output locations of a pass.
///
/// `root` supplies the conventional layout; explicit entries override it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub root: Option<PathBuf>,
    pub resources_dir: Option<PathBuf>,
    pub assets_dir: Option<PathBuf>,
    pub sources_dir: Option<PathBuf>,
    pub metadata_file: Option<PathBuf>,
}

impl GenerationFile {
    /// Parse a generation file from TOML text.
    pub fn parse(path: &Path, contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Overlay `overrides` onto this file, field by field.
    pub fn overlay(self, overrides: GenerationFile) -> GenerationFile {
        GenerationFile {
            source_set: overrides.source_set.or(self.source_set),
            own_resources: overrides.own_resources.or(self.own_resources),
            upper_source_sets: overrides.upper_source_sets.or(self.upper_source_sets),
            platform: overrides.platform.or(self.platform),
            apple_target: overrides.apple_target.or(self.apple_target),
            package_name: overrides.package_name.or(self.package_name),
            class_name: overrides.class_name.or(self.class_name),
            visibility: overrides.visibility.or(self.visibility),
            strict_line_breaks: overrides.strict_line_breaks.or(self.strict_line_breaks),
            android_r_class_package: overrides
                .android_r_class_package
                .or(self.android_r_class_package),
            ios_base_localization_region: overrides
                .ios_base_localization_region
                .or(self.ios_base_localization_region),
            input_metadata: overrides.input_metadata.or(self.input_metadata),
            output: match (self.output, overrides.output) {
                (Some(base), Some(over)) => Some(base.overlay(over)),
                (base, over) => over.or(base),
            },
        }
    }

    /// Resolve relative paths against `base_dir`.
    pub fn rebase(mut self, base_dir: &Path) -> Self {
        let join = |path: PathBuf| {
            if path.is_absolute() {
                path
            } else {
                base_dir.join(path)
            }
        };

        self.own_resources = self.own_resources.map(join);
        self.upper_source_sets = self.upper_source_sets.map(|uppers| {
            uppers
                .into_iter()
                .map(|upper| UpperSourceSetConfig {
                    name: upper.name,
                    path: join(upper.path),
                })
                .collect()
        });
        self.input_metadata = self
            .input_metadata
            .map(|paths| paths.into_iter().map(join).collect());
        self.output = self.output.map(|output| OutputConfig {
            root: output.root.map(join),
            resources_dir: output.resources_dir.map(join),
            assets_dir: output.assets_dir.map(join),
            sources_dir: output.sources_dir.map(join),
            metadata_file: output.metadata_file.map(join),
        });
        self
    }

    /// Validate values that do not depend on other fields.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for an unrecognized visibility or
    /// a duplicated upper source set.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(visibility) = &self.visibility {
            if Visibility::parse(visibility).is_none() {
                return Err(ConfigError::InvalidValue(format!(
                    "invalid visibility '{visibility}', must be one of: public, internal"
                )));
            }
        }

        if let Some(uppers) = &self.upper_source_sets {
            for (index, upper) in uppers.iter().enumerate() {
                if uppers[..index].iter().any(|u| u.name == upper.name) {
                    return Err(ConfigError::InvalidValue(format!(
                        "upper source set '{}' is listed twice",
                        upper.name
                    )));
                }
                if Some(&upper.name) == self.source_set.as_ref() {
                    return Err(ConfigError::InvalidValue(format!(
                        "source set '{}' cannot be its own upper source set",
                        upper.name
                    )));
                }
            }
        }

        Ok(())
    }
}

impl OutputConfig {
    /// Overlay `overrides` field by field. An overriding `root` relocates
    /// the whole layout, dropping the explicit paths set underneath it.
    fn overlay(self, overrides: OutputConfig) -> OutputConfig {
        let base = if overrides.root.is_some() {
            OutputConfig::default()
        } else {
            self
        };
        OutputConfig {
            root: overrides.root.or(base.root),
            resources_dir: overrides.resources_dir.or(base.resources_dir),
            assets_dir: overrides.assets_dir.or(base.assets_dir),
            sources_dir: overrides.sources_dir.or(base.sources_dir),
            metadata_file: overrides.metadata_file.or(base.metadata_file),
        }
    }
}
