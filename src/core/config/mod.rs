//! core::config
//!
//! Configuration schema and loading.
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Generation file
//! 3. CLI flags
//!
//! # Generation File Location
//!
//! Searched in order:
//! 1. The path given with `--config`
//! 2. `$POLYRES_CONFIG` if set
//! 3. `polyres.toml` in the working directory
//!
//! No file at all is fine as long as flags supply every required value.
//!
//! # Example
//!
//! ```no_run
//! use polyres::core::config::{GenerationConfig, GenerationFile};
//! use std::path::Path;
//!
//! let config =
//!     GenerationConfig::load(Some(Path::new("polyres.toml")), GenerationFile::default()).unwrap();
//! println!("{} -> {}", config.source_set, config.platform);
//! ```

pub mod schema;

pub use schema::{GenerationFile, OutputConfig, UpperSourceSetConfig};

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::metadata::Visibility;
use crate::core::paths::OutputPaths;
use crate::core::types::{ClassName, LocaleTag, PackageName, SourceSetName, TypeError};
use crate::engine::collect::{ResourceFiles, SourceSetResources};
use crate::platform::{GeneratorSettings, Platform, PlatformError};

/// Environment variable naming the generation file.
pub const CONFIG_ENV: &str = "POLYRES_CONFIG";

/// Conventional generation file name.
pub const CONFIG_FILE_NAME: &str = "polyres.toml";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("missing required setting '{0}'")]
    Missing(&'static str),

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    #[error(transparent)]
    Type(#[from] TypeError),

    #[error(transparent)]
    Platform(#[from] PlatformError),
}

/// An ancestor source set with its resources directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpperSourceSet {
    pub name: SourceSetName,
    pub root: PathBuf,
}

/// Fully resolved and validated configuration of one pass.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    pub source_set: SourceSetName,
    pub own_resources: PathBuf,
    /// Nearest ancestor first
    pub upper_source_sets: Vec<UpperSourceSet>,
    pub platform: Platform,
    pub package: PackageName,
    pub class_name: ClassName,
    pub visibility: Visibility,
    pub strict_line_breaks: bool,
    pub android_r_class_package: Option<PackageName>,
    pub base_localization_region: LocaleTag,
    pub input_metadata: Vec<PathBuf>,
    pub output: OutputPaths,
    /// Generation file the values came from, if any
    pub loaded_from: Option<PathBuf>,
}

impl GenerationConfig {
    const DEFAULT_BASE_REGION: &'static str = "en";

    /// Locate and read the generation file, overlay `overrides` and resolve.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the
    /// combined values are incomplete or invalid.
    pub fn load(explicit: Option<&Path>, overrides: GenerationFile) -> Result<Self, ConfigError> {
        let located = Self::locate(explicit);
        let file = match &located {
            Some(path) => Self::read_file(path)?,
            None => GenerationFile::default(),
        };

        tracing::debug!(
            config = ?located.as_ref().map(|p| p.display().to_string()),
            "resolving generation config"
        );
        let mut config = Self::resolve(file.overlay(overrides))?;
        config.loaded_from = located;
        Ok(config)
    }

    fn locate(explicit: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }
        let local = PathBuf::from(CONFIG_FILE_NAME);
        local.exists().then_some(local)
    }

    /// Read a generation file, resolving its relative paths.
    pub fn read_file(path: &Path) -> Result<GenerationFile, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        let file = GenerationFile::parse(path, &contents)?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(file.rebase(base_dir))
    }

    /// Validate a generation file and turn it into a configuration.
    ///
    /// # Errors
    ///
    /// - `Missing` if a required setting is absent
    /// - `Type` if a name fails validation
    /// - `Platform` if the platform or Apple target is unusable
    /// - `InvalidValue` for other bad values
    pub fn resolve(file: GenerationFile) -> Result<Self, ConfigError> {
        file.validate()?;

        let platform_name = file.platform.as_deref().ok_or(ConfigError::Missing("platform"))?;
        let platform = Platform::resolve(platform_name, file.apple_target.as_deref())?;

        let source_set = SourceSetName::new(file.source_set.ok_or(ConfigError::Missing("source_set"))?)?;
        let own_resources = file.own_resources.ok_or(ConfigError::Missing("own_resources"))?;
        let package = PackageName::new(file.package_name.ok_or(ConfigError::Missing("package_name"))?)?;
        let class_name = match file.class_name {
            Some(name) => ClassName::new(name)?,
            None => ClassName::default(),
        };
        let visibility = match file.visibility.as_deref() {
            Some(value) => Visibility::parse(value).ok_or_else(|| {
                ConfigError::InvalidValue(format!("invalid visibility '{value}'"))
            })?,
            None => Visibility::default(),
        };

        let android_r_class_package = file
            .android_r_class_package
            .map(PackageName::new)
            .transpose()?;
        if platform == Platform::Android && android_r_class_package.is_none() {
            return Err(ConfigError::Missing("android_r_class_package"));
        }

        let base_localization_region = LocaleTag::new(
            file.ios_base_localization_region
                .unwrap_or_else(|| Self::DEFAULT_BASE_REGION.to_string()),
        )?;
        if base_localization_region.is_base() {
            return Err(ConfigError::InvalidValue(
                "ios_base_localization_region must name a real locale".to_string(),
            ));
        }

        let upper_source_sets = file
            .upper_source_sets
            .unwrap_or_default()
            .into_iter()
            .map(|upper| {
                Ok(UpperSourceSet {
                    name: SourceSetName::new(upper.name)?,
                    root: upper.path,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(Self {
            source_set,
            own_resources,
            upper_source_sets,
            platform,
            package,
            class_name,
            visibility,
            strict_line_breaks: file.strict_line_breaks.unwrap_or(false),
            android_r_class_package,
            base_localization_region,
            input_metadata: file.input_metadata.unwrap_or_default(),
            output: Self::resolve_output(file.output.unwrap_or_default())?,
            loaded_from: None,
        })
    }

    fn resolve_output(output: OutputConfig) -> Result<OutputPaths, ConfigError> {
        let conventional = output.root.map(OutputPaths::under);
        let pick = |explicit: Option<PathBuf>,
                    from_root: Option<&PathBuf>,
                    name: &'static str|
         -> Result<PathBuf, ConfigError> {
            explicit
                .or_else(|| from_root.cloned())
                .ok_or(ConfigError::Missing(name))
        };

        let paths = OutputPaths {
            resources_dir: pick(
                output.resources_dir,
                conventional.as_ref().map(|c| &c.resources_dir),
                "output.resources_dir",
            )?,
            assets_dir: pick(
                output.assets_dir,
                conventional.as_ref().map(|c| &c.assets_dir),
                "output.assets_dir",
            )?,
            sources_dir: pick(
                output.sources_dir,
                conventional.as_ref().map(|c| &c.sources_dir),
                "output.sources_dir",
            )?,
            metadata_file: pick(
                output.metadata_file,
                conventional.as_ref().map(|c| &c.metadata_file),
                "output.metadata_file",
            )?,
        };

        let dirs = paths.dirs();
        for (index, dir) in dirs.iter().enumerate() {
            if dirs[..index].contains(dir) {
                return Err(ConfigError::InvalidValue(format!(
                    "output directory '{}' is used twice",
                    dir.display()
                )));
            }
        }
        Ok(paths)
    }

    /// Resource directories of this pass, own and ancestors.
    pub fn resource_files(&self) -> ResourceFiles {
        ResourceFiles {
            own: SourceSetResources::new(self.source_set.clone(), self.own_resources.clone()),
            upper: self
                .upper_source_sets
                .iter()
                .map(|upper| SourceSetResources::new(upper.name.clone(), upper.root.clone()))
                .collect(),
        }
    }

    /// Settings handed to the platform generators.
    pub fn generator_settings(&self) -> GeneratorSettings {
        GeneratorSettings {
            package: self.package.clone(),
            class_name: self.class_name.clone(),
            android_r_class_package: self.android_r_class_package.clone(),
            base_localization_region: self.base_localization_region.clone(),
            output: self.output.clone(),
        }
    }

    /// Qualified name of the object holding entries of one kind.
    pub fn object_name(&self, kind: crate::core::metadata::ResourceType) -> String {
        format!("{}.{}.{}", self.package, self.class_name, kind.name())
    }
}
