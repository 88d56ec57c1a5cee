//! engine::runner
//!
//! The single entry point for a generation pass.
//!
//! # Lifecycle
//!
//! ```text
//! Init -> Collect -> BuildPerKind -> Merge -> GenerateNative -> GenerateContainer -> Persist -> Done
//! ```
//!
//! A common pass runs the generation stages through no-op generators, so
//! its native output directories stay empty.
//!
//! # Invariants
//!
//! - Linked artifacts are read before the outputs are cleared, so a prior
//!   artifact may live inside this pass's output tree
//! - Outputs are cleared before anything is written
//! - The metadata artifact is written last; a failure in any earlier stage
//!   clears the outputs again, so a failed pass leaves no artifact and no
//!   partial native output behind
//! - Identical inputs produce byte-identical outputs
//!
//! # Example
//!
//! ```no_run
//! use polyres::core::config::{GenerationConfig, GenerationFile};
//! use polyres::engine::runner::run;
//!
//! let config = GenerationConfig::load(None, GenerationFile::default()).unwrap();
//! match run(&config) {
//!     Ok(outcome) => println!("{} files", outcome.written.len()),
//!     Err(failure) => eprintln!("{failure}"),
//! }
//! ```

use std::collections::HashSet;
use std::path::PathBuf;

use thiserror::Error;

use crate::builder::{
    build_fragments, BuildError, ColorsBuilder, ImagesBuilder, MetadataBuilder, PluralsBuilder,
    StringsBuilder,
};
use crate::core::config::{ConfigError, GenerationConfig};
use crate::core::merge::{
    merge_fragments, Fragment, MergeError, Mergeable, MergedResources, ResourceEntry,
};
use crate::core::metadata::{
    read_artifacts, write_artifact, ColorMetadata, ContainerMetadata, ImageMetadata,
    MetadataArtifact, MetadataError, ObjectKind, ObjectMetadata, PluralMetadata, StoreError,
    StringMetadata,
};
use crate::engine::collect::{collect, CollectError, CollectedSourceSet};
use crate::platform::{GenerateError, GeneratorSet, PlatformError};

/// Stages of a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Init,
    Collect,
    BuildPerKind,
    Merge,
    GenerateNative,
    GenerateContainer,
    Persist,
    Done,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Init => "init",
            Stage::Collect => "collect",
            Stage::BuildPerKind => "build",
            Stage::Merge => "merge",
            Stage::GenerateNative => "generate-native",
            Stage::GenerateContainer => "generate-container",
            Stage::Persist => "persist",
            Stage::Done => "done",
        };
        write!(f, "{name}")
    }
}

/// Broad class of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Resource files are malformed or conflicting
    Input,
    /// Linked metadata is unreadable, corrupt or incompatible
    Linking,
    /// A platform cannot represent the merged resources
    Generation,
    /// Configuration is missing or contradictory
    Configuration,
    /// Outputs could not be written
    Output,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorCategory::Input => "input",
            ErrorCategory::Linking => "linking",
            ErrorCategory::Generation => "generation",
            ErrorCategory::Configuration => "configuration",
            ErrorCategory::Output => "output",
        };
        write!(f, "{name}")
    }
}

/// Errors from a pass.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error(transparent)]
    Collect(#[from] CollectError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Merge(#[from] MergeError),

    #[error("cannot link against prior metadata: {0}")]
    Link(#[source] StoreError),

    #[error(transparent)]
    Generate(#[from] GenerateError),

    #[error("failed to assemble metadata: {0}")]
    Metadata(#[from] MetadataError),

    #[error("failed to prepare output '{path}': {source}")]
    Output {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to persist metadata: {0}")]
    Persist(#[source] StoreError),
}

impl RunError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            RunError::Config(_) | RunError::Platform(_) => ErrorCategory::Configuration,
            RunError::Collect(_) | RunError::Build(_) | RunError::Merge(_) => ErrorCategory::Input,
            RunError::Link(_) => ErrorCategory::Linking,
            RunError::Generate(_) | RunError::Metadata(_) => ErrorCategory::Generation,
            RunError::Output { .. } | RunError::Persist(_) => ErrorCategory::Output,
        }
    }
}

/// A failed pass: the error and the stage it occurred in.
#[derive(Debug, Error)]
#[error("[{}] {stage} failed: {error}", .error.category())]
pub struct StageFailure {
    pub stage: Stage,
    #[source]
    pub error: RunError,
}

impl StageFailure {
    pub fn category(&self) -> ErrorCategory {
        self.error.category()
    }
}

/// Result of a successful pass.
#[derive(Debug)]
pub struct RunOutcome {
    /// The persisted artifact
    pub artifact: MetadataArtifact,
    /// Native files written, in generation order
    pub written: Vec<PathBuf>,
    /// Stages entered, in order
    pub stages: Vec<Stage>,
}

/// Run one pass.
///
/// # Errors
///
/// Returns a [`StageFailure`] naming the failing stage. Outputs are cleared
/// before returning so nothing of the failed pass remains.
pub fn run(config: &GenerationConfig) -> Result<RunOutcome, StageFailure> {
    let mut pass = Pass {
        config,
        stage: Stage::Init,
        stages: Vec::new(),
    };

    pass.execute().map_err(|error| {
        let stage = pass.stage;
        tracing::debug!(%stage, category = %error.category(), "pass failed, clearing outputs");
        if let Err(e) = config.output.clear() {
            tracing::error!(error = %e, "failed to clear outputs after failed pass");
        }
        StageFailure { stage, error }
    })
}

struct Pass<'a> {
    config: &'a GenerationConfig,
    stage: Stage,
    stages: Vec<Stage>,
}

impl Pass<'_> {
    fn enter(&mut self, stage: Stage) {
        tracing::debug!(%stage, source_set = %self.config.source_set, "entering stage");
        self.stage = stage;
        self.stages.push(stage);
    }

    fn execute(&mut self) -> Result<RunOutcome, RunError> {
        let config = self.config;

        self.enter(Stage::Init);
        let generators = GeneratorSet::for_platform(&config.platform, &config.generator_settings())?;

        self.enter(Stage::Collect);
        let linked = read_artifacts(&config.input_metadata).map_err(RunError::Link)?;
        config.output.clear().map_err(|source| RunError::Output {
            path: config.output.resources_dir.clone(),
            source,
        })?;
        let collected = collect(&config.resource_files())?;

        self.enter(Stage::BuildPerKind);
        let built = BuiltFragments::build(config, &collected)?;

        self.enter(Stage::Merge);
        let merged = MergedResources {
            strings: merge_kind(&linked, built.strings)?,
            plurals: merge_kind(&linked, built.plurals)?,
            images: merge_kind(&linked, built.images)?,
            colors: merge_kind(&linked, built.colors)?,
        };
        let containers = assemble_containers(config, &linked, &merged);
        let objects: Vec<&ObjectMetadata> =
            containers.iter().flat_map(ContainerMetadata::objects).collect();

        self.enter(Stage::GenerateNative);
        let mut written = generators.generate_resources(&merged)?;

        self.enter(Stage::GenerateContainer);
        written.extend(generators.container.generate(&objects)?);

        self.enter(Stage::Persist);
        let artifact =
            MetadataArtifact::new(config.source_set.clone(), config.platform.name(), containers)?;
        write_artifact(&config.output.metadata_file, &artifact).map_err(RunError::Persist)?;

        self.enter(Stage::Done);
        tracing::info!(
            source_set = %config.source_set,
            platform = %config.platform,
            entries = merged.len(),
            files = written.len(),
            linked = linked.len(),
            "generation pass complete"
        );

        Ok(RunOutcome {
            artifact,
            written,
            stages: std::mem::take(&mut self.stages),
        })
    }
}

/// Fragments of every kind, one per source set, least specific first.
struct BuiltFragments {
    strings: Vec<Fragment<StringMetadata>>,
    plurals: Vec<Fragment<PluralMetadata>>,
    images: Vec<Fragment<ImageMetadata>>,
    colors: Vec<Fragment<ColorMetadata>>,
}

impl BuiltFragments {
    fn build(
        config: &GenerationConfig,
        collected: &[CollectedSourceSet],
    ) -> Result<Self, BuildError> {
        Ok(Self {
            strings: build_kind(&StringsBuilder::new(config.strict_line_breaks), collected)?,
            plurals: build_kind(&PluralsBuilder::new(config.strict_line_breaks), collected)?,
            images: build_kind(&ImagesBuilder, collected)?,
            colors: build_kind(&ColorsBuilder, collected)?,
        })
    }
}

fn build_kind<B: MetadataBuilder>(
    builder: &B,
    collected: &[CollectedSourceSet],
) -> Result<Vec<Fragment<B::Entry>>, BuildError> {
    let fragments = build_fragments(builder, collected)?;
    let kind = <B::Entry as Mergeable>::RESOURCE_TYPE;
    tracing::debug!(
        %kind,
        entries = fragments.iter().map(|f| f.entries.len()).sum::<usize>(),
        "built fragments"
    );
    Ok(fragments)
}

/// Merge one kind: linked entries form the least specific layer, in the
/// order the artifacts were given.
fn merge_kind<T: ResourceEntry>(
    linked: &[MetadataArtifact],
    own: Vec<Fragment<T>>,
) -> Result<Vec<T>, MergeError> {
    let prior = linked.iter().map(|artifact| {
        let entries = artifact
            .objects()
            .into_iter()
            .flat_map(|object| object.values.iter())
            .filter_map(T::from_metadata)
            .cloned()
            .collect();
        Fragment::new(artifact.source_set.clone(), entries)
    });
    merge_fragments(prior.chain(own))
}

/// One object per kind, named `<package>.<class>.<kind>`.
///
/// An object already present in linked metadata becomes `Actual`; a new
/// one is `Expect` on a common pass and `Plain` otherwise. New objects
/// without entries are omitted.
fn assemble_containers(
    config: &GenerationConfig,
    linked: &[MetadataArtifact],
    merged: &MergedResources,
) -> Vec<ContainerMetadata> {
    let linked_names: HashSet<&str> = linked
        .iter()
        .flat_map(MetadataArtifact::objects)
        .map(|object| object.name.as_str())
        .collect();

    let objects = [
        object_of(config, &linked_names, &merged.strings),
        object_of(config, &linked_names, &merged.plurals),
        object_of(config, &linked_names, &merged.images),
        object_of(config, &linked_names, &merged.colors),
    ];
    objects
        .into_iter()
        .flatten()
        .map(ContainerMetadata::Object)
        .collect()
}

fn object_of<T: ResourceEntry>(
    config: &GenerationConfig,
    linked_names: &HashSet<&str>,
    entries: &[T],
) -> Option<ObjectMetadata> {
    let resource_type = T::RESOURCE_TYPE;
    let name = config.object_name(resource_type);
    let kind = if linked_names.contains(name.as_str()) {
        ObjectKind::Actual
    } else if config.platform.is_common() {
        ObjectKind::Expect
    } else {
        ObjectKind::Plain
    };

    if entries.is_empty() && kind != ObjectKind::Actual {
        return None;
    }

    Some(ObjectMetadata {
        name,
        resource_type,
        kind,
        visibility: config.visibility,
        values: entries.iter().cloned().map(T::into_metadata).collect(),
        nested: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{GenerationFile, OutputConfig, UpperSourceSetConfig};
    use crate::core::metadata::{read_artifact, ResourceType};
    use crate::core::types::LocaleTag;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, contents: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn config(temp: &TempDir, platform: &str, source_set: &str) -> GenerationConfig {
        GenerationConfig::resolve(GenerationFile {
            source_set: Some(source_set.into()),
            own_resources: Some(temp.path().join(source_set)),
            platform: Some(platform.into()),
            package_name: Some("com.example".into()),
            android_r_class_package: Some("com.example.android".into()),
            output: Some(OutputConfig {
                root: Some(temp.path().join("build").join(source_set)),
                ..Default::default()
            }),
            ..Default::default()
        })
        .unwrap()
    }

    mod stages {
        use super::*;

        #[test]
        fn full_lifecycle_recorded() {
            let temp = TempDir::new().unwrap();
            let outcome = run(&config(&temp, "common", "commonMain")).unwrap();
            assert_eq!(
                outcome.stages,
                vec![
                    Stage::Init,
                    Stage::Collect,
                    Stage::BuildPerKind,
                    Stage::Merge,
                    Stage::GenerateNative,
                    Stage::GenerateContainer,
                    Stage::Persist,
                    Stage::Done,
                ]
            );
            assert!(outcome.artifact.containers.is_empty());
        }

        #[test]
        fn failure_names_stage_and_category() {
            let temp = TempDir::new().unwrap();
            write(
                temp.path(),
                "commonMain/base/strings.xml",
                "<resources><string name=\"a\">x</resources>",
            );
            let failure = run(&config(&temp, "common", "commonMain")).unwrap_err();
            assert_eq!(failure.stage, Stage::BuildPerKind);
            assert_eq!(failure.category(), ErrorCategory::Input);
        }

        #[test]
        fn corrupt_link_input() {
            let temp = TempDir::new().unwrap();
            let bogus = temp.path().join("bogus.json");
            fs::write(&bogus, "{}").unwrap();
            let mut config = config(&temp, "jvm", "jvmMain");
            config.input_metadata = vec![bogus];

            let failure = run(&config).unwrap_err();
            assert_eq!(failure.stage, Stage::Collect);
            assert_eq!(failure.category(), ErrorCategory::Linking);
            assert!(!config.output.metadata_file.exists());
        }
    }

    mod linking {
        use super::*;

        #[test]
        fn expect_then_actual() {
            let temp = TempDir::new().unwrap();
            write(
                temp.path(),
                "commonMain/base/strings.xml",
                r#"<resources><string name="greeting">Hello</string></resources>"#,
            );
            write(
                temp.path(),
                "jvmMain/fr/strings.xml",
                r#"<resources><string name="greeting">Bonjour</string></resources>"#,
            );

            let common = config(&temp, "common", "commonMain");
            let common_outcome = run(&common).unwrap();
            let expect = common_outcome.artifact.objects();
            assert_eq!(expect.len(), 1);
            assert_eq!(expect[0].kind, ObjectKind::Expect);
            assert_eq!(expect[0].name, "com.example.MR.strings");

            let mut jvm = config(&temp, "jvm", "jvmMain");
            jvm.input_metadata = vec![common.output.metadata_file.clone()];
            let outcome = run(&jvm).unwrap();

            let objects = outcome.artifact.objects();
            assert_eq!(objects[0].kind, ObjectKind::Actual);
            let string = match &objects[0].values[0] {
                crate::core::metadata::ResourceMetadata::String(s) => s,
                other => panic!("unexpected entry {other:?}"),
            };
            assert_eq!(string.values[&LocaleTag::base()], "Hello");
            assert_eq!(string.values[&LocaleTag::new("fr").unwrap()], "Bonjour");
            assert!(jvm
                .output
                .resources_dir
                .join("localization/comexample_MR_strings_fr.properties")
                .is_file());
            assert!(jvm.output.sources_dir.join("MR.holder.json").is_file());
        }

        #[test]
        fn prior_artifact_inside_outputs_is_read_before_clearing() {
            let temp = TempDir::new().unwrap();
            write(
                temp.path(),
                "jvmMain/base/strings.xml",
                r#"<resources><string name="greeting">Hello</string></resources>"#,
            );

            let first = config(&temp, "jvm", "jvmMain");
            run(&first).unwrap();
            let prior = first.output.resources_dir.join("prior.json");
            fs::copy(&first.output.metadata_file, &prior).unwrap();

            let mut second = config(&temp, "jvm", "jvmMain");
            second.input_metadata = vec![prior.clone()];
            let outcome = run(&second).unwrap();

            let objects = outcome.artifact.objects();
            assert_eq!(objects.len(), 1);
            assert_eq!(objects[0].kind, ObjectKind::Actual);
            assert!(!prior.exists());
            assert!(second.output.metadata_file.is_file());
        }

        #[test]
        fn new_object_on_target_is_plain() {
            let temp = TempDir::new().unwrap();
            write(
                temp.path(),
                "jsMain/colors.xml",
                "<resources><color name=\"accent\">#336699</color></resources>",
            );
            let outcome = run(&config(&temp, "js", "jsMain")).unwrap();
            let objects = outcome.artifact.objects();
            assert_eq!(objects[0].kind, ObjectKind::Plain);
            assert_eq!(objects[0].resource_type, ResourceType::Colors);
        }
    }

    mod precedence {
        use super::*;

        #[test]
        fn upper_chain_merges_least_specific_first() {
            let temp = TempDir::new().unwrap();
            write(
                temp.path(),
                "commonMain/colors.xml",
                "<resources><color name=\"accent\">#000000</color></resources>",
            );
            write(
                temp.path(),
                "appleMain/colors.xml",
                "<resources><color name=\"accent\">#111111</color></resources>",
            );
            write(
                temp.path(),
                "iosMain/colors.xml",
                "<resources><color name=\"other\">#222222</color></resources>",
            );

            let mut file = GenerationFile {
                source_set: Some("iosMain".into()),
                own_resources: Some(temp.path().join("iosMain")),
                platform: Some("common".into()),
                package_name: Some("com.example".into()),
                output: Some(OutputConfig {
                    root: Some(temp.path().join("build")),
                    ..Default::default()
                }),
                ..Default::default()
            };
            file.upper_source_sets = Some(vec![
                UpperSourceSetConfig {
                    name: "appleMain".into(),
                    path: temp.path().join("appleMain"),
                },
                UpperSourceSetConfig {
                    name: "commonMain".into(),
                    path: temp.path().join("commonMain"),
                },
            ]);
            let config = GenerationConfig::resolve(file).unwrap();

            let outcome = run(&config).unwrap();

            let artifact = read_artifact(&config.output.metadata_file).unwrap();
            assert_eq!(artifact, outcome.artifact);
            let colors = &artifact.objects()[0].values;
            assert_eq!(colors.len(), 2);
            match &colors[0] {
                crate::core::metadata::ResourceMetadata::Color(color) => {
                    assert_eq!(color.key.as_str(), "accent");
                    assert_eq!(color.value.light().to_string(), "#111111FF");
                }
                other => panic!("unexpected entry {other:?}"),
            }
        }
    }
}
