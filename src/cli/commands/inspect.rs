//! inspect command - Show the contents of metadata artifacts

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::core::metadata::{read_artifact, MetadataArtifact, ObjectMetadata};
use crate::engine::Context;
use crate::ui::output;
use anyhow::Result;

#[derive(Debug, Serialize)]
struct ArtifactSummary<'a> {
    path: &'a Path,
    source_set: &'a str,
    platform: &'a str,
    fingerprint: String,
    objects: Vec<ObjectSummary<'a>>,
}

#[derive(Debug, Serialize)]
struct ObjectSummary<'a> {
    name: &'a str,
    resource_type: &'static str,
    kind: &'static str,
    visibility: &'static str,
    keys: Vec<&'a str>,
}

impl<'a> ArtifactSummary<'a> {
    fn new(path: &'a Path, artifact: &'a MetadataArtifact) -> Self {
        Self {
            path,
            source_set: artifact.source_set.as_str(),
            platform: &artifact.platform,
            fingerprint: artifact.fingerprint.to_string(),
            objects: artifact.objects().into_iter().map(ObjectSummary::new).collect(),
        }
    }
}

impl<'a> ObjectSummary<'a> {
    fn new(object: &'a ObjectMetadata) -> Self {
        Self {
            name: &object.name,
            resource_type: object.resource_type.name(),
            kind: object.kind.name(),
            visibility: object.visibility.name(),
            keys: object.values.iter().map(|value| value.key().as_str()).collect(),
        }
    }
}

/// Read and validate each artifact, then list its objects.
pub fn inspect(ctx: &Context, paths: &[PathBuf], json: bool) -> Result<()> {
    let artifacts = paths
        .iter()
        .map(|path| read_artifact(path))
        .collect::<Result<Vec<_>, _>>()?;
    let summaries: Vec<_> = paths
        .iter()
        .zip(&artifacts)
        .map(|(path, artifact)| ArtifactSummary::new(path, artifact))
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    let verbosity = ctx.verbosity();
    for summary in &summaries {
        output::print(summary.path.display(), verbosity);
        output::print(format!("  source set:  {}", summary.source_set), verbosity);
        output::print(format!("  platform:    {}", summary.platform), verbosity);
        output::print(format!("  fingerprint: {}", summary.fingerprint), verbosity);
        if summary.objects.is_empty() {
            output::print("  (no objects)", verbosity);
        }
        for object in &summary.objects {
            output::print(
                format!(
                    "  {} [{}, {}, {}]",
                    object.name, object.resource_type, object.kind, object.visibility
                ),
                verbosity,
            );
            output::print(output::format_list(&object.keys, "    - "), verbosity);
        }
    }
    Ok(())
}
