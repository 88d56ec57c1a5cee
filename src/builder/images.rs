//! builder::images
//!
//! Builds image entries from files under `images/`.
//!
//! The file name encodes key and scale: `logo.png` is the `1x` variant of
//! `logo`, `logo@2x.png` its `2x` variant, and `logo.svg` its vector
//! variant. Subdirectories of `images/` only organize files; they are not
//! part of the key.

use std::path::{Path, PathBuf};

use super::{BuildError, Declarations, FileContext, MetadataBuilder};
use crate::core::metadata::{ImageFormat, ImageMetadata, ImageSource, ResourceType};
use crate::core::types::{ResourceKey, ScaleQualifier, SourceSetName};

/// Builder for image resources.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImagesBuilder;

impl MetadataBuilder for ImagesBuilder {
    type Entry = ImageMetadata;

    fn build(
        &self,
        source_set: &SourceSetName,
        _root: &Path,
        files: &[PathBuf],
    ) -> Result<Vec<ImageMetadata>, BuildError> {
        let mut declarations = Declarations::new(source_set, ResourceType::Images);

        for path in files {
            let context = FileContext::new(source_set, ResourceType::Images, path);
            let (key, qualifier, format) = parse_file_name(path).map_err(|m| context.malformed(m))?;
            let source = ImageSource {
                path: path.clone(),
                format,
            };
            declarations.declare(key, qualifier, source, path)?;
        }

        Ok(declarations.into_entries(|key, values| ImageMetadata { key, values }))
    }
}

fn parse_file_name(path: &Path) -> Result<(ResourceKey, ScaleQualifier, ImageFormat), String> {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().into_owned())
        .unwrap_or_default();
    let format = ImageFormat::from_extension(&extension)
        .ok_or_else(|| format!("unsupported image extension '{extension}'"))?;
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();

    let (name, qualifier) = match stem.rsplit_once('@') {
        Some((name, scale)) => {
            if format == ImageFormat::Svg {
                return Err(format!("vector image '{stem}' cannot carry a scale suffix"));
            }
            let qualifier = ScaleQualifier::new(scale).map_err(|e| e.to_string())?;
            (name.to_string(), qualifier)
        }
        None if format == ImageFormat::Svg => (stem, ScaleQualifier::vector()),
        None => (stem, ScaleQualifier::default_raster()),
    };

    let key = ResourceKey::new(name).map_err(|e| e.to_string())?;
    Ok((key, qualifier, format))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    mod file_names {
        use super::*;

        #[test]
        fn raster_scales() {
            let (key, qualifier, format) = parse_file_name(Path::new("images/logo@2x.png")).unwrap();
            assert_eq!(key.as_str(), "logo");
            assert_eq!(qualifier.as_str(), "2x");
            assert_eq!(format, ImageFormat::Png);

            let (_, qualifier, _) = parse_file_name(Path::new("images/logo.jpg")).unwrap();
            assert_eq!(qualifier, ScaleQualifier::default_raster());
        }

        #[test]
        fn vector() {
            let (key, qualifier, _) = parse_file_name(Path::new("images/icons/home.svg")).unwrap();
            assert_eq!(key.as_str(), "home");
            assert!(qualifier.is_vector());
        }

        #[test]
        fn rejected_names() {
            assert!(parse_file_name(Path::new("images/home@2x.svg")).is_err());
            assert!(parse_file_name(Path::new("images/logo@big.png")).is_err());
            assert!(parse_file_name(Path::new("images/logo.gif")).is_err());
            assert!(parse_file_name(Path::new("images/2logo.png")).is_err());
        }
    }

    mod build {
        use super::*;

        fn touch(root: &Path, relative: &str) -> PathBuf {
            let path = root.join(relative);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, b"img").unwrap();
            path
        }

        #[test]
        fn variants_grouped_by_key() {
            let temp = TempDir::new().unwrap();
            let files = vec![
                touch(temp.path(), "images/logo.png"),
                touch(temp.path(), "images/logo@2x.png"),
                touch(temp.path(), "images/logo@3x.png"),
                touch(temp.path(), "images/star.svg"),
            ];

            let entries = ImagesBuilder
                .build(&SourceSetName::new("commonMain").unwrap(), temp.path(), &files)
                .unwrap();

            assert_eq!(entries.len(), 2);
            assert_eq!(entries[0].values.len(), 3);
            assert_eq!(
                entries[0].values[&ScaleQualifier::new("2x").unwrap()].path,
                temp.path().join("images/logo@2x.png")
            );
        }

        #[test]
        fn same_scale_twice() {
            let temp = TempDir::new().unwrap();
            let files = vec![
                touch(temp.path(), "images/logo.png"),
                touch(temp.path(), "images/other/logo.jpg"),
            ];

            let err = ImagesBuilder
                .build(&SourceSetName::new("commonMain").unwrap(), temp.path(), &files)
                .unwrap_err();
            assert!(matches!(err, BuildError::Duplicate { .. }));
        }
    }
}
