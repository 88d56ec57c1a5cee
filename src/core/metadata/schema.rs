//! core::metadata::schema
//!
//! Resource metadata schema (v1).
//!
//! # Schema Design
//!
//! A metadata artifact is:
//! - Self-describing with `kind` and `schema_version`
//! - Fingerprinted, so a corrupted or hand-edited artifact is detected
//! - Strictly parsed (unknown fields rejected)
//!
//! # Tree Shape
//!
//! The merged resource graph is a list of [`ContainerMetadata`] nodes. An
//! [`ObjectMetadata`] groups the entries of one resource kind under a
//! qualified name (`<package>.<class>.<kind>`), which is the linking key
//! between passes. [`NamespaceMetadata`] groups further containers.
//!
//! All maps are insertion ordered, so serializing the same tree twice
//! yields identical bytes.
//!
//! # Example
//!
//! ```
//! use polyres::core::metadata::schema::{
//!     parse_artifact, ContainerMetadata, MetadataArtifact, ObjectKind, ObjectMetadata,
//!     ResourceMetadata, ResourceType, StringMetadata, Visibility,
//! };
//! use polyres::core::types::{LocaleTag, ResourceKey, SourceSetName};
//!
//! let mut greeting = StringMetadata::new(ResourceKey::new("greeting").unwrap());
//! greeting.values.insert(LocaleTag::base(), "Hello".to_string());
//!
//! let object = ObjectMetadata {
//!     name: "com.example.MR.strings".to_string(),
//!     resource_type: ResourceType::Strings,
//!     kind: ObjectKind::Expect,
//!     visibility: Visibility::Public,
//!     values: vec![ResourceMetadata::String(greeting)],
//!     nested: Vec::new(),
//! };
//!
//! let artifact = MetadataArtifact::new(
//!     SourceSetName::new("commonMain").unwrap(),
//!     "common",
//!     vec![ContainerMetadata::Object(object)],
//! )
//! .unwrap();
//!
//! let json = artifact.to_json().unwrap();
//! let parsed = parse_artifact(&json).unwrap();
//! assert_eq!(parsed, artifact);
//! ```

use std::path::PathBuf;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::types::{
    Fingerprint, LocaleTag, ResourceKey, Rgba, ScaleQualifier, SourceSetName,
};

/// The kind identifier for metadata artifacts.
pub const METADATA_KIND: &str = "polyres.resource-metadata";

/// Current schema version.
pub const SCHEMA_VERSION: u32 = 1;

/// Errors from metadata operations.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("failed to parse metadata: {0}")]
    ParseError(String),

    #[error("failed to serialize metadata: {0}")]
    SerializeError(String),

    #[error("invalid kind '{found}', expected '{}'", METADATA_KIND)]
    InvalidKind { found: String },

    #[error("unsupported schema version {0}, supported: {SCHEMA_VERSION}")]
    UnsupportedVersion(u32),

    #[error("fingerprint mismatch: recorded {recorded}, computed {computed}")]
    FingerprintMismatch { recorded: String, computed: String },

    #[error("container '{container}' holds {found} entry '{key}' but is declared as {expected}")]
    KindMismatch {
        container: String,
        key: String,
        expected: ResourceType,
        found: ResourceType,
    },

    #[error("container '{container}' declares key '{key}' more than once")]
    DuplicateKey { container: String, key: String },
}

/// The four resource kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    Strings,
    Plurals,
    Images,
    Colors,
}

impl ResourceType {
    /// All kinds, in generation order.
    pub const ALL: [ResourceType; 4] = [
        ResourceType::Strings,
        ResourceType::Plurals,
        ResourceType::Images,
        ResourceType::Colors,
    ];

    /// Lowercase name, as used in qualified container names.
    pub fn name(&self) -> &'static str {
        match self {
            ResourceType::Strings => "strings",
            ResourceType::Plurals => "plurals",
            ResourceType::Images => "images",
            ResourceType::Colors => "colors",
        }
    }
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Visibility of the generated accessors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Public,
    Internal,
}

impl Visibility {
    /// Parse a visibility from configuration.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "public" => Some(Visibility::Public),
            "internal" => Some(Visibility::Internal),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Internal => "internal",
        }
    }
}

/// How an object relates to the same object in linked metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    /// Declared by a common pass; platform passes must provide it.
    Expect,
    /// Provides an object already declared in linked metadata.
    Actual,
    /// Standalone object with no counterpart.
    Plain,
}

impl ObjectKind {
    pub fn name(&self) -> &'static str {
        match self {
            ObjectKind::Expect => "expect",
            ObjectKind::Actual => "actual",
            ObjectKind::Plain => "plain",
        }
    }
}

/// A node of the merged resource tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContainerMetadata {
    Object(ObjectMetadata),
    Namespace(NamespaceMetadata),
}

impl ContainerMetadata {
    /// Stable qualified name of the container.
    pub fn name(&self) -> &str {
        match self {
            ContainerMetadata::Object(object) => &object.name,
            ContainerMetadata::Namespace(namespace) => &namespace.name,
        }
    }

    /// Entries held directly by this container.
    pub fn values(&self) -> &[ResourceMetadata] {
        match self {
            ContainerMetadata::Object(object) => &object.values,
            ContainerMetadata::Namespace(namespace) => &namespace.values,
        }
    }

    /// Containers nested directly under this one.
    pub fn nested(&self) -> &[ContainerMetadata] {
        match self {
            ContainerMetadata::Object(object) => &object.nested,
            ContainerMetadata::Namespace(namespace) => &namespace.nested,
        }
    }

    /// This container and every container below it, depth first.
    pub fn walk(&self) -> Vec<&ContainerMetadata> {
        let mut out = vec![self];
        for child in self.nested() {
            out.extend(child.walk());
        }
        out
    }

    /// Every object in this subtree, depth first.
    pub fn objects(&self) -> Vec<&ObjectMetadata> {
        self.walk()
            .into_iter()
            .filter_map(|container| match container {
                ContainerMetadata::Object(object) => Some(object),
                ContainerMetadata::Namespace(_) => None,
            })
            .collect()
    }

    fn validate(&self) -> Result<(), MetadataError> {
        let mut seen = std::collections::HashSet::new();
        for entry in self.values() {
            if !seen.insert((entry.resource_type(), entry.key())) {
                return Err(MetadataError::DuplicateKey {
                    container: self.name().to_string(),
                    key: entry.key().to_string(),
                });
            }
            if let ContainerMetadata::Object(object) = self {
                if entry.resource_type() != object.resource_type {
                    return Err(MetadataError::KindMismatch {
                        container: object.name.clone(),
                        key: entry.key().to_string(),
                        expected: object.resource_type,
                        found: entry.resource_type(),
                    });
                }
            }
        }
        self.nested().iter().try_for_each(ContainerMetadata::validate)
    }
}

/// A named bundle of entries of a single resource kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObjectMetadata {
    /// Qualified name, the linking key across passes
    pub name: String,

    /// Kind of every entry in `values`
    pub resource_type: ResourceType,

    /// Relation to linked metadata
    pub kind: ObjectKind,

    /// Accessor visibility
    pub visibility: Visibility,

    /// Entries, in declaration order
    pub values: Vec<ResourceMetadata>,

    /// Nested containers
    #[serde(default)]
    pub nested: Vec<ContainerMetadata>,
}

/// A named grouping of containers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NamespaceMetadata {
    pub name: String,
    #[serde(default)]
    pub values: Vec<ResourceMetadata>,
    #[serde(default)]
    pub nested: Vec<ContainerMetadata>,
}

/// One resource entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResourceMetadata {
    String(StringMetadata),
    Plural(PluralMetadata),
    Image(ImageMetadata),
    Color(ColorMetadata),
}

impl ResourceMetadata {
    /// Key of the entry.
    pub fn key(&self) -> &ResourceKey {
        match self {
            ResourceMetadata::String(entry) => &entry.key,
            ResourceMetadata::Plural(entry) => &entry.key,
            ResourceMetadata::Image(entry) => &entry.key,
            ResourceMetadata::Color(entry) => &entry.key,
        }
    }

    /// Kind of the entry.
    pub fn resource_type(&self) -> ResourceType {
        match self {
            ResourceMetadata::String(_) => ResourceType::Strings,
            ResourceMetadata::Plural(_) => ResourceType::Plurals,
            ResourceMetadata::Image(_) => ResourceType::Images,
            ResourceMetadata::Color(_) => ResourceType::Colors,
        }
    }
}

/// A translated string: locale to text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StringMetadata {
    pub key: ResourceKey,
    pub values: IndexMap<LocaleTag, String>,
}

impl StringMetadata {
    pub fn new(key: ResourceKey) -> Self {
        Self {
            key,
            values: IndexMap::new(),
        }
    }
}

/// CLDR plural category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quantity {
    Zero,
    One,
    Two,
    Few,
    Many,
    Other,
}

impl Quantity {
    /// Parse a quantity attribute value.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "zero" => Some(Quantity::Zero),
            "one" => Some(Quantity::One),
            "two" => Some(Quantity::Two),
            "few" => Some(Quantity::Few),
            "many" => Some(Quantity::Many),
            "other" => Some(Quantity::Other),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Quantity::Zero => "zero",
            Quantity::One => "one",
            Quantity::Two => "two",
            Quantity::Few => "few",
            Quantity::Many => "many",
            Quantity::Other => "other",
        }
    }
}

impl std::fmt::Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Quantity rules of one locale.
pub type PluralForms = IndexMap<Quantity, String>;

/// A pluralized string: locale to quantity rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PluralMetadata {
    pub key: ResourceKey,
    pub values: IndexMap<LocaleTag, PluralForms>,
}

impl PluralMetadata {
    pub fn new(key: ResourceKey) -> Self {
        Self {
            key,
            values: IndexMap::new(),
        }
    }
}

/// Encoding of an image file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageFormat {
    Png,
    Jpg,
    Svg,
}

impl ImageFormat {
    /// Format for a file extension, case-insensitive.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(ImageFormat::Png),
            "jpg" | "jpeg" => Some(ImageFormat::Jpg),
            "svg" => Some(ImageFormat::Svg),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpg => "jpg",
            ImageFormat::Svg => "svg",
        }
    }
}

/// Reference to an image file on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImageSource {
    pub path: PathBuf,
    pub format: ImageFormat,
}

/// An image: scale qualifier to file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImageMetadata {
    pub key: ResourceKey,
    pub values: IndexMap<ScaleQualifier, ImageSource>,
}

impl ImageMetadata {
    pub fn new(key: ResourceKey) -> Self {
        Self {
            key,
            values: IndexMap::new(),
        }
    }
}

/// A color, optionally varying with the appearance mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case", deny_unknown_fields)]
pub enum ColorValue {
    Single { color: Rgba },
    Themed { light: Rgba, dark: Rgba },
}

impl ColorValue {
    /// The color used in light mode (or the only color).
    pub fn light(&self) -> Rgba {
        match self {
            ColorValue::Single { color } => *color,
            ColorValue::Themed { light, .. } => *light,
        }
    }

    /// The dark mode variant, if any.
    pub fn dark(&self) -> Option<Rgba> {
        match self {
            ColorValue::Single { .. } => None,
            ColorValue::Themed { dark, .. } => Some(*dark),
        }
    }
}

/// A color entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColorMetadata {
    pub key: ResourceKey,
    pub value: ColorValue,
}

/// Envelope for version dispatch before full parsing.
#[derive(Debug, Deserialize)]
struct ArtifactEnvelope {
    kind: String,
    schema_version: u32,
}

/// Parse an artifact with version dispatch and integrity checks.
///
/// # Errors
///
/// Returns an error if:
/// - The JSON is malformed or has unknown fields
/// - The `kind` field doesn't match [`METADATA_KIND`]
/// - The `schema_version` is not supported
/// - The recorded fingerprint doesn't match the containers
/// - A container holds duplicate keys or entries of a foreign kind
pub fn parse_artifact(json: &str) -> Result<MetadataArtifact, MetadataError> {
    let envelope: ArtifactEnvelope =
        serde_json::from_str(json).map_err(|e| MetadataError::ParseError(e.to_string()))?;

    if envelope.kind != METADATA_KIND {
        return Err(MetadataError::InvalidKind {
            found: envelope.kind,
        });
    }

    match envelope.schema_version {
        1 => {
            let artifact: MetadataArtifact =
                serde_json::from_str(json).map_err(|e| MetadataError::ParseError(e.to_string()))?;
            artifact.validate()?;
            Ok(artifact)
        }
        v => Err(MetadataError::UnsupportedVersion(v)),
    }
}

/// The persisted result of one pass (v1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetadataArtifact {
    /// Kind identifier (always [`METADATA_KIND`])
    pub kind: String,

    /// Schema version (always 1 for this struct)
    pub schema_version: u32,

    /// Source set that produced the artifact
    pub source_set: SourceSetName,

    /// Platform of the producing pass
    pub platform: String,

    /// SHA-256 of the compact JSON of `containers`
    pub fingerprint: Fingerprint,

    /// The merged resource tree
    pub containers: Vec<ContainerMetadata>,
}

impl MetadataArtifact {
    /// Wrap a container tree, computing its fingerprint.
    pub fn new(
        source_set: SourceSetName,
        platform: impl Into<String>,
        containers: Vec<ContainerMetadata>,
    ) -> Result<Self, MetadataError> {
        let fingerprint = Self::fingerprint_of(&containers)?;
        Ok(Self {
            kind: METADATA_KIND.to_string(),
            schema_version: SCHEMA_VERSION,
            source_set,
            platform: platform.into(),
            fingerprint,
            containers,
        })
    }

    fn fingerprint_of(containers: &[ContainerMetadata]) -> Result<Fingerprint, MetadataError> {
        let canonical = serde_json::to_vec(containers)
            .map_err(|e| MetadataError::SerializeError(e.to_string()))?;
        Ok(Fingerprint::compute(&canonical))
    }

    /// Validate envelope fields, fingerprint and container structure.
    pub fn validate(&self) -> Result<(), MetadataError> {
        if self.kind != METADATA_KIND {
            return Err(MetadataError::InvalidKind {
                found: self.kind.clone(),
            });
        }
        if self.schema_version != SCHEMA_VERSION {
            return Err(MetadataError::UnsupportedVersion(self.schema_version));
        }

        let computed = Self::fingerprint_of(&self.containers)?;
        if computed != self.fingerprint {
            return Err(MetadataError::FingerprintMismatch {
                recorded: self.fingerprint.to_string(),
                computed: computed.to_string(),
            });
        }

        self.containers
            .iter()
            .try_for_each(ContainerMetadata::validate)
    }

    /// Every object in the tree, depth first.
    pub fn objects(&self) -> Vec<&ObjectMetadata> {
        self.containers
            .iter()
            .flat_map(ContainerMetadata::objects)
            .collect()
    }

    /// Serialize to pretty JSON with a trailing newline.
    pub fn to_json(&self) -> Result<String, MetadataError> {
        let mut json = serde_json::to_string_pretty(self)
            .map_err(|e| MetadataError::SerializeError(e.to_string()))?;
        json.push('\n');
        Ok(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(name: &str) -> ResourceKey {
        ResourceKey::new(name).unwrap()
    }

    fn strings_object(values: Vec<ResourceMetadata>) -> ObjectMetadata {
        ObjectMetadata {
            name: "app.MR.strings".to_string(),
            resource_type: ResourceType::Strings,
            kind: ObjectKind::Plain,
            visibility: Visibility::Public,
            values,
            nested: Vec::new(),
        }
    }

    fn greeting() -> ResourceMetadata {
        let mut entry = StringMetadata::new(key("greeting"));
        entry.values.insert(LocaleTag::base(), "Hello".into());
        entry
            .values
            .insert(LocaleTag::new("fr").unwrap(), "Bonjour".into());
        ResourceMetadata::String(entry)
    }

    fn artifact(containers: Vec<ContainerMetadata>) -> MetadataArtifact {
        MetadataArtifact::new(SourceSetName::new("commonMain").unwrap(), "common", containers)
            .unwrap()
    }

    mod parse_artifact_fn {
        use super::*;

        #[test]
        fn roundtrip_preserves_order() {
            let original = artifact(vec![ContainerMetadata::Object(strings_object(vec![
                greeting(),
            ]))]);
            let parsed = parse_artifact(&original.to_json().unwrap()).unwrap();

            assert_eq!(parsed, original);
            let ResourceMetadata::String(entry) = &parsed.objects()[0].values[0] else {
                panic!("expected string entry");
            };
            let locales: Vec<_> = entry.values.keys().map(LocaleTag::as_str).collect();
            assert_eq!(locales, ["base", "fr"]);
        }

        #[test]
        fn invalid_kind() {
            let json = r#"{ "kind": "something-else", "schema_version": 1 }"#;
            assert!(matches!(
                parse_artifact(json),
                Err(MetadataError::InvalidKind { .. })
            ));
        }

        #[test]
        fn unsupported_version() {
            let json = r#"{ "kind": "polyres.resource-metadata", "schema_version": 7 }"#;
            assert!(matches!(
                parse_artifact(json),
                Err(MetadataError::UnsupportedVersion(7))
            ));
        }

        #[test]
        fn malformed_json() {
            assert!(matches!(
                parse_artifact("{ not json"),
                Err(MetadataError::ParseError(_))
            ));
        }

        #[test]
        fn tampered_content_detected() {
            let original = artifact(vec![ContainerMetadata::Object(strings_object(vec![
                greeting(),
            ]))]);
            let json = original.to_json().unwrap().replace("Bonjour", "Salut");

            assert!(matches!(
                parse_artifact(&json),
                Err(MetadataError::FingerprintMismatch { .. })
            ));
        }

        #[test]
        fn unknown_fields_rejected() {
            let original = artifact(Vec::new());
            let json = original
                .to_json()
                .unwrap()
                .replacen("\"platform\"", "\"surprise\": true,\n  \"platform\"", 1);

            assert!(matches!(
                parse_artifact(&json),
                Err(MetadataError::ParseError(_))
            ));
        }
    }

    mod validate {
        use super::*;

        #[test]
        fn duplicate_keys_rejected() {
            let tree = artifact(vec![ContainerMetadata::Object(strings_object(vec![
                greeting(),
                greeting(),
            ]))]);
            assert!(matches!(
                tree.validate(),
                Err(MetadataError::DuplicateKey { .. })
            ));
        }

        #[test]
        fn foreign_entry_kind_rejected() {
            let color = ResourceMetadata::Color(ColorMetadata {
                key: key("accent"),
                value: ColorValue::Single {
                    color: Rgba::parse("#FF0000").unwrap(),
                },
            });
            let tree = artifact(vec![ContainerMetadata::Object(strings_object(vec![color]))]);

            assert!(matches!(
                tree.validate(),
                Err(MetadataError::KindMismatch {
                    expected: ResourceType::Strings,
                    found: ResourceType::Colors,
                    ..
                })
            ));
        }

        #[test]
        fn nested_containers_are_checked() {
            let inner = ContainerMetadata::Object(strings_object(vec![greeting(), greeting()]));
            let tree = artifact(vec![ContainerMetadata::Namespace(NamespaceMetadata {
                name: "app".into(),
                values: Vec::new(),
                nested: vec![inner],
            })]);

            assert!(tree.validate().is_err());
        }
    }

    mod container_metadata {
        use super::*;

        #[test]
        fn objects_walks_nested_namespaces() {
            let tree = ContainerMetadata::Namespace(NamespaceMetadata {
                name: "app".into(),
                values: Vec::new(),
                nested: vec![
                    ContainerMetadata::Object(strings_object(vec![greeting()])),
                    ContainerMetadata::Namespace(NamespaceMetadata {
                        name: "app.inner".into(),
                        values: Vec::new(),
                        nested: vec![ContainerMetadata::Object(strings_object(Vec::new()))],
                    }),
                ],
            });

            assert_eq!(tree.objects().len(), 2);
            assert_eq!(tree.walk().len(), 4);
        }
    }

    mod color_value {
        use super::*;

        #[test]
        fn single_has_no_dark_variant() {
            let red = Rgba::parse("#FF0000").unwrap();
            let value = ColorValue::Single { color: red };
            assert_eq!(value.light(), red);
            assert_eq!(value.dark(), None);
        }

        #[test]
        fn themed_serializes_with_mode_tag() {
            let value = ColorValue::Themed {
                light: Rgba::parse("#FFFFFF").unwrap(),
                dark: Rgba::parse("#000000").unwrap(),
            };
            let json = serde_json::to_string(&value).unwrap();
            assert_eq!(
                json,
                r##"{"mode":"themed","light":"#FFFFFFFF","dark":"#000000FF"}"##
            );
        }
    }

    mod quantity {
        use super::*;

        #[test]
        fn parse_known() {
            assert_eq!(Quantity::parse("few"), Some(Quantity::Few));
            assert_eq!(Quantity::parse("other"), Some(Quantity::Other));
        }

        #[test]
        fn parse_unknown() {
            assert_eq!(Quantity::parse("several"), None);
            assert_eq!(Quantity::parse("One"), None);
        }
    }
}
