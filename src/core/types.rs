//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`ResourceKey`] - Identifier of a resource entry inside its container
//! - [`LocaleTag`] - Locale of a translated value (`base` is the default locale)
//! - [`SourceSetName`] - Name of a source set contributing resources
//! - [`PackageName`] / [`ClassName`] - Identity of the generated resource holder
//! - [`ScaleQualifier`] - Density/scale variant of an image
//! - [`Rgba`] - A color value
//! - [`Fingerprint`] - Content hash of a metadata artifact
//!
//! # Validation
//!
//! These types enforce validity at construction time. Invalid values
//! cannot be represented, so downstream generators never re-check them.
//!
//! # Examples
//!
//! ```
//! use polyres::core::types::{LocaleTag, PackageName, ResourceKey};
//!
//! let key = ResourceKey::new("greeting").unwrap();
//! let locale = LocaleTag::new("en-US").unwrap();
//! let package = PackageName::new("com.example.app").unwrap();
//!
//! assert_eq!(locale.region(), Some("US"));
//! assert_eq!(package.flat_name(), "comexampleapp");
//!
//! assert!(ResourceKey::new("1st").is_err());
//! assert!(LocaleTag::new("english").is_err());
//! ```

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid resource key '{0}': must be an identifier")]
    InvalidResourceKey(String),

    #[error("invalid locale tag '{0}'")]
    InvalidLocale(String),

    #[error("invalid source set name '{0}'")]
    InvalidSourceSetName(String),

    #[error("invalid package name '{0}'")]
    InvalidPackageName(String),

    #[error("invalid class name '{0}'")]
    InvalidClassName(String),

    #[error("invalid scale qualifier '{0}'")]
    InvalidScale(String),

    #[error("invalid color '{0}': expected #RRGGBB or #RRGGBBAA")]
    InvalidColor(String),
}

/// Implements the string conversions shared by every validated string newtype.
macro_rules! string_newtype {
    ($name:ident) => {
        impl $name {
            /// Get the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeError;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                Self::new(s)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Identifier of a resource entry.
///
/// Keys become accessor names downstream, so they must be identifiers:
/// an ASCII letter or `_` followed by ASCII letters, digits or `_`.
///
/// # Example
///
/// ```
/// use polyres::core::types::ResourceKey;
///
/// let key = ResourceKey::new("app_name").unwrap();
/// assert!(key.is_lowercase());
///
/// assert!(ResourceKey::new("").is_err());
/// assert!(ResourceKey::new("has-dash").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ResourceKey(String);

impl ResourceKey {
    /// Create a new validated resource key.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidResourceKey` if the key is not an identifier.
    pub fn new(key: impl Into<String>) -> Result<Self, TypeError> {
        let key = key.into();
        if !is_identifier(&key) {
            return Err(TypeError::InvalidResourceKey(key));
        }
        Ok(Self(key))
    }

    /// Whether the key contains no uppercase letters.
    ///
    /// File-based Android resources only accept lowercase names.
    pub fn is_lowercase(&self) -> bool {
        !self.0.chars().any(|c| c.is_ascii_uppercase())
    }
}

string_newtype!(ResourceKey);

/// Locale of a translated value.
///
/// Either the default locale `base`, or a tag of the form
/// `language[-Script][-REGION]`: a 2-3 letter lowercase language, an optional
/// 4 letter titlecase script and an optional 2 letter uppercase (or 3 digit)
/// region.
///
/// # Example
///
/// ```
/// use polyres::core::types::LocaleTag;
///
/// assert!(LocaleTag::base().is_base());
///
/// let tag = LocaleTag::new("zh-Hans-CN").unwrap();
/// assert_eq!(tag.language(), Some("zh"));
/// assert_eq!(tag.script(), Some("Hans"));
/// assert_eq!(tag.region(), Some("CN"));
///
/// assert!(LocaleTag::new("en_US").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LocaleTag(String);

impl LocaleTag {
    /// The tag of the default locale.
    pub const BASE: &'static str = "base";

    /// Create a new validated locale tag.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidLocale` if the tag is malformed.
    pub fn new(tag: impl Into<String>) -> Result<Self, TypeError> {
        let tag = tag.into();
        if tag != Self::BASE && !Self::is_well_formed(&tag) {
            return Err(TypeError::InvalidLocale(tag));
        }
        Ok(Self(tag))
    }

    /// The default locale.
    pub fn base() -> Self {
        Self(Self::BASE.to_string())
    }

    /// Whether this is the default locale.
    pub fn is_base(&self) -> bool {
        self.0 == Self::BASE
    }

    fn is_well_formed(tag: &str) -> bool {
        let mut parts = tag.split('-');
        let language_ok = parts.next().is_some_and(|lang| {
            (2..=3).contains(&lang.len()) && lang.chars().all(|c| c.is_ascii_lowercase())
        });
        if !language_ok {
            return false;
        }

        let rest: Vec<&str> = parts.collect();
        match rest.as_slice() {
            [] => true,
            [one] => Self::is_script(one) || Self::is_region(one),
            [script, region] => Self::is_script(script) && Self::is_region(region),
            _ => false,
        }
    }

    fn is_script(s: &str) -> bool {
        let mut chars = s.chars();
        s.len() == 4
            && chars.next().is_some_and(|c| c.is_ascii_uppercase())
            && chars.all(|c| c.is_ascii_lowercase())
    }

    fn is_region(s: &str) -> bool {
        (s.len() == 2 && s.chars().all(|c| c.is_ascii_uppercase()))
            || (s.len() == 3 && s.chars().all(|c| c.is_ascii_digit()))
    }

    /// The language subtag, or `None` for the default locale.
    pub fn language(&self) -> Option<&str> {
        if self.is_base() {
            return None;
        }
        self.0.split('-').next()
    }

    /// The script subtag, if any.
    pub fn script(&self) -> Option<&str> {
        self.0.split('-').skip(1).find(|part| Self::is_script(part))
    }

    /// The region subtag, if any.
    pub fn region(&self) -> Option<&str> {
        self.0.split('-').skip(1).find(|part| Self::is_region(part))
    }
}

string_newtype!(LocaleTag);

/// Name of a source set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SourceSetName(String);

impl SourceSetName {
    /// Create a new validated source set name.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidSourceSetName` if the name is empty or
    /// contains characters other than ASCII alphanumerics, `_` and `-`.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        if name.is_empty()
            || !name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(TypeError::InvalidSourceSetName(name));
        }
        Ok(Self(name))
    }
}

string_newtype!(SourceSetName);

/// Dotted package of the generated resource holder.
///
/// # Example
///
/// ```
/// use polyres::core::types::PackageName;
///
/// let package = PackageName::new("com.example.shared").unwrap();
/// assert_eq!(package.flat_name(), "comexampleshared");
///
/// assert!(PackageName::new("com..example").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PackageName(String);

impl PackageName {
    /// Create a new validated package name.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidPackageName` unless every dot-separated
    /// segment is an identifier.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        if !name.split('.').all(is_identifier) {
            return Err(TypeError::InvalidPackageName(name));
        }
        Ok(Self(name))
    }

    /// The package with its dots removed.
    ///
    /// Used where a package must become part of a single file name.
    pub fn flat_name(&self) -> String {
        self.0.replace('.', "")
    }
}

string_newtype!(PackageName);

/// Name of the generated resource holder class.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClassName(String);

impl ClassName {
    /// The class name used when none is configured.
    pub const DEFAULT: &'static str = "MR";

    /// Create a new validated class name.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidClassName` if the name is not an identifier.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        if !is_identifier(&name) {
            return Err(TypeError::InvalidClassName(name));
        }
        Ok(Self(name))
    }
}

impl Default for ClassName {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

string_newtype!(ClassName);

/// Density/scale variant of an image.
///
/// Raster images carry a scale such as `1x`, `1.5x` or `3x`; vector images
/// use the `vector` qualifier.
///
/// # Example
///
/// ```
/// use polyres::core::types::ScaleQualifier;
///
/// let scale = ScaleQualifier::new("2x").unwrap();
/// assert_eq!(scale.file_suffix(), "@2x");
/// assert_eq!(ScaleQualifier::default_raster().file_suffix(), "");
/// assert!(ScaleQualifier::vector().is_vector());
///
/// assert!(ScaleQualifier::new("2").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ScaleQualifier(String);

impl ScaleQualifier {
    const VECTOR: &'static str = "vector";
    const DEFAULT_RASTER: &'static str = "1x";

    /// Create a new validated scale qualifier.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidScale` unless the value is `vector` or a
    /// positive decimal followed by `x`.
    pub fn new(value: impl Into<String>) -> Result<Self, TypeError> {
        let value = value.into();
        if value == Self::VECTOR {
            return Ok(Self(value));
        }
        let valid = value
            .strip_suffix('x')
            .filter(|number| {
                !number.is_empty()
                    && !number.starts_with('.')
                    && !number.ends_with('.')
                    && number.chars().all(|c| c.is_ascii_digit() || c == '.')
                    && number.matches('.').count() <= 1
            })
            .is_some();
        if !valid {
            return Err(TypeError::InvalidScale(value));
        }
        Ok(Self(value))
    }

    /// The qualifier of vector images.
    pub fn vector() -> Self {
        Self(Self::VECTOR.to_string())
    }

    /// The qualifier of an unsuffixed raster image (`1x`).
    pub fn default_raster() -> Self {
        Self(Self::DEFAULT_RASTER.to_string())
    }

    /// Whether this is the vector qualifier.
    pub fn is_vector(&self) -> bool {
        self.0 == Self::VECTOR
    }

    /// The file name suffix encoding this scale (`@2x`), empty for `1x` and
    /// vector images.
    pub fn file_suffix(&self) -> String {
        if self.is_vector() || self.0 == Self::DEFAULT_RASTER {
            String::new()
        } else {
            format!("@{}", self.0)
        }
    }
}

string_newtype!(ScaleQualifier);

/// A color value, stored as `0xRRGGBBAA`.
///
/// Serialized as `#RRGGBBAA`.
///
/// # Example
///
/// ```
/// use polyres::core::types::Rgba;
///
/// let color = Rgba::parse("#3366FF").unwrap();
/// assert_eq!(color.alpha(), 0xFF);
/// assert_eq!(color.to_string(), "#3366FFFF");
/// assert_eq!(color.to_argb_hex(), "#FF3366FF");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba(u32);

impl Rgba {
    /// Parse `#RRGGBB` (opaque) or `#RRGGBBAA`.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidColor` for any other shape.
    pub fn parse(value: &str) -> Result<Self, TypeError> {
        let invalid = || TypeError::InvalidColor(value.to_string());
        let hex = value.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let raw = u32::from_str_radix(hex, 16).map_err(|_| invalid())?;
        match hex.len() {
            6 => Ok(Self((raw << 8) | 0xFF)),
            8 => Ok(Self(raw)),
            _ => Err(invalid()),
        }
    }

    /// Create from individual channels.
    pub fn from_channels(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self(u32::from_be_bytes([red, green, blue, alpha]))
    }

    pub fn red(&self) -> u8 {
        self.0.to_be_bytes()[0]
    }

    pub fn green(&self) -> u8 {
        self.0.to_be_bytes()[1]
    }

    pub fn blue(&self) -> u8 {
        self.0.to_be_bytes()[2]
    }

    pub fn alpha(&self) -> u8 {
        self.0.to_be_bytes()[3]
    }

    /// The raw `0xRRGGBBAA` value.
    pub fn rgba(&self) -> u32 {
        self.0
    }

    /// Format as `#AARRGGBB`, the channel order Android expects.
    pub fn to_argb_hex(&self) -> String {
        format!(
            "#{:02X}{:02X}{:02X}{:02X}",
            self.alpha(),
            self.red(),
            self.green(),
            self.blue()
        )
    }
}

impl TryFrom<String> for Rgba {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Rgba> for String {
    fn from(color: Rgba) -> Self {
        color.to_string()
    }
}

impl std::fmt::Display for Rgba {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:08X}", self.0)
    }
}

/// SHA-256 content hash, hex encoded.
///
/// Used to detect corrupted or hand-edited metadata artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Compute the fingerprint of a byte string.
    pub fn compute(bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        Self(hex::encode(hasher.finalize()))
    }

    /// Get the fingerprint as a hex string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
