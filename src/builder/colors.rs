//! builder::colors
//!
//! Builds color entries from `colors*.xml` files.
//!
//! ```xml
//! <resources>
//!     <color name="accent">#3366FF</color>
//!     <color name="surface">
//!         <light>#FFFFFF</light>
//!         <dark>#121212CC</dark>
//!     </color>
//! </resources>
//! ```
//!
//! Colors are not localized; the directory a file sits in is ignored.

use std::path::{Path, PathBuf};

use super::{BuildError, Declarations, FileContext, MetadataBuilder};
use crate::core::metadata::{ColorMetadata, ColorValue, ResourceType};
use crate::core::types::{Rgba, SourceSetName};

/// Qualifier of every color declaration; colors have exactly one value.
const FLAT: &str = "value";

/// Builder for color resources.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorsBuilder;

impl MetadataBuilder for ColorsBuilder {
    type Entry = ColorMetadata;

    fn build(
        &self,
        source_set: &SourceSetName,
        _root: &Path,
        files: &[PathBuf],
    ) -> Result<Vec<ColorMetadata>, BuildError> {
        let mut declarations = Declarations::new(source_set, ResourceType::Colors);

        for path in files {
            let context = FileContext::new(source_set, ResourceType::Colors, path);
            let document = context.read_resources()?;

            for element in document.elements() {
                if element.name != "color" {
                    return Err(context.malformed(format!(
                        "unexpected element <{}>, expected <color>",
                        element.name
                    )));
                }
                let key = context.key_of(element)?;
                let parse = |text: &str| {
                    Rgba::parse(text.trim())
                        .map_err(|e| context.malformed(format!("color '{key}': {e}")))
                };

                let themes: Vec<_> = element.elements().collect();
                let value = if themes.is_empty() {
                    ColorValue::Single {
                        color: parse(&element.text())?,
                    }
                } else {
                    let theme = |name: &str| {
                        themes
                            .iter()
                            .find(|e| e.name == name)
                            .map(|e| e.text())
                            .ok_or_else(|| {
                                context.malformed(format!("color '{key}' is missing <{name}>"))
                            })
                    };
                    let unexpected = themes.iter().find(|e| e.name != "light" && e.name != "dark");
                    if let Some(other) = unexpected {
                        return Err(context.malformed(format!(
                            "color '{key}' has unexpected element <{}>",
                            other.name
                        )));
                    }
                    ColorValue::Themed {
                        light: parse(&theme("light")?)?,
                        dark: parse(&theme("dark")?)?,
                    }
                };

                declarations.declare(key, FLAT, value, path)?;
            }
        }

        Ok(declarations
            .into_entries(|key, values| {
                values
                    .into_values()
                    .next()
                    .map(|value| ColorMetadata { key, value })
            })
            .into_iter()
            .flatten()
            .collect())
    }
}
