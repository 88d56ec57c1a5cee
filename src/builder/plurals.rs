//! builder::plurals
//!
//! Builds plural entries from `plurals*.xml` files.
//!
//! ```xml
//! <resources>
//!     <plural name="items">
//!         <item quantity="one">%d item</item>
//!         <item quantity="other">%d items</item>
//!     </plural>
//! </resources>
//! ```
//!
//! Every plural must define the `other` quantity.

use std::path::{Path, PathBuf};

use super::strings::normalize_text;
use super::{BuildError, Declarations, FileContext, MetadataBuilder};
use crate::core::metadata::{PluralForms, PluralMetadata, Quantity, ResourceType};
use crate::core::types::SourceSetName;

/// Builder for plural resources.
#[derive(Debug, Clone, Copy, Default)]
pub struct PluralsBuilder {
    pub strict_line_breaks: bool,
}

impl PluralsBuilder {
    pub fn new(strict_line_breaks: bool) -> Self {
        Self { strict_line_breaks }
    }
}

impl MetadataBuilder for PluralsBuilder {
    type Entry = PluralMetadata;

    fn build(
        &self,
        source_set: &SourceSetName,
        root: &Path,
        files: &[PathBuf],
    ) -> Result<Vec<PluralMetadata>, BuildError> {
        let mut declarations = Declarations::new(source_set, ResourceType::Plurals);

        for path in files {
            let context = FileContext::new(source_set, ResourceType::Plurals, path);
            let locale = context.locale(root)?;
            let document = context.read_resources()?;

            for plural in document.elements() {
                if plural.name != "plural" {
                    return Err(context.malformed(format!(
                        "unexpected element <{}>, expected <plural>",
                        plural.name
                    )));
                }
                let key = context.key_of(plural)?;

                let mut forms = PluralForms::new();
                for item in plural.elements() {
                    let quantity = item
                        .attribute("quantity")
                        .and_then(Quantity::parse)
                        .ok_or_else(|| {
                            context.malformed(format!(
                                "plural '{key}' has an item without a valid quantity"
                            ))
                        })?;
                    let text = normalize_text(&item.text(), self.strict_line_breaks).map_err(
                        |message| context.malformed(format!("plural '{key}': {message}")),
                    )?;
                    if forms.insert(quantity, text).is_some() {
                        return Err(context.malformed(format!(
                            "plural '{key}' defines quantity '{quantity}' twice"
                        )));
                    }
                }
                if !forms.contains_key(&Quantity::Other) {
                    return Err(context.malformed(format!(
                        "plural '{key}' is missing the 'other' quantity"
                    )));
                }

                declarations.declare(key, locale.clone(), forms, path)?;
            }
        }

        Ok(declarations.into_entries(|key, values| PluralMetadata { key, values }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::LocaleTag;
    use std::fs;
    use tempfile::TempDir;

    fn build(files: &[(&str, &str)]) -> Result<Vec<PluralMetadata>, BuildError> {
        let temp = TempDir::new().unwrap();
        let paths: Vec<PathBuf> = files
            .iter()
            .map(|(relative, contents)| {
                let path = temp.path().join(relative);
                fs::create_dir_all(path.parent().unwrap()).unwrap();
                fs::write(&path, contents).unwrap();
                path
            })
            .collect();
        PluralsBuilder::default().build(
            &SourceSetName::new("commonMain").unwrap(),
            temp.path(),
            &paths,
        )
    }

    #[test]
    fn quantities_per_locale() {
        let entries = build(&[
            (
                "base/plurals.xml",
                r#"<resources>
                    <plural name="items">
                        <item quantity="one">%d item</item>
                        <item quantity="other">%d items</item>
                    </plural>
                </resources>"#,
            ),
            (
                "ru/plurals.xml",
                r#"<resources>
                    <plural name="items">
                        <item quantity="one">%d предмет</item>
                        <item quantity="few">%d предмета</item>
                        <item quantity="other">%d предметов</item>
                    </plural>
                </resources>"#,
            ),
        ])
        .unwrap();

        assert_eq!(entries.len(), 1);
        let ru = &entries[0].values[&LocaleTag::new("ru").unwrap()];
        assert_eq!(ru.len(), 3);
        assert_eq!(ru[&Quantity::Few], "%d предмета");
        let base = &entries[0].values[&LocaleTag::base()];
        assert_eq!(
            base.keys().copied().collect::<Vec<_>>(),
            [Quantity::One, Quantity::Other]
        );
    }

    #[test]
    fn other_is_required() {
        let err = build(&[(
            "base/plurals.xml",
            r#"<resources><plural name="items"><item quantity="one">1</item></plural></resources>"#,
        )])
        .unwrap_err();
        assert!(err.to_string().contains("other"));
    }

    #[test]
    fn unknown_quantity() {
        assert!(build(&[(
            "base/plurals.xml",
            r#"<resources><plural name="items"><item quantity="several">x</item></plural></resources>"#,
        )])
        .is_err());
    }

    #[test]
    fn repeated_quantity() {
        assert!(build(&[(
            "base/plurals.xml",
            r#"<resources><plural name="n">
                <item quantity="other">a</item>
                <item quantity="other">b</item>
            </plural></resources>"#,
        )])
        .is_err());
    }
}
