//! builder::strings
//!
//! Builds string entries from `strings*.xml` files.
//!
//! ```xml
//! <resources>
//!     <string name="greeting">Hello,\nworld</string>
//! </resources>
//! ```
//!
//! The file's parent directory names its locale (`base/strings.xml`,
//! `fr/strings.xml`).

use std::path::{Path, PathBuf};

use super::{BuildError, Declarations, FileContext, MetadataBuilder};
use crate::core::metadata::{ResourceType, StringMetadata};
use crate::core::types::SourceSetName;

/// Builder for string resources.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringsBuilder {
    pub strict_line_breaks: bool,
}

impl StringsBuilder {
    pub fn new(strict_line_breaks: bool) -> Self {
        Self { strict_line_breaks }
    }
}

impl MetadataBuilder for StringsBuilder {
    type Entry = StringMetadata;

    fn build(
        &self,
        source_set: &SourceSetName,
        root: &Path,
        files: &[PathBuf],
    ) -> Result<Vec<StringMetadata>, BuildError> {
        let mut declarations = Declarations::new(source_set, ResourceType::Strings);

        for path in files {
            let context = FileContext::new(source_set, ResourceType::Strings, path);
            let locale = context.locale(root)?;
            let document = context.read_resources()?;

            for element in document.elements() {
                if element.name != "string" {
                    return Err(context.malformed(format!(
                        "unexpected element <{}>, expected <string>",
                        element.name
                    )));
                }
                let key = context.key_of(element)?;
                let text = normalize_text(&element.text(), self.strict_line_breaks)
                    .map_err(|message| context.malformed(format!("string '{key}': {message}")))?;
                declarations.declare(key, locale.clone(), text, path)?;
            }
        }

        Ok(declarations.into_entries(|key, values| StringMetadata { key, values }))
    }
}

/// Resolve escapes in resource text.
///
/// With `strict_line_breaks`, raw line breaks become spaces and only the
/// `\n` escape produces a line break.
pub(crate) fn normalize_text(raw: &str, strict_line_breaks: bool) -> Result<String, String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                let escaped = chars
                    .next()
                    .ok_or_else(|| "text ends with a lone backslash".to_string())?;
                match escaped {
                    'n' => out.push('\n'),
                    't' => out.push('\t'),
                    '\'' | '"' | '\\' | '@' | '?' => out.push(escaped),
                    other => return Err(format!("unknown escape sequence '\\{other}'")),
                }
            }
            '\r' if strict_line_breaks => {}
            '\n' if strict_line_breaks => out.push(' '),
            _ => out.push(c),
        }
    }

    Ok(out)
}
