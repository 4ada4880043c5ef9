//! Android `<resources>` color tables.

use indexmap::IndexMap;
use vecgen_core::ParseError;

/// Named colors from a `<resources>` document, in declaration order.
///
/// Values are kept as written (a literal or another reference) and resolved
/// lazily by [`crate::resolve_color`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorTable {
    colors: IndexMap<String, String>,
}

impl ColorTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.colors.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.colors.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.colors.keys().map(String::as_str)
    }
}

impl FromIterator<(String, String)> for ColorTable {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            colors: iter.into_iter().collect(),
        }
    }
}

/// Read the `<color name="...">` entries of a `<resources>` document.
///
/// Later entries with the same name replace earlier ones. Non-color
/// resources are ignored.
pub fn parse_color_resources(xml: &str) -> Result<ColorTable, ParseError> {
    let doc = roxmltree::Document::parse(xml).map_err(|e| ParseError::Xml(e.to_string()))?;
    let root = doc.root_element();

    if root.tag_name().name() != "resources" {
        return Err(ParseError::UnexpectedRoot {
            expected: "resources".into(),
            found: root.tag_name().name().into(),
        });
    }

    let mut table = ColorTable::new();
    for node in root.children().filter(|n| n.has_tag_name("color")) {
        let name = node
            .attribute("name")
            .ok_or_else(|| ParseError::MissingAttribute {
                element: "color".into(),
                attribute: "name".into(),
            })?;
        let value = node.text().map(str::trim).unwrap_or_default();
        table.insert(name, value);
    }

    log::debug!("loaded {} color resources", table.len());
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_resources() {
        let xml = r#"<?xml version="1.0" encoding="utf-8"?>
            <resources>
                <color name="primary">#6200EE</color>
                <string name="app_name">Demo</string>
                <color name="accent"> @color/primary </color>
            </resources>"#;

        let table = parse_color_resources(xml).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("primary"), Some("#6200EE"));
        assert_eq!(table.get("accent"), Some("@color/primary"));
        assert_eq!(table.names().collect::<Vec<_>>(), vec!["primary", "accent"]);
    }

    #[test]
    fn test_wrong_root() {
        let err = parse_color_resources("<vector/>").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedRoot { .. }));
    }

    #[test]
    fn test_color_without_name() {
        let err = parse_color_resources("<resources><color>#fff</color></resources>").unwrap_err();
        assert!(matches!(err, ParseError::MissingAttribute { .. }));
    }
}
