//! Inline style declarations.
//!
//! The overlay only ever reads back what it wrote, so this is a property map
//! that round-trips to `style` attribute text, not a CSS engine.

use common::Px;
use indexmap::IndexMap;

/// Ordered `property: value` pairs from a `style` attribute.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StyleDeclarations {
    properties: IndexMap<String, String>,
}

impl StyleDeclarations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `style` attribute text. Malformed declarations are skipped.
    pub fn parse(text: &str) -> Self {
        let mut style = Self::new();
        for declaration in text.split(';') {
            let Some((name, value)) = declaration.split_once(':') else {
                continue;
            };
            let name = name.trim();
            let value = value.trim();
            if !name.is_empty() && !value.is_empty() {
                style.set(name, value);
            }
        }
        style
    }

    /// Set a property, keeping its original position if already present.
    pub fn set(&mut self, name: &str, value: &str) {
        self.properties
            .insert(name.trim().to_ascii_lowercase(), value.trim().to_string());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.properties
            .get(&name.to_ascii_lowercase())
            .map(|s| s.as_str())
    }

    /// Read a property as a pixel length.
    pub fn get_px(&self, name: &str) -> Option<Px> {
        self.get(name).and_then(Px::parse)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Serialize back to `style` attribute text.
    pub fn to_css(&self) -> String {
        self.properties
            .iter()
            .map(|(name, value)| format!("{name}: {value};"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_serialize() {
        let style = StyleDeclarations::parse("position: fixed; bottom:-160px;;junk; HEIGHT: 150px");
        assert_eq!(style.len(), 3);
        assert_eq!(style.get("height"), Some("150px"));
        assert_eq!(style.get_px("bottom"), Some(Px(-160.0)));
        assert_eq!(
            style.to_css(),
            "position: fixed; bottom: -160px; height: 150px;"
        );
    }

    #[test]
    fn test_set_keeps_order() {
        let mut style = StyleDeclarations::parse("a: 1; b: 2");
        style.set("a", "3");
        assert_eq!(style.to_css(), "a: 3; b: 2;");
    }
}
