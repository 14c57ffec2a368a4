//! DOM Element implementation.

use crate::attributes::AttributeMap;
use crate::style::StyleDeclarations;
use bitflags::bitflags;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::sync::Arc;

/// Interned, lowercase tag name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TagName(Arc<str>);

impl TagName {
    pub fn new(name: &str) -> Self {
        static INTERNED: Lazy<RwLock<HashMap<String, Arc<str>>>> =
            Lazy::new(|| RwLock::new(HashMap::new()));

        let lower = name.to_ascii_lowercase();

        {
            let cache = INTERNED.read();
            if let Some(s) = cache.get(&lower) {
                return TagName(s.clone());
            }
        }

        let mut cache = INTERNED.write();
        let s = cache
            .entry(lower.clone())
            .or_insert_with(|| Arc::from(lower.as_str()))
            .clone();
        TagName(s)
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn html() -> Self {
        Self::new("html")
    }
    pub fn head() -> Self {
        Self::new("head")
    }
    pub fn body() -> Self {
        Self::new("body")
    }
    pub fn title() -> Self {
        Self::new("title")
    }
    pub fn div() -> Self {
        Self::new("div")
    }
    pub fn span() -> Self {
        Self::new("span")
    }
    pub fn a() -> Self {
        Self::new("a")
    }
    pub fn br() -> Self {
        Self::new("br")
    }
}

impl std::fmt::Display for TagName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl PartialEq<&str> for TagName {
    fn eq(&self, other: &&str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }
}

bitflags! {
    /// Element flags for quick property checks.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct ElementFlags: u32 {
        const VOID = 1 << 0;
        const RAW_TEXT = 1 << 1;
    }
}

/// Element-specific data.
#[derive(Clone, Debug)]
pub struct ElementData {
    /// Tag name (lowercase).
    pub tag_name: TagName,
    /// Attributes, `style` included as serialized text.
    pub attributes: AttributeMap,
    /// ID attribute (cached).
    pub id: Option<Arc<str>>,
    /// Class list (cached).
    pub class_list: SmallVec<[Arc<str>; 4]>,
    /// Element flags.
    pub flags: ElementFlags,
    /// Parsed inline style.
    pub style: StyleDeclarations,
    /// Vertical scroll position of this element's content box.
    pub scroll_top: f64,
}

impl ElementData {
    pub fn new(tag_name: TagName) -> Self {
        let flags = Self::default_flags(&tag_name);
        Self {
            tag_name,
            attributes: AttributeMap::new(),
            id: None,
            class_list: SmallVec::new(),
            flags,
            style: StyleDeclarations::new(),
            scroll_top: 0.0,
        }
    }

    fn default_flags(tag_name: &TagName) -> ElementFlags {
        let mut flags = ElementFlags::empty();
        let name = tag_name.as_str();

        if matches!(
            name,
            "area" | "base" | "br" | "col" | "embed" | "hr" | "img" | "input" | "link" | "meta"
                | "param" | "source" | "track" | "wbr"
        ) {
            flags |= ElementFlags::VOID;
        }

        if matches!(name, "script" | "style") {
            flags |= ElementFlags::RAW_TEXT;
        }

        flags
    }

    /// Set an attribute, updating cached values.
    pub fn set_attribute(&mut self, name: &str, value: &str) {
        let name_lower = name.to_ascii_lowercase();

        match name_lower.as_str() {
            "id" => self.id = Some(Arc::from(value)),
            "class" => {
                self.class_list = value.split_whitespace().map(Arc::from).collect();
            }
            "style" => self.style = StyleDeclarations::parse(value),
            _ => {}
        }

        self.attributes.set(&name_lower, value);
    }

    #[inline]
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(&name.to_ascii_lowercase())
    }

    #[inline]
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains(&name.to_ascii_lowercase())
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.class_list.iter().any(|c| c.as_ref() == class)
    }

    /// Set one inline style property and keep the `style` attribute in sync.
    pub fn set_style_property(&mut self, name: &str, value: &str) {
        self.style.set(name, value);
        let css = self.style.to_css();
        self.attributes.set("style", &css);
    }

    /// Read one inline style property.
    pub fn style_property(&self, name: &str) -> Option<&str> {
        self.style.get(name)
    }

    #[inline]
    pub fn is_void(&self) -> bool {
        self.flags.contains(ElementFlags::VOID)
    }

    #[inline]
    pub fn is_raw_text(&self) -> bool {
        self.flags.contains(ElementFlags::RAW_TEXT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_name_interning() {
        let a = TagName::new("DIV");
        let b = TagName::div();
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "div");
        assert!(a == "Div");
    }

    #[test]
    fn test_void_flags() {
        assert!(ElementData::new(TagName::br()).is_void());
        assert!(!ElementData::new(TagName::div()).is_void());
    }

    #[test]
    fn test_style_attribute_sync() {
        let mut elem = ElementData::new(TagName::div());
        elem.set_attribute("style", "color: red");
        elem.set_style_property("bottom", "0px");

        assert_eq!(elem.style_property("color"), Some("red"));
        assert_eq!(elem.get_attribute("style"), Some("color: red; bottom: 0px;"));
    }

    #[test]
    fn test_cached_attributes() {
        let mut elem = ElementData::new(TagName::span());
        elem.set_attribute("ID", "x");
        elem.set_attribute("class", "one two");

        assert_eq!(elem.id.as_deref(), Some("x"));
        assert!(elem.has_class("two"));
        assert!(elem.has_attribute("id"));
    }
}
