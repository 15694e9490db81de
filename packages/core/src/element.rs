//! # Element Model
//!
//! Flat element records as exchanged with persistence, plus the derived
//! nested view handed to renderers and exporters.
//!
//! Children are never stored on an [`Element`]. The nested [`ElementNode`]
//! view is rebuilt from the flat store whenever it is requested.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Opaque element identifier
pub type ElementId = String;

/// CSS property name (camelCase) -> CSS value
pub type StyleMap = BTreeMap<String, String>;

/// Type-specific free-form payload (text, src, href, ...)
pub type Content = serde_json::Map<String, serde_json::Value>;

/// Closed set of element kinds offered by the palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ElementType {
    Section,
    Container,
    Navbar,
    Footer,
    Hero,
    Text,
    Image,
    Logo,
    Button,
    Form,
    FormField,
}

impl ElementType {
    /// Every known type, in palette order
    pub const ALL: [ElementType; 11] = [
        ElementType::Section,
        ElementType::Container,
        ElementType::Navbar,
        ElementType::Footer,
        ElementType::Hero,
        ElementType::Text,
        ElementType::Image,
        ElementType::Logo,
        ElementType::Button,
        ElementType::Form,
        ElementType::FormField,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ElementType::Section => "section",
            ElementType::Container => "container",
            ElementType::Navbar => "navbar",
            ElementType::Footer => "footer",
            ElementType::Hero => "hero",
            ElementType::Text => "text",
            ElementType::Image => "image",
            ElementType::Logo => "logo",
            ElementType::Button => "button",
            ElementType::Form => "form",
            ElementType::FormField => "form-field",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("Unknown element type: {0}")]
pub struct ParseElementTypeError(pub String);

impl FromStr for ElementType {
    type Err = ParseElementTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ElementType::ALL
            .iter()
            .copied()
            .find(|ty| ty.as_str() == s)
            .ok_or_else(|| ParseElementTypeError(s.to_string()))
    }
}

/// Editing viewport. Desktop styles live in `Element::styles`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Viewport {
    #[default]
    Desktop,
    Tablet,
    Mobile,
}

impl Viewport {
    pub const ALL: [Viewport; 3] = [Viewport::Desktop, Viewport::Tablet, Viewport::Mobile];

    pub fn as_str(&self) -> &'static str {
        match self {
            Viewport::Desktop => "desktop",
            Viewport::Tablet => "tablet",
            Viewport::Mobile => "mobile",
        }
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("Invalid viewport: {0}. Use: desktop, tablet, or mobile")]
pub struct ParseViewportError(pub String);

impl FromStr for Viewport {
    type Err = ParseViewportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "desktop" => Ok(Viewport::Desktop),
            "tablet" => Ok(Viewport::Tablet),
            "mobile" => Ok(Viewport::Mobile),
            other => Err(ParseViewportError(other.to_string())),
        }
    }
}

/// Per-viewport override layers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponsiveStyles {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_style_map"
    )]
    pub tablet: Option<StyleMap>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_style_map"
    )]
    pub mobile: Option<StyleMap>,
}

impl ResponsiveStyles {
    pub fn is_empty(&self) -> bool {
        self.tablet.is_none() && self.mobile.is_none()
    }

    /// Override layer for a viewport. Desktop never has one.
    pub fn layer(&self, viewport: Viewport) -> Option<&StyleMap> {
        match viewport {
            Viewport::Desktop => None,
            Viewport::Tablet => self.tablet.as_ref(),
            Viewport::Mobile => self.mobile.as_ref(),
        }
    }

    pub(crate) fn layer_mut(&mut self, viewport: Viewport) -> Option<&mut Option<StyleMap>> {
        match viewport {
            Viewport::Desktop => None,
            Viewport::Tablet => Some(&mut self.tablet),
            Viewport::Mobile => Some(&mut self.mobile),
        }
    }
}

/// A node of a page, in its flat persisted shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub id: ElementId,

    #[serde(default, alias = "page_id")]
    pub page_id: String,

    /// `None` means page root
    #[serde(default, alias = "parent_id")]
    pub parent_id: Option<ElementId>,

    #[serde(rename = "type")]
    pub element_type: ElementType,

    /// Order among siblings sharing `parent_id`
    #[serde(default)]
    pub position: usize,

    #[serde(default)]
    pub content: Content,

    /// Base (desktop) styles
    #[serde(default, deserialize_with = "deserialize_style_map")]
    pub styles: StyleMap,

    #[serde(
        default,
        alias = "responsive_styles",
        skip_serializing_if = "ResponsiveStyles::is_empty"
    )]
    pub responsive_styles: ResponsiveStyles,

    #[serde(default = "Utc::now", alias = "created_at")]
    pub created_at: DateTime<Utc>,

    #[serde(default = "Utc::now", alias = "updated_at")]
    pub updated_at: DateTime<Utc>,
}

impl Element {
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Partial element used when creating through the palette, a preset or the API.
/// Missing fields fall back to the type's template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewElement {
    #[serde(rename = "type")]
    pub element_type: ElementType,

    #[serde(default)]
    pub content: Option<Content>,

    #[serde(default)]
    pub styles: Option<StyleMap>,

    #[serde(default)]
    pub responsive_styles: Option<ResponsiveStyles>,
}

impl NewElement {
    pub fn of(element_type: ElementType) -> Self {
        Self {
            element_type,
            content: None,
            styles: None,
            responsive_styles: None,
        }
    }

    pub fn with_content(mut self, content: Content) -> Self {
        self.content = Some(content);
        self
    }

    pub fn with_styles(mut self, styles: StyleMap) -> Self {
        self.styles = Some(styles);
        self
    }
}

/// Fields an update may replace. Identity and placement change through moves.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementPatch {
    #[serde(default)]
    pub content: Option<Content>,

    #[serde(default)]
    pub styles: Option<StyleMap>,

    #[serde(default)]
    pub responsive_styles: Option<ResponsiveStyles>,
}

impl ElementPatch {
    pub fn content(content: Content) -> Self {
        Self {
            content: Some(content),
            ..Self::default()
        }
    }

    pub fn styles(styles: StyleMap) -> Self {
        Self {
            styles: Some(styles),
            ..Self::default()
        }
    }
}

/// Derived nested view of an element and its ordered children
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementNode {
    #[serde(flatten)]
    pub element: Element,
    pub children: Vec<ElementNode>,
}

impl ElementNode {
    /// Number of nodes in this subtree, including self
    pub fn len(&self) -> usize {
        1 + self.children.iter().map(ElementNode::len).sum::<usize>()
    }
}

/// Build a style map from literal pairs
pub fn style_map<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> StyleMap
where
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

// Persisted styles sometimes carry bare numbers (`fontWeight: 700`).
fn coerce_style_values(raw: BTreeMap<String, serde_json::Value>) -> StyleMap {
    raw.into_iter()
        .filter_map(|(key, value)| match value {
            serde_json::Value::String(s) => Some((key, s)),
            serde_json::Value::Number(n) => Some((key, n.to_string())),
            serde_json::Value::Bool(b) => Some((key, b.to_string())),
            _ => None,
        })
        .collect()
}

fn deserialize_style_map<'de, D>(deserializer: D) -> Result<StyleMap, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<BTreeMap<String, serde_json::Value>>::deserialize(deserializer)?;
    Ok(raw.map(coerce_style_values).unwrap_or_default())
}

fn deserialize_optional_style_map<'de, D>(deserializer: D) -> Result<Option<StyleMap>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<BTreeMap<String, serde_json::Value>>::deserialize(deserializer)?;
    Ok(raw.map(coerce_style_values))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_type_round_trips_through_str() {
        for ty in ElementType::ALL {
            assert_eq!(ty.as_str().parse::<ElementType>().unwrap(), ty);
        }
        assert!("marquee".parse::<ElementType>().is_err());
    }

    #[test]
    fn test_unknown_type_is_a_decode_error() {
        let ty: ElementType = serde_json::from_str("\"form-field\"").unwrap();
        assert_eq!(ty, ElementType::FormField);

        assert!(serde_json::from_str::<ElementType>("\"carousel\"").is_err());
        let record = r#"{ "id": "c", "type": "carousel", "position": 0 }"#;
        assert!(serde_json::from_str::<Element>(record).is_err());
    }

    #[test]
    fn test_element_accepts_snake_case_persistence_shape() {
        let json = r#"{
            "id": "el-1",
            "page_id": "page-1",
            "parent_id": null,
            "type": "section",
            "position": 0,
            "content": {},
            "styles": { "padding": "2rem", "fontWeight": 700, "opacity": null },
            "responsive_styles": { "desktop": { "color": "red" }, "mobile": { "padding": "1rem" } },
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-02T00:00:00Z"
        }"#;

        let element: Element = serde_json::from_str(json).unwrap();
        assert_eq!(element.page_id, "page-1");
        assert!(element.is_root());
        assert_eq!(element.styles.get("fontWeight").map(String::as_str), Some("700"));
        assert!(!element.styles.contains_key("opacity"));
        assert_eq!(
            element.responsive_styles.layer(Viewport::Mobile).and_then(|m| m.get("padding")),
            Some(&"1rem".to_string())
        );
        assert!(element.responsive_styles.tablet.is_none());
    }

    #[test]
    fn test_element_serializes_camel_case() {
        let json = r#"{ "id": "a", "pageId": "p", "parentId": "b", "type": "text" }"#;
        let element: Element = serde_json::from_str(json).unwrap();
        let value = serde_json::to_value(&element).unwrap();

        assert_eq!(value["parentId"], "b");
        assert_eq!(value["type"], "text");
        assert!(value.get("responsiveStyles").is_none());
    }

    #[test]
    fn test_viewport_parse() {
        assert_eq!("mobile".parse::<Viewport>().unwrap(), Viewport::Mobile);
        assert!("watch".parse::<Viewport>().is_err());
    }
}
