//! # Hierarchy Rules
//!
//! Page -> sections -> containers -> content.
//!
//! Every function here is total over the closed [`ElementType`] set. Types
//! this build does not know never get that far: decoding them fails.

use crate::element::{Content, ElementType, StyleMap};
use crate::styles::merge_styles;
use serde_json::json;
use std::collections::BTreeSet;

/// Structural class of an element type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementClass {
    /// May sit at page root; holds containers and content
    Section,
    /// Holds content only
    Container,
    /// Leaf
    Content,
}

pub const SECTION_TYPES: [ElementType; 4] = [
    ElementType::Section,
    ElementType::Navbar,
    ElementType::Footer,
    ElementType::Hero,
];

pub const CONTAINER_TYPES: [ElementType; 1] = [ElementType::Container];

pub const CONTENT_TYPES: [ElementType; 6] = [
    ElementType::Text,
    ElementType::Image,
    ElementType::Logo,
    ElementType::Button,
    ElementType::Form,
    ElementType::FormField,
];

impl ElementType {
    pub fn class(&self) -> ElementClass {
        match self {
            ElementType::Section | ElementType::Navbar | ElementType::Footer | ElementType::Hero => {
                ElementClass::Section
            }
            ElementType::Container => ElementClass::Container,
            ElementType::Text
            | ElementType::Image
            | ElementType::Logo
            | ElementType::Button
            | ElementType::Form
            | ElementType::FormField => ElementClass::Content,
        }
    }
}

pub fn can_have_children(element_type: ElementType) -> bool {
    matches!(element_type.class(), ElementClass::Section | ElementClass::Container)
}

/// Whether `child` may be placed directly under `parent` (`None` = page root)
pub fn can_drop_into_parent(child: ElementType, parent: Option<ElementType>) -> bool {
    let child_class = child.class();

    let Some(parent) = parent else {
        return child_class == ElementClass::Section;
    };

    match parent.class() {
        ElementClass::Section => {
            matches!(child_class, ElementClass::Container | ElementClass::Content)
        }
        ElementClass::Container => child_class == ElementClass::Content,
        ElementClass::Content => false,
    }
}

/// Types the palette should offer for a given parent
pub fn valid_child_types(parent: Option<ElementType>) -> BTreeSet<ElementType> {
    ElementType::ALL
        .into_iter()
        .filter(|child| can_drop_into_parent(*child, parent))
        .collect()
}

/// Canonical flex layout for container-capable types
pub fn default_container_layout(element_type: ElementType) -> StyleMap {
    let pairs: &[(&str, &str)] = match element_type {
        ElementType::Section => &[
            ("display", "flex"),
            ("flexDirection", "column"),
            ("gap", "1rem"),
            ("padding", "2rem"),
            ("minHeight", "200px"),
        ],
        ElementType::Container => &[
            ("display", "flex"),
            ("flexDirection", "row"),
            ("gap", "1rem"),
            ("padding", "1rem"),
            ("flexWrap", "wrap"),
        ],
        ElementType::Navbar => &[
            ("display", "flex"),
            ("justifyContent", "space-between"),
            ("alignItems", "center"),
            ("padding", "1rem 2rem"),
            ("backgroundColor", "#ffffff"),
            ("borderBottom", "1px solid #e5e7eb"),
        ],
        ElementType::Footer => &[
            ("display", "flex"),
            ("justifyContent", "center"),
            ("alignItems", "center"),
            ("padding", "2rem"),
            ("backgroundColor", "#f9fafb"),
            ("borderTop", "1px solid #e5e7eb"),
        ],
        ElementType::Hero => &[
            ("display", "flex"),
            ("flexDirection", "column"),
            ("justifyContent", "center"),
            ("alignItems", "center"),
            ("padding", "4rem 2rem"),
            ("minHeight", "400px"),
            ("textAlign", "center"),
            ("backgroundColor", "#f8fafc"),
        ],
        _ => &[],
    };

    crate::element::style_map(pairs.iter().copied())
}

/// Per-type cosmetic defaults applied on palette creation
pub fn default_styles(element_type: ElementType) -> StyleMap {
    let pairs: &[(&str, &str)] = match element_type {
        ElementType::Section => &[("padding", "40px 20px"), ("backgroundColor", "#ffffff")],
        ElementType::Container => &[("maxWidth", "1200px"), ("margin", "0 auto"), ("padding", "20px")],
        ElementType::Text => &[("fontSize", "16px"), ("color", "#000000")],
        ElementType::Image => &[("maxWidth", "100%"), ("height", "auto")],
        ElementType::Logo => &[("maxHeight", "48px"), ("width", "auto")],
        ElementType::Button => &[
            ("padding", "10px 20px"),
            ("backgroundColor", "#000000"),
            ("color", "#ffffff"),
            ("borderRadius", "4px"),
            ("border", "none"),
            ("cursor", "pointer"),
        ],
        ElementType::Footer => &[("padding", "20px"), ("textAlign", "center")],
        ElementType::Form => &[
            ("padding", "20px"),
            ("border", "1px solid #e5e7eb"),
            ("borderRadius", "8px"),
            ("backgroundColor", "#ffffff"),
        ],
        _ => &[],
    };

    crate::element::style_map(pairs.iter().copied())
}

/// Styles a freshly dropped element starts with: cosmetic defaults overlaid
/// with the container layout, normalized.
pub fn template_styles(element_type: ElementType) -> StyleMap {
    merge_styles([
        &default_styles(element_type),
        &default_container_layout(element_type),
    ])
}

/// Starting payload for a freshly created element
pub fn default_content(element_type: ElementType) -> Content {
    let value = match element_type {
        ElementType::Text => json!({ "text": "Edit this text", "tag": "p" }),
        ElementType::Image => json!({ "src": "/placeholder.svg?height=200&width=400", "alt": "Image" }),
        ElementType::Logo => json!({ "src": "", "alt": "Logo" }),
        ElementType::Button => json!({ "text": "Click me", "href": "#" }),
        ElementType::Navbar => json!({ "brand": "Brand", "links": [] }),
        ElementType::Footer => json!({ "text": "© 2025 All rights reserved" }),
        ElementType::Form => json!({ "title": "Contact Form", "action": "", "method": "POST" }),
        ElementType::FormField => json!({ "label": "Field", "name": "field", "type": "text", "required": false }),
        ElementType::Hero => json!({ "title": "Welcome", "subtitle": "" }),
        _ => json!({}),
    };

    match value {
        serde_json::Value::Object(map) => map,
        _ => Content::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::styles::has_conflicts;

    #[test]
    fn test_root_accepts_only_section_class() {
        for ty in ElementType::ALL {
            assert_eq!(
                can_drop_into_parent(ty, None),
                SECTION_TYPES.contains(&ty),
                "root placement of {ty}"
            );
        }
    }

    #[test]
    fn test_placement_table() {
        for child in ElementType::ALL {
            for parent in ElementType::ALL {
                let expected = match (parent.class(), child.class()) {
                    (ElementClass::Section, ElementClass::Container) => true,
                    (ElementClass::Section, ElementClass::Content) => true,
                    (ElementClass::Container, ElementClass::Content) => true,
                    _ => false,
                };
                assert_eq!(
                    can_drop_into_parent(child, Some(parent)),
                    expected,
                    "{child} into {parent}"
                );
            }
        }
    }

    #[test]
    fn test_content_never_a_parent() {
        for parent in CONTENT_TYPES {
            assert!(!can_have_children(parent));
            assert!(valid_child_types(Some(parent)).is_empty());
        }
    }

    #[test]
    fn test_sections_cannot_nest() {
        assert!(!can_drop_into_parent(ElementType::Section, Some(ElementType::Section)));
        assert!(!can_drop_into_parent(ElementType::Hero, Some(ElementType::Container)));
        assert!(!can_drop_into_parent(ElementType::Container, Some(ElementType::Container)));
    }

    #[test]
    fn test_valid_child_types() {
        let root: Vec<_> = valid_child_types(None).into_iter().collect();
        assert_eq!(root.len(), 4);

        let in_container = valid_child_types(Some(ElementType::Container));
        assert!(in_container.contains(&ElementType::Text));
        assert!(!in_container.contains(&ElementType::Container));

        let in_section = valid_child_types(Some(ElementType::Section));
        assert_eq!(in_section.len(), 7);
    }

    #[test]
    fn test_default_layout_only_for_containers() {
        assert_eq!(
            default_container_layout(ElementType::Section).get("flexDirection").map(String::as_str),
            Some("column")
        );
        assert!(default_container_layout(ElementType::Text).is_empty());
    }

    #[test]
    fn test_template_styles_are_normalized() {
        for ty in ElementType::ALL {
            assert!(!has_conflicts(&template_styles(ty)), "{ty}");
        }
        // layout wins over cosmetic defaults
        assert_eq!(
            template_styles(ElementType::Section).get("padding").map(String::as_str),
            Some("2rem")
        );
    }

    #[test]
    fn test_default_content() {
        assert_eq!(default_content(ElementType::Text)["text"], "Edit this text");
        assert!(default_content(ElementType::Section).is_empty());
    }
}
