//! # Presets
//!
//! Ready-made element arrangements dropped into a parent in one step.
//! Navbar presets fill a navbar with a logo, a link container and optional
//! call-to-action.

use crate::element::{style_map, Content, ElementType, NewElement, StyleMap};
use serde::Serialize;
use serde_json::json;

/// An element to create plus the children to create under it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateNode {
    pub element: NewElement,
    pub children: Vec<TemplateNode>,
}

impl TemplateNode {
    pub fn leaf(element: NewElement) -> Self {
        Self {
            element,
            children: Vec::new(),
        }
    }

    pub fn with_children(element: NewElement, children: Vec<TemplateNode>) -> Self {
        Self { element, children }
    }

    /// Number of elements this template creates
    pub fn len(&self) -> usize {
        1 + self.children.iter().map(TemplateNode::len).sum::<usize>()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Preset {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub preview: &'static str,
    /// Type of parent the preset is meant for
    pub target: ElementType,
    pub elements: Vec<TemplateNode>,
}

fn content(value: serde_json::Value) -> Content {
    match value {
        serde_json::Value::Object(map) => map,
        _ => Content::new(),
    }
}

fn logo(text: &str) -> TemplateNode {
    TemplateNode::leaf(
        NewElement::of(ElementType::Logo)
            .with_content(content(json!({ "text": text, "imageUrl": "" })))
            .with_styles(style_map([
                ("fontSize", "24px"),
                ("fontWeight", "bold"),
                ("color", "#000"),
            ])),
    )
}

fn link(text: &str) -> TemplateNode {
    TemplateNode::leaf(
        NewElement::of(ElementType::Text)
            .with_content(content(json!({ "text": text })))
            .with_styles(style_map([
                ("color", "#000"),
                ("textDecoration", "none"),
                ("cursor", "pointer"),
            ])),
    )
}

fn link_group(links: &[&str]) -> TemplateNode {
    TemplateNode::with_children(
        NewElement::of(ElementType::Container).with_styles(link_row_styles()),
        links.iter().map(|text| link(text)).collect(),
    )
}

fn link_row_styles() -> StyleMap {
    style_map([("display", "flex"), ("gap", "24px"), ("alignItems", "center")])
}

fn cta_button(text: &str) -> TemplateNode {
    TemplateNode::leaf(
        NewElement::of(ElementType::Button)
            .with_content(content(json!({ "text": text, "href": "#" })))
            .with_styles(style_map([
                ("backgroundColor", "#3b82f6"),
                ("color", "white"),
                ("padding", "8px 16px"),
                ("borderRadius", "6px"),
                ("border", "none"),
                ("cursor", "pointer"),
            ])),
    )
}

pub fn navbar_presets() -> Vec<Preset> {
    vec![
        Preset {
            id: "simple-navbar",
            name: "Simple Navbar",
            description: "Clean navbar with logo and navigation links",
            preview: "Logo | Home About Contact",
            target: ElementType::Navbar,
            elements: vec![logo("Brand"), link_group(&["Home", "About", "Contact"])],
        },
        Preset {
            id: "cta-navbar",
            name: "CTA Navbar",
            description: "Navbar with call-to-action button",
            preview: "Logo | Home About | Get Started",
            target: ElementType::Navbar,
            elements: vec![
                logo("Brand"),
                link_group(&["Home", "About"]),
                cta_button("Get Started"),
            ],
        },
        Preset {
            id: "centered-navbar",
            name: "Centered Navbar",
            description: "Logo centered with navigation on sides",
            preview: "Home About | Logo | Services Contact",
            target: ElementType::Navbar,
            elements: vec![
                link_group(&["Home", "About"]),
                logo("Brand"),
                link_group(&["Services", "Contact"]),
            ],
        },
        Preset {
            id: "minimal-navbar",
            name: "Minimal Navbar",
            description: "Text brand with compact links",
            preview: "Brand | Work Blog Contact",
            target: ElementType::Navbar,
            elements: vec![
                TemplateNode::leaf(
                    NewElement::of(ElementType::Text)
                        .with_content(content(json!({ "text": "Brand", "tag": "span" })))
                        .with_styles(style_map([("fontSize", "20px"), ("fontWeight", "600")])),
                ),
                link_group(&["Work", "Blog", "Contact"]),
            ],
        },
    ]
}

pub fn find_preset(id: &str) -> Option<Preset> {
    navbar_presets().into_iter().find(|preset| preset.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::can_drop_into_parent;

    fn assert_legal(node: &TemplateNode, parent: ElementType) {
        assert!(
            can_drop_into_parent(node.element.element_type, Some(parent)),
            "{} under {}",
            node.element.element_type,
            parent
        );
        for child in &node.children {
            assert_legal(child, node.element.element_type);
        }
    }

    #[test]
    fn test_presets_respect_hierarchy() {
        for preset in navbar_presets() {
            for node in &preset.elements {
                assert_legal(node, preset.target);
            }
        }
    }

    #[test]
    fn test_find_preset() {
        let preset = find_preset("cta-navbar").unwrap();
        assert_eq!(preset.elements.len(), 3);
        assert_eq!(preset.elements.iter().map(TemplateNode::len).sum::<usize>(), 5);
        assert!(find_preset("mega-menu").is_none());
    }
}
