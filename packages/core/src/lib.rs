//! # Pagecraft Core
//!
//! Element model, hierarchy rules, responsive styles and the element tree
//! store behind the Pagecraft page editor.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ persistence: flat element records           │
//! └─────────────────────────────────────────────┘
//!                     ↓ build_tree / flatten ↑
//! ┌─────────────────────────────────────────────┐
//! │ core: ElementTree                           │
//! │  - hierarchy rules gate every placement     │
//! │  - styles normalized on every write         │
//! │  - children derived from parent pointers    │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: history, drag-and-drop, session     │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use pagecraft_core::{ElementTree, ElementType, NewElement, SequentialIds, Viewport};
//! use pagecraft_core::styles::get_responsive_styles;
//!
//! let mut tree = ElementTree::new("home");
//! let mut ids = SequentialIds::default();
//!
//! let section = tree
//!     .add_element(NewElement::of(ElementType::Section), None, None, &mut ids)
//!     .unwrap();
//! tree.add_element(NewElement::of(ElementType::Text), Some(section.as_str()), None, &mut ids)
//!     .unwrap();
//!
//! let styles = get_responsive_styles(tree.get(&section).unwrap(), Viewport::Mobile);
//! assert_eq!(styles.get("display").map(String::as_str), Some("flex"));
//! ```

mod audit;
mod element;
mod errors;
mod grid;
pub mod hierarchy;
mod ids;
mod presets;
pub mod styles;
mod tree;

pub use audit::{audit_page, AuditIssue};
pub use element::{
    style_map, Content, Element, ElementId, ElementNode, ElementPatch, ElementType, NewElement,
    ParseElementTypeError, ParseViewportError, ResponsiveStyles, StyleMap, Viewport,
};
pub use errors::{describe_parent, TreeError};
pub use grid::{snap_to_grid, GridConfig, Point, Size};
pub use hierarchy::{can_drop_into_parent, can_have_children, valid_child_types, ElementClass};
pub use ids::{IdProvider, SequentialIds, UuidIds};
pub use presets::{find_preset, navbar_presets, Preset, TemplateNode};
pub use tree::{build_tree, ElementTree};
