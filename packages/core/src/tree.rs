//! # Element Tree Store
//!
//! Arena of elements keyed by id plus a derived, ordered children index.
//!
//! ## Invariants
//!
//! - Parent pointers form a forest. Loading repairs dangling parents and
//!   cycles by attaching the offending element to the page root; moves reject
//!   cycles before touching anything.
//! - Sibling positions are always `0..n-1` in index order.
//! - The children index is never persisted. [`ElementTree::flatten`] is the
//!   persisted shape and [`ElementTree::from_flat`] accepts it losslessly.
//! - Every command either fully applies or leaves the tree untouched.

use crate::element::{Element, ElementId, ElementNode, ElementPatch, ElementType, NewElement, StyleMap, Viewport};
use crate::errors::TreeError;
use crate::hierarchy::{can_drop_into_parent, default_content, template_styles};
use crate::ids::IdProvider;
use crate::presets::TemplateNode;
use crate::styles::{normalize_inline_styles, update_responsive_styles};
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, instrument, warn};

const MAX_ID_ATTEMPTS: usize = 16;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementTree {
    page_id: String,
    elements: HashMap<ElementId, Element>,
    roots: Vec<ElementId>,
    children: HashMap<ElementId, Vec<ElementId>>,
}

/// Build a tree from the flat persisted shape. The page id is taken from the
/// first element.
pub fn build_tree(flat: Vec<Element>) -> ElementTree {
    let page_id = flat.first().map(|el| el.page_id.clone()).unwrap_or_default();
    ElementTree::from_flat(page_id, flat)
}

impl ElementTree {
    pub fn new(page_id: impl Into<String>) -> Self {
        Self {
            page_id: page_id.into(),
            ..Self::default()
        }
    }

    /// Group by parent, order each group by position (input order breaks
    /// ties) and renumber. Every element is stamped with `page_id` and its
    /// style maps are normalized. Loading does not count as an edit, so
    /// `updatedAt` is left alone.
    #[instrument(skip_all)]
    pub fn from_flat(page_id: impl Into<String>, flat: impl IntoIterator<Item = Element>) -> Self {
        let page_id = page_id.into();
        let mut elements: HashMap<ElementId, Element> = HashMap::new();
        let mut order: Vec<ElementId> = Vec::new();

        for mut element in flat {
            element.page_id.clone_from(&page_id);
            normalize_loaded_styles(&mut element);
            let id = element.id.clone();
            if elements.insert(id.clone(), element).is_some() {
                warn!(element_id = %id, "Duplicate element id, keeping the last record");
            } else {
                order.push(id);
            }
        }

        let mut orphans = Vec::new();
        let mut groups: HashMap<Option<ElementId>, Vec<(usize, usize, ElementId)>> = HashMap::new();

        for (seq, id) in order.iter().enumerate() {
            let Some(element) = elements.get(id) else {
                continue;
            };
            let parent = match &element.parent_id {
                Some(parent_id) if parent_id != id && elements.contains_key(parent_id) => {
                    Some(parent_id.clone())
                }
                Some(parent_id) => {
                    warn!(element_id = %id, parent_id = %parent_id, "Parent missing, attaching element to page root");
                    orphans.push(id.clone());
                    None
                }
                None => None,
            };
            groups
                .entry(parent)
                .or_default()
                .push((element.position, seq, id.clone()));
        }

        for id in orphans {
            if let Some(element) = elements.get_mut(&id) {
                element.parent_id = None;
            }
        }

        let mut tree = Self {
            page_id,
            elements,
            roots: Vec::new(),
            children: HashMap::new(),
        };

        for (parent, mut group) in groups {
            group.sort();
            let ids: Vec<ElementId> = group.into_iter().map(|(_, _, id)| id).collect();
            match parent {
                Some(parent_id) => {
                    tree.children.insert(parent_id, ids);
                }
                None => tree.roots = ids,
            }
        }

        // Anything unreachable from the roots sits on a parent cycle.
        let mut visited: HashSet<ElementId> = tree.preorder_ids().into_iter().collect();
        for id in &order {
            if visited.contains(id) {
                continue;
            }
            warn!(element_id = %id, "Parent chain forms a cycle, attaching element to page root");
            tree.detach(id);
            tree.roots.push(id.clone());
            if let Some(element) = tree.elements.get_mut(id) {
                element.parent_id = None;
            }
            visited.extend(tree.subtree_ids(id));
        }

        tree.renumber(None, false);
        let parents: Vec<ElementId> = tree.children.keys().cloned().collect();
        for parent in parents {
            tree.renumber(Some(parent.as_str()), false);
        }

        info!(page_id = %tree.page_id, elements = tree.len(), roots = tree.roots.len(), "Built element tree");
        tree
    }

    pub fn from_json(page_id: impl Into<String>, json: &str) -> serde_json::Result<Self> {
        let flat: Vec<Element> = serde_json::from_str(json)?;
        Ok(Self::from_flat(page_id, flat))
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.flatten())
    }

    pub fn page_id(&self) -> &str {
        &self.page_id
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Element> {
        self.elements.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.elements.contains_key(id)
    }

    pub fn roots(&self) -> &[ElementId] {
        &self.roots
    }

    /// Ordered child ids of `parent` (`None` = page root)
    pub fn children_of(&self, parent: Option<&str>) -> &[ElementId] {
        match parent {
            None => &self.roots,
            Some(parent_id) => self
                .children
                .get(parent_id)
                .map(Vec::as_slice)
                .unwrap_or(&[]),
        }
    }

    /// Type of a prospective parent; `Ok(None)` is the page root
    pub fn parent_type(&self, parent: Option<&str>) -> Result<Option<ElementType>, TreeError> {
        match parent {
            None => Ok(None),
            Some(parent_id) => self
                .get(parent_id)
                .map(|el| Some(el.element_type))
                .ok_or_else(|| TreeError::ParentNotFound(parent_id.to_string())),
        }
    }

    /// Whether an element of `child` type may be placed under `parent`
    pub fn can_place(&self, child: ElementType, parent: Option<&str>) -> bool {
        self.check_placement(child, parent).is_ok()
    }

    /// Parent must exist and accept `child`
    pub fn check_placement(&self, child: ElementType, parent: Option<&str>) -> Result<(), TreeError> {
        let parent_type = self.parent_type(parent)?;
        if !can_drop_into_parent(child, parent_type) {
            debug!(%child, parent = ?parent_type, "Rejected placement");
            return Err(TreeError::InvalidPlacement {
                child,
                parent: parent_type,
            });
        }
        Ok(())
    }

    /// Every check a move runs before touching the tree: parent exists, no
    /// cycle, placement legal. Unknown `id` passes, the move itself is a no-op.
    pub fn check_move(&self, id: &str, new_parent_id: Option<&str>) -> Result<(), TreeError> {
        let Some(element) = self.get(id) else {
            return Ok(());
        };
        if let Some(parent_id) = new_parent_id {
            if !self.contains(parent_id) {
                return Err(TreeError::ParentNotFound(parent_id.to_string()));
            }
            if self.would_create_cycle(id, parent_id) {
                debug!(element_id = %id, parent_id = %parent_id, "Rejected move into own subtree");
                return Err(TreeError::CycleDetected {
                    node_id: id.to_string(),
                    new_parent_id: parent_id.to_string(),
                });
            }
        }
        self.check_placement(element.element_type, new_parent_id)
    }

    /// Walk the parent chain of `node_id`, looking for `ancestor_id`
    pub fn is_ancestor(&self, ancestor_id: &str, node_id: &str) -> bool {
        let mut current = self.get(node_id).and_then(|el| el.parent_id.as_deref());
        let mut steps = 0;
        while let Some(id) = current {
            if id == ancestor_id {
                return true;
            }
            steps += 1;
            if steps > self.len() {
                break;
            }
            current = self.get(id).and_then(|el| el.parent_id.as_deref());
        }
        false
    }

    /// Would putting `node_id` under `new_parent_id` close a loop?
    pub fn would_create_cycle(&self, node_id: &str, new_parent_id: &str) -> bool {
        node_id == new_parent_id || self.is_ancestor(node_id, new_parent_id)
    }

    /// Number of ancestors (roots have depth 0)
    pub fn depth(&self, id: &str) -> Option<usize> {
        let mut element = self.get(id)?;
        let mut depth = 0;
        while let Some(parent) = element.parent_id.as_deref().and_then(|p| self.get(p)) {
            depth += 1;
            if depth > self.len() {
                break;
            }
            element = parent;
        }
        Some(depth)
    }

    /// `id` and all its descendants, pre-order
    pub fn subtree_ids(&self, id: &str) -> Vec<ElementId> {
        if !self.contains(id) {
            return Vec::new();
        }
        let mut out = Vec::new();
        let mut stack = vec![id.to_string()];
        while let Some(current) = stack.pop() {
            stack.extend(self.children_of(Some(current.as_str())).iter().rev().cloned());
            out.push(current);
        }
        out
    }

    fn preorder_ids(&self) -> Vec<ElementId> {
        let mut out = Vec::with_capacity(self.len());
        let mut stack: Vec<ElementId> = self.roots.iter().rev().cloned().collect();
        while let Some(current) = stack.pop() {
            stack.extend(self.children_of(Some(current.as_str())).iter().rev().cloned());
            out.push(current);
        }
        out
    }

    /// Elements in pre-order
    pub fn iter(&self) -> impl Iterator<Item = &Element> + '_ {
        self.preorder_ids()
            .into_iter()
            .filter_map(move |id| self.elements.get(&id))
    }

    /// Create an element from its type template and insert it.
    ///
    /// `position` is clamped to the sibling count; `None` appends.
    pub fn add_element(
        &mut self,
        partial: NewElement,
        parent_id: Option<&str>,
        position: Option<usize>,
        ids: &mut dyn IdProvider,
    ) -> Result<ElementId, TreeError> {
        self.check_placement(partial.element_type, parent_id)?;

        let id = self.fresh_id(ids)?;
        let now = Utc::now();
        let element_type = partial.element_type;
        let element = Element {
            id: id.clone(),
            page_id: self.page_id.clone(),
            parent_id: parent_id.map(str::to_string),
            element_type,
            position: 0,
            content: partial.content.unwrap_or_else(|| default_content(element_type)),
            styles: partial
                .styles
                .map(|styles| normalize_inline_styles(&styles))
                .unwrap_or_else(|| template_styles(element_type)),
            responsive_styles: partial
                .responsive_styles
                .map(|mut responsive| {
                    for viewport in [Viewport::Tablet, Viewport::Mobile] {
                        if let Some(Some(layer)) = responsive.layer_mut(viewport) {
                            *layer = normalize_inline_styles(layer);
                        }
                    }
                    responsive
                })
                .unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };

        self.elements.insert(id.clone(), element);
        let group = self.group_mut(parent_id);
        let index = position.unwrap_or(group.len()).min(group.len());
        group.insert(index, id.clone());
        self.renumber(parent_id, true);

        debug!(element_id = %id, element_type = %element_type, parent_id = ?parent_id, index, "Added element");
        Ok(id)
    }

    /// Insert nested templates (e.g. a preset) side by side as one atomic
    /// step. Returns the ids of the top-level elements created.
    pub fn add_templates(
        &mut self,
        templates: &[TemplateNode],
        parent_id: Option<&str>,
        position: Option<usize>,
        ids: &mut dyn IdProvider,
    ) -> Result<Vec<ElementId>, TreeError> {
        let mut staged = self.clone();
        let start = position.unwrap_or(usize::MAX);
        let mut created = Vec::with_capacity(templates.len());
        for (offset, template) in templates.iter().enumerate() {
            let at = start.saturating_add(offset);
            created.push(staged.add_template_node(template, parent_id, Some(at), ids)?);
        }
        *self = staged;
        Ok(created)
    }

    fn add_template_node(
        &mut self,
        template: &TemplateNode,
        parent_id: Option<&str>,
        position: Option<usize>,
        ids: &mut dyn IdProvider,
    ) -> Result<ElementId, TreeError> {
        let id = self.add_element(template.element.clone(), parent_id, position, ids)?;
        for child in &template.children {
            self.add_template_node(child, Some(id.as_str()), None, ids)?;
        }
        Ok(id)
    }

    fn fresh_id(&self, ids: &mut dyn IdProvider) -> Result<ElementId, TreeError> {
        let mut id = ids.next_id();
        for _ in 1..MAX_ID_ATTEMPTS {
            if !self.contains(&id) {
                return Ok(id);
            }
            id = ids.next_id();
        }
        if self.contains(&id) {
            Err(TreeError::DuplicateId(id))
        } else {
            Ok(id)
        }
    }

    /// Replace the fields present in `patch`. Unknown ids are a no-op.
    pub fn update_element(&mut self, id: &str, patch: ElementPatch) -> bool {
        let Some(element) = self.elements.get_mut(id) else {
            debug!(element_id = %id, "Update of unknown element ignored");
            return false;
        };

        if let Some(content) = patch.content {
            element.content = content;
        }
        if let Some(styles) = patch.styles {
            element.styles = normalize_inline_styles(&styles);
        }
        if let Some(mut responsive) = patch.responsive_styles {
            for viewport in [Viewport::Tablet, Viewport::Mobile] {
                if let Some(Some(layer)) = responsive.layer_mut(viewport) {
                    *layer = normalize_inline_styles(layer);
                }
            }
            element.responsive_styles = responsive;
        }
        element.touch();
        true
    }

    /// Merge `patch` into one viewport's styles. Unknown ids are a no-op.
    pub fn update_styles(&mut self, id: &str, viewport: Viewport, patch: &StyleMap) -> bool {
        let Some(element) = self.elements.get_mut(id) else {
            debug!(element_id = %id, "Style update of unknown element ignored");
            return false;
        };
        *element = update_responsive_styles(element, viewport, patch);
        true
    }

    /// Remove an element and its whole subtree. Returns what was removed,
    /// empty when the id is unknown.
    pub fn delete_element(&mut self, id: &str) -> Vec<Element> {
        let doomed = self.subtree_ids(id);
        if doomed.is_empty() {
            debug!(element_id = %id, "Delete of unknown element ignored");
            return Vec::new();
        }

        let parent_id = self.get(id).and_then(|el| el.parent_id.clone());
        self.detach(id);

        let removed: Vec<Element> = doomed
            .iter()
            .filter_map(|doomed_id| {
                self.children.remove(doomed_id);
                self.elements.remove(doomed_id)
            })
            .collect();

        self.renumber(parent_id.as_deref(), true);
        debug!(element_id = %id, removed = removed.len(), "Deleted subtree");
        removed
    }

    /// Re-parent and reposition an element.
    ///
    /// `new_position` indexes the destination group with the moved element
    /// already taken out, and is clamped. Returns `Ok(false)` for unknown ids
    /// and for moves that land where the element already is.
    pub fn move_element(
        &mut self,
        id: &str,
        new_parent_id: Option<&str>,
        new_position: usize,
    ) -> Result<bool, TreeError> {
        let Some(element) = self.get(id) else {
            debug!(element_id = %id, "Move of unknown element ignored");
            return Ok(false);
        };
        let old_parent_id = element.parent_id.clone();
        self.check_move(id, new_parent_id)?;

        let same_parent = old_parent_id.as_deref() == new_parent_id;
        if same_parent {
            let siblings = self.children_of(new_parent_id);
            let current = siblings.iter().position(|s| s == id);
            let target = new_position.min(siblings.len().saturating_sub(1));
            if current == Some(target) {
                return Ok(false);
            }
        }

        self.detach(id);
        self.renumber(old_parent_id.as_deref(), true);

        let group = self.group_mut(new_parent_id);
        let index = new_position.min(group.len());
        group.insert(index, id.to_string());

        if let Some(element) = self.elements.get_mut(id) {
            element.parent_id = new_parent_id.map(str::to_string);
            element.touch();
        }
        self.renumber(new_parent_id, true);

        debug!(element_id = %id, parent_id = ?new_parent_id, index, "Moved element");
        Ok(true)
    }

    /// Persisted shape: pre-order, positions stamped
    pub fn flatten(&self) -> Vec<Element> {
        self.iter().cloned().collect()
    }

    /// Derived nested view of the whole page
    pub fn nodes(&self) -> Vec<ElementNode> {
        self.roots.iter().filter_map(|id| self.node(id)).collect()
    }

    pub fn node(&self, id: &str) -> Option<ElementNode> {
        let element = self.get(id)?.clone();
        let children = self
            .children_of(Some(id))
            .iter()
            .filter_map(|child| self.node(child))
            .collect();
        Some(ElementNode { element, children })
    }

    fn group_mut(&mut self, parent: Option<&str>) -> &mut Vec<ElementId> {
        match parent {
            None => &mut self.roots,
            Some(parent_id) => self.children.entry(parent_id.to_string()).or_default(),
        }
    }

    /// Take `id` out of its parent's group. Empty groups are dropped.
    fn detach(&mut self, id: &str) {
        let parent = self.get(id).and_then(|el| el.parent_id.clone());
        match parent {
            None => self.roots.retain(|r| r != id),
            Some(parent_id) => {
                if let Some(group) = self.children.get_mut(&parent_id) {
                    group.retain(|c| c != id);
                    if group.is_empty() {
                        self.children.remove(&parent_id);
                    }
                }
            }
        }
    }

    /// Stamp `0..n-1` onto a sibling group. `touch` refreshes `updatedAt` on
    /// every element whose position changed.
    fn renumber(&mut self, parent: Option<&str>, touch: bool) {
        let group = match parent {
            None => &self.roots,
            Some(parent_id) => match self.children.get(parent_id) {
                Some(group) => group,
                None => return,
            },
        };

        for (index, id) in group.iter().enumerate() {
            if let Some(element) = self.elements.get_mut(id) {
                if element.position != index {
                    element.position = index;
                    if touch {
                        element.touch();
                    }
                }
            }
        }
    }
}

/// Persisted maps may predate normalization; repair them before they can
/// reach rendering
fn normalize_loaded_styles(element: &mut Element) {
    let id = &element.id;
    let layers = [
        (Viewport::Desktop, Some(&mut element.styles)),
        (Viewport::Tablet, element.responsive_styles.tablet.as_mut()),
        (Viewport::Mobile, element.responsive_styles.mobile.as_mut()),
    ];
    for (viewport, styles) in layers {
        let Some(styles) = styles else { continue };
        let normalized = normalize_inline_styles(styles);
        if normalized != *styles {
            warn!(element_id = %id, %viewport, "Conflicting styles normalized on load");
            *styles = normalized;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::style_map;
    use crate::ids::SequentialIds;

    fn flat(id: &str, parent: Option<&str>, ty: ElementType, position: usize) -> Element {
        let now = Utc::now();
        Element {
            id: id.to_string(),
            page_id: "page".to_string(),
            parent_id: parent.map(str::to_string),
            element_type: ty,
            position,
            content: Default::default(),
            styles: StyleMap::new(),
            responsive_styles: Default::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// s1 [ c1 [ t1, t2 ], b1 ], s2
    fn sample() -> ElementTree {
        build_tree(vec![
            flat("t2", Some("c1"), ElementType::Text, 5),
            flat("s2", None, ElementType::Section, 1),
            flat("c1", Some("s1"), ElementType::Container, 0),
            flat("b1", Some("s1"), ElementType::Button, 1),
            flat("t1", Some("c1"), ElementType::Text, 2),
            flat("s1", None, ElementType::Section, 0),
        ])
    }

    fn assert_contiguous(tree: &ElementTree) {
        let mut parents: Vec<Option<&str>> = vec![None];
        parents.extend(tree.iter().map(|el| Some(el.id.as_str())));
        for parent in parents {
            for (index, id) in tree.children_of(parent).iter().enumerate() {
                assert_eq!(tree.get(id).unwrap().position, index, "{id}");
            }
        }
    }

    #[test]
    fn test_build_orders_and_renumbers() {
        let tree = sample();
        assert_eq!(tree.roots(), ["s1", "s2"]);
        assert_eq!(tree.children_of(Some("c1")), ["t1", "t2"]);
        assert_eq!(tree.get("t2").unwrap().position, 1);
        assert_contiguous(&tree);
    }

    #[test]
    fn test_flatten_is_preorder() {
        let ids: Vec<_> = sample().flatten().into_iter().map(|el| el.id).collect();
        assert_eq!(ids, ["s1", "c1", "t1", "t2", "b1", "s2"]);
    }

    #[test]
    fn test_flatten_build_round_trip() {
        let tree = sample();
        let rebuilt = build_tree(tree.flatten());
        assert_eq!(rebuilt, tree);
    }

    #[test]
    fn test_orphans_attach_to_root() {
        let tree = build_tree(vec![
            flat("s1", None, ElementType::Section, 0),
            flat("t1", Some("gone"), ElementType::Text, 0),
        ]);
        assert_eq!(tree.roots(), ["s1", "t1"]);
        assert!(tree.get("t1").unwrap().parent_id.is_none());
    }

    #[test]
    fn test_cyclic_input_is_repaired() {
        let tree = build_tree(vec![
            flat("a", Some("b"), ElementType::Section, 0),
            flat("b", Some("a"), ElementType::Container, 0),
        ]);
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.flatten().len(), 2);
        assert_eq!(tree.roots(), ["a"]);
        assert_eq!(tree.children_of(Some("a")), ["b"]);
    }

    #[test]
    fn test_load_stamps_page_id() {
        let mut record = flat("s1", None, ElementType::Section, 0);
        record.page_id = String::new();

        let tree = ElementTree::from_flat("about", vec![record]);
        assert_eq!(tree.get("s1").unwrap().page_id, "about");
        assert!(tree.to_json().unwrap().contains(r#""pageId":"about""#));
    }

    #[test]
    fn test_load_renumbering_keeps_updated_at() {
        let records = vec![
            flat("s1", None, ElementType::Section, 4),
            flat("s2", None, ElementType::Section, 9),
        ];
        let stamps: Vec<_> = records.iter().map(|el| el.updated_at).collect();

        let tree = ElementTree::from_flat("page", records);
        assert_eq!(tree.get("s1").unwrap().position, 0);
        assert_eq!(tree.get("s2").unwrap().position, 1);
        assert_eq!(tree.get("s1").unwrap().updated_at, stamps[0]);
        assert_eq!(tree.get("s2").unwrap().updated_at, stamps[1]);
    }

    #[test]
    fn test_load_normalizes_every_layer() {
        let mut record = flat("s1", None, ElementType::Section, 0);
        record.styles = style_map([("padding", "8px"), ("paddingTop", "0")]);
        record.responsive_styles.mobile = Some(style_map([("margin", "0 4px"), ("marginLeft", "1px")]));

        let tree = ElementTree::from_flat("page", vec![record]);
        let el = tree.get("s1").unwrap();
        assert!(!el.styles.contains_key("padding"));
        assert_eq!(el.styles.get("paddingTop").map(String::as_str), Some("0"));
        assert_eq!(el.styles.get("paddingBottom").map(String::as_str), Some("8px"));

        let mobile = el.responsive_styles.mobile.as_ref().unwrap();
        assert!(!mobile.contains_key("margin"));
        assert_eq!(mobile.get("marginLeft").map(String::as_str), Some("1px"));
        assert_eq!(mobile.get("marginRight").map(String::as_str), Some("4px"));
    }

    #[test]
    fn test_add_element_uses_template() {
        let mut tree = ElementTree::new("page");
        let mut ids = SequentialIds::new("el");
        let id = tree
            .add_element(NewElement::of(ElementType::Section), None, None, &mut ids)
            .unwrap();

        let el = tree.get(&id).unwrap();
        assert_eq!(id, "el-1");
        assert_eq!(el.page_id, "page");
        assert_eq!(el.styles, template_styles(ElementType::Section));
        assert_eq!(el.created_at, el.updated_at);
    }

    #[test]
    fn test_add_element_at_position() {
        let mut tree = sample();
        let mut ids = SequentialIds::new("new");
        let id = tree
            .add_element(NewElement::of(ElementType::Image), Some("c1"), Some(1), &mut ids)
            .unwrap();
        assert_eq!(tree.children_of(Some("c1")), ["t1", id.as_str(), "t2"]);

        let id = tree
            .add_element(NewElement::of(ElementType::Image), Some("c1"), Some(99), &mut ids)
            .unwrap();
        assert_eq!(tree.children_of(Some("c1")).last(), Some(&id));
        assert_contiguous(&tree);
    }

    #[test]
    fn test_add_element_rejects_bad_placement() {
        let mut tree = sample();
        let before = tree.clone();
        let mut ids = SequentialIds::default();

        let err = tree
            .add_element(NewElement::of(ElementType::Text), None, None, &mut ids)
            .unwrap_err();
        assert!(matches!(err, TreeError::InvalidPlacement { parent: None, .. }));

        let err = tree
            .add_element(NewElement::of(ElementType::Text), Some("t1"), None, &mut ids)
            .unwrap_err();
        assert!(matches!(err, TreeError::InvalidPlacement { .. }));

        let err = tree
            .add_element(NewElement::of(ElementType::Text), Some("nope"), None, &mut ids)
            .unwrap_err();
        assert_eq!(err, TreeError::ParentNotFound("nope".to_string()));

        assert_eq!(tree, before);
    }

    #[test]
    fn test_add_element_skips_taken_ids() {
        let mut tree = build_tree(vec![flat("element-1", None, ElementType::Section, 0)]);
        let mut ids = SequentialIds::default();
        let id = tree
            .add_element(NewElement::of(ElementType::Footer), None, None, &mut ids)
            .unwrap();
        assert_eq!(id, "element-2");
    }

    #[test]
    fn test_update_element_normalizes_styles() {
        let mut tree = sample();
        let patch = ElementPatch::styles(style_map([("margin", "1px 2px"), ("marginTop", "0")]));
        assert!(tree.update_element("t1", patch));

        let styles = &tree.get("t1").unwrap().styles;
        assert_eq!(styles["marginTop"], "0");
        assert_eq!(styles["marginRight"], "2px");
        assert!(!styles.contains_key("margin"));

        assert!(!tree.update_element("missing", ElementPatch::default()));
    }

    #[test]
    fn test_delete_cascades() {
        let mut tree = sample();
        let removed = tree.delete_element("c1");

        let mut removed_ids: Vec<_> = removed.into_iter().map(|el| el.id).collect();
        removed_ids.sort();
        assert_eq!(removed_ids, ["c1", "t1", "t2"]);
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.children_of(Some("s1")), ["b1"]);
        assert_eq!(tree.get("b1").unwrap().position, 0);
        assert_contiguous(&tree);
    }

    #[test]
    fn test_delete_unknown_is_noop() {
        let mut tree = sample();
        let before = tree.clone();
        assert!(tree.delete_element("ghost").is_empty());
        assert_eq!(tree, before);
    }

    #[test]
    fn test_move_rejects_cycles() {
        let mut tree = sample();
        let before = tree.clone();

        let err = tree.move_element("s1", Some("c1"), 0).unwrap_err();
        assert!(matches!(err, TreeError::CycleDetected { .. }));

        let err = tree.move_element("c1", Some("c1"), 0).unwrap_err();
        assert!(matches!(err, TreeError::CycleDetected { .. }));

        assert_eq!(tree, before);
    }

    #[test]
    fn test_move_rejects_illegal_parent() {
        let mut tree = sample();
        let before = tree.clone();
        assert!(tree.move_element("c1", Some("s2"), 0).is_ok());

        let mut tree = before.clone();
        let err = tree.move_element("c1", None, 0).unwrap_err();
        assert!(matches!(err, TreeError::InvalidPlacement { .. }));
        let err = tree.move_element("t1", Some("b1"), 0).unwrap_err();
        assert!(matches!(err, TreeError::InvalidPlacement { .. }));
        assert_eq!(tree, before);
    }

    #[test]
    fn test_check_move_matches_move_element() {
        let cases: [(&str, Option<&str>); 6] = [
            ("s1", Some("c1")),
            ("c1", Some("c1")),
            ("c1", None),
            ("t1", Some("b1")),
            ("t1", Some("gone")),
            ("c1", Some("s2")),
        ];
        for (id, parent) in cases {
            let tree = sample();
            let checked = tree.check_move(id, parent);
            let moved = tree.clone().move_element(id, parent, 0).map(|_| ());
            assert_eq!(checked, moved, "{id} -> {parent:?}");
        }
        assert_eq!(sample().check_move("ghost", Some("gone")), Ok(()));
    }

    #[test]
    fn test_move_across_parents_renumbers_both_groups() {
        let mut tree = sample();
        assert!(tree.move_element("t1", Some("s2"), 0).unwrap());

        assert_eq!(tree.children_of(Some("c1")), ["t2"]);
        assert_eq!(tree.children_of(Some("s2")), ["t1"]);
        assert_eq!(tree.get("t1").unwrap().parent_id.as_deref(), Some("s2"));
        assert_contiguous(&tree);
    }

    #[test]
    fn test_move_within_parent() {
        let mut tree = sample();
        assert!(tree.move_element("s1", None, 1).unwrap());
        assert_eq!(tree.roots(), ["s2", "s1"]);

        // already there
        assert!(!tree.move_element("s1", None, 5).unwrap());
        assert!(!tree.move_element("ghost", None, 0).unwrap());
        assert_contiguous(&tree);
    }

    #[test]
    fn test_depth_and_ancestry() {
        let tree = sample();
        assert_eq!(tree.depth("s1"), Some(0));
        assert_eq!(tree.depth("t2"), Some(2));
        assert!(tree.is_ancestor("s1", "t2"));
        assert!(!tree.is_ancestor("t2", "s1"));
        assert_eq!(tree.subtree_ids("c1"), ["c1", "t1", "t2"]);
    }

    #[test]
    fn test_nodes_view() {
        let nodes = sample().nodes();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].len(), 5);
        assert_eq!(nodes[0].children[0].children[1].element.id, "t2");
    }
}
