//! # Tree Mutations
//!
//! The semantic commands an editing session commits. Each one either fully
//! applies to an [`ElementTree`] or leaves it untouched.
//!
//! ## Mutation Semantics
//!
//! ### AddElement
//! - Fresh id from the session's provider, template defaults for missing fields
//! - Fails if the parent is missing or does not accept the type
//!
//! ### MoveElement
//! - Fails if the new parent is the node itself or one of its descendants
//! - Fails if the new parent does not accept the node's type
//! - Old and new sibling groups are renumbered
//!
//! ### UpdateElement / UpdateStyles
//! - Style maps are normalized before they are stored
//! - Unknown ids are no-ops
//!
//! ### DeleteElement
//! - Removes the node and all descendants
//! - Unknown ids are no-ops
//!
//! ### ApplyPreset
//! - Expands a preset's templates under a parent of the preset's target type

use pagecraft_core::{
    describe_parent, find_preset, ElementId, ElementPatch, ElementTree, ElementType, IdProvider, NewElement,
    StyleMap, TreeError, Viewport,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Mutation {
    /// Create an element from a (partial) template
    #[serde(rename_all = "camelCase")]
    AddElement {
        element: NewElement,
        #[serde(default)]
        parent_id: Option<ElementId>,
        /// Index among the new siblings; `None` appends
        #[serde(default)]
        position: Option<usize>,
    },

    /// Replace content and/or style fields
    #[serde(rename_all = "camelCase")]
    UpdateElement {
        element_id: ElementId,
        patch: ElementPatch,
    },

    /// Merge a patch into one viewport's styles
    #[serde(rename_all = "camelCase")]
    UpdateStyles {
        element_id: ElementId,
        #[serde(default)]
        viewport: Viewport,
        styles: StyleMap,
    },

    /// Remove an element and its subtree
    #[serde(rename_all = "camelCase")]
    DeleteElement { element_id: ElementId },

    /// Re-parent and reposition
    #[serde(rename_all = "camelCase")]
    MoveElement {
        element_id: ElementId,
        #[serde(default)]
        new_parent_id: Option<ElementId>,
        position: usize,
    },

    /// Expand a named preset under `parent_id`
    #[serde(rename_all = "camelCase")]
    ApplyPreset {
        preset_id: String,
        parent_id: ElementId,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error("Unknown preset: {0}")]
    UnknownPreset(String),

    #[error("Preset {preset} targets {expected}, not {}", describe_parent(.found))]
    PresetTarget {
        preset: String,
        expected: ElementType,
        found: Option<ElementType>,
    },
}

/// What a successful mutation did to the tree
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum MutationResult {
    /// New top-level elements, in insertion order
    Created { ids: Vec<ElementId> },
    Changed,
    /// Nothing to do (unknown id, or already in place)
    Unchanged,
}

impl MutationResult {
    pub fn changed(&self) -> bool {
        !matches!(self, MutationResult::Unchanged)
    }

    pub fn created(&self) -> &[ElementId] {
        match self {
            MutationResult::Created { ids } => ids,
            _ => &[],
        }
    }
}

impl Mutation {
    pub fn delete(element_id: impl Into<ElementId>) -> Self {
        Mutation::DeleteElement {
            element_id: element_id.into(),
        }
    }

    /// The element this mutation targets, if it targets an existing one
    pub fn element_id(&self) -> Option<&str> {
        match self {
            Mutation::UpdateElement { element_id, .. }
            | Mutation::UpdateStyles { element_id, .. }
            | Mutation::DeleteElement { element_id }
            | Mutation::MoveElement { element_id, .. } => Some(element_id.as_str()),
            Mutation::AddElement { .. } | Mutation::ApplyPreset { .. } => None,
        }
    }

    /// Check structural constraints without touching the tree
    pub fn validate(&self, tree: &ElementTree) -> Result<(), MutationError> {
        match self {
            Mutation::AddElement { element, parent_id, .. } => {
                Ok(tree.check_placement(element.element_type, parent_id.as_deref())?)
            }

            Mutation::MoveElement { element_id, new_parent_id, .. } => {
                Ok(tree.check_move(element_id, new_parent_id.as_deref())?)
            }

            Mutation::ApplyPreset { preset_id, parent_id } => {
                let preset = find_preset(preset_id)
                    .ok_or_else(|| MutationError::UnknownPreset(preset_id.clone()))?;
                let parent_type = tree.parent_type(Some(parent_id.as_str()))?;
                if parent_type != Some(preset.target) {
                    return Err(MutationError::PresetTarget {
                        preset: preset_id.clone(),
                        expected: preset.target,
                        found: parent_type,
                    });
                }
                Ok(())
            }

            Mutation::UpdateElement { .. }
            | Mutation::UpdateStyles { .. }
            | Mutation::DeleteElement { .. } => Ok(()),
        }
    }

    /// Apply to `tree` with validation
    pub fn apply(
        &self,
        tree: &mut ElementTree,
        ids: &mut dyn IdProvider,
    ) -> Result<MutationResult, MutationError> {
        self.validate(tree)?;

        let result = match self {
            Mutation::AddElement { element, parent_id, position } => {
                let id = tree.add_element(element.clone(), parent_id.as_deref(), *position, ids)?;
                MutationResult::Created { ids: vec![id] }
            }

            Mutation::UpdateElement { element_id, patch } => {
                changed(tree.update_element(element_id, patch.clone()))
            }

            Mutation::UpdateStyles { element_id, viewport, styles } => {
                changed(tree.update_styles(element_id, *viewport, styles))
            }

            Mutation::DeleteElement { element_id } => {
                changed(!tree.delete_element(element_id).is_empty())
            }

            Mutation::MoveElement { element_id, new_parent_id, position } => {
                changed(tree.move_element(element_id, new_parent_id.as_deref(), *position)?)
            }

            Mutation::ApplyPreset { preset_id, parent_id } => {
                let preset = find_preset(preset_id)
                    .ok_or_else(|| MutationError::UnknownPreset(preset_id.clone()))?;
                let ids = tree.add_templates(&preset.elements, Some(parent_id.as_str()), None, ids)?;
                MutationResult::Created { ids }
            }
        };

        Ok(result)
    }
}

fn changed(applied: bool) -> MutationResult {
    if applied {
        MutationResult::Changed
    } else {
        MutationResult::Unchanged
    }
}

impl From<NewElement> for Mutation {
    /// Append at the page root
    fn from(element: NewElement) -> Self {
        Mutation::AddElement {
            element,
            parent_id: None,
            position: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagecraft_core::{style_map, SequentialIds};

    fn page() -> (ElementTree, SequentialIds) {
        let mut tree = ElementTree::new("page");
        let mut ids = SequentialIds::new("el");
        let section = tree
            .add_element(NewElement::of(ElementType::Section), None, None, &mut ids)
            .unwrap();
        tree.add_element(NewElement::of(ElementType::Container), Some(section.as_str()), None, &mut ids)
            .unwrap();
        (tree, ids)
    }

    #[test]
    fn test_add_element_mutation() {
        let (mut tree, mut ids) = page();
        let mutation = Mutation::AddElement {
            element: NewElement::of(ElementType::Text),
            parent_id: Some("el-2".to_string()),
            position: None,
        };

        let result = mutation.apply(&mut tree, &mut ids).unwrap();
        assert_eq!(result.created(), ["el-3"]);
        assert_eq!(tree.children_of(Some("el-2")), ["el-3"]);
    }

    #[test]
    fn test_invalid_add_leaves_tree_unchanged() {
        let (mut tree, mut ids) = page();
        let before = tree.clone();

        let err = Mutation::from(NewElement::of(ElementType::Text))
            .apply(&mut tree, &mut ids)
            .unwrap_err();
        assert!(matches!(err, MutationError::Tree(TreeError::InvalidPlacement { .. })));
        assert_eq!(tree, before);
    }

    #[test]
    fn test_move_into_descendant_fails_validation() {
        let (tree, _) = page();
        let mutation = Mutation::MoveElement {
            element_id: "el-1".to_string(),
            new_parent_id: Some("el-2".to_string()),
            position: 0,
        };
        assert!(matches!(
            mutation.validate(&tree),
            Err(MutationError::Tree(TreeError::CycleDetected { .. }))
        ));
    }

    #[test]
    fn test_noops_report_unchanged() {
        let (mut tree, mut ids) = page();

        let result = Mutation::delete("ghost").apply(&mut tree, &mut ids).unwrap();
        assert_eq!(result, MutationResult::Unchanged);

        let result = Mutation::UpdateStyles {
            element_id: "ghost".to_string(),
            viewport: Viewport::Mobile,
            styles: style_map([("color", "red")]),
        }
        .apply(&mut tree, &mut ids)
        .unwrap();
        assert!(!result.changed());
    }

    #[test]
    fn test_update_styles_mutation() {
        let (mut tree, mut ids) = page();
        let result = Mutation::UpdateStyles {
            element_id: "el-2".to_string(),
            viewport: Viewport::Tablet,
            styles: style_map([("padding", "4px"), ("paddingLeft", "0")]),
        }
        .apply(&mut tree, &mut ids)
        .unwrap();
        assert!(result.changed());

        let tablet = tree.get("el-2").unwrap().responsive_styles.tablet.clone().unwrap();
        assert_eq!(tablet["paddingLeft"], "0");
        assert_eq!(tablet["paddingTop"], "4px");
        assert!(!tablet.contains_key("padding"));
    }

    #[test]
    fn test_apply_preset_requires_target_type() {
        let (mut tree, mut ids) = page();
        let mutation = Mutation::ApplyPreset {
            preset_id: "simple-navbar".to_string(),
            parent_id: "el-1".to_string(),
        };
        let err = mutation.apply(&mut tree, &mut ids).unwrap_err();
        assert!(matches!(err, MutationError::PresetTarget { .. }));

        let err = Mutation::ApplyPreset {
            preset_id: "nope".to_string(),
            parent_id: "el-1".to_string(),
        }
        .validate(&tree)
        .unwrap_err();
        assert_eq!(err, MutationError::UnknownPreset("nope".to_string()));
    }

    #[test]
    fn test_apply_preset_under_navbar() {
        let mut tree = ElementTree::new("page");
        let mut ids = SequentialIds::new("n");
        let navbar = tree
            .add_element(NewElement::of(ElementType::Navbar), None, None, &mut ids)
            .unwrap();

        let result = Mutation::ApplyPreset {
            preset_id: "cta-navbar".to_string(),
            parent_id: navbar.clone(),
        }
        .apply(&mut tree, &mut ids)
        .unwrap();

        assert_eq!(result.created().len(), 3);
        assert_eq!(tree.children_of(Some(navbar.as_str())), result.created());
        // navbar + logo + link row with two links + button
        assert_eq!(tree.len(), 6);
    }

    #[test]
    fn test_serialize_mutation() {
        let json = r#"{
            "kind": "moveElement",
            "elementId": "a",
            "newParentId": "b",
            "position": 2
        }"#;
        let mutation: Mutation = serde_json::from_str(json).unwrap();
        assert_eq!(
            mutation,
            Mutation::MoveElement {
                element_id: "a".to_string(),
                new_parent_id: Some("b".to_string()),
                position: 2,
            }
        );

        let json = r#"{ "kind": "addElement", "element": { "type": "section" } }"#;
        let mutation: Mutation = serde_json::from_str(json).unwrap();
        assert_eq!(mutation, Mutation::from(NewElement::of(ElementType::Section)));
    }
}
