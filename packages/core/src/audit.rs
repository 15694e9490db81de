//! # Page Audit
//!
//! Checks a flat persisted page for the problems loading would silently
//! repair or that editing would never produce: dangling parents, illegal
//! nesting, gaps in sibling positions, duplicate ids and style conflicts.

use crate::element::{Element, ElementId, ElementType, Viewport};
use crate::hierarchy::can_drop_into_parent;
use crate::styles::{validate_styles, StyleConflict};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum AuditIssue {
    DuplicateId {
        id: ElementId,
    },
    DanglingParent {
        id: ElementId,
        parent_id: ElementId,
    },
    InvalidPlacement {
        id: ElementId,
        child: ElementType,
        parent: Option<ElementType>,
    },
    NonContiguousPositions {
        parent_id: Option<ElementId>,
        positions: Vec<usize>,
    },
    StyleConflict {
        id: ElementId,
        viewport: Viewport,
        conflict: StyleConflict,
    },
}

impl fmt::Display for AuditIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditIssue::DuplicateId { id } => write!(f, "{id}: duplicate id"),
            AuditIssue::DanglingParent { id, parent_id } => {
                write!(f, "{id}: parent {parent_id} does not exist")
            }
            AuditIssue::InvalidPlacement { id, child, parent } => match parent {
                Some(parent) => write!(f, "{id}: {child} cannot be placed under {parent}"),
                None => write!(f, "{id}: {child} cannot be placed at page root"),
            },
            AuditIssue::NonContiguousPositions { parent_id, positions } => write!(
                f,
                "{}: sibling positions {:?} are not 0..{}",
                parent_id.as_deref().unwrap_or("page root"),
                positions,
                positions.len()
            ),
            AuditIssue::StyleConflict { id, viewport, conflict } => {
                write!(f, "{id} ({viewport}): {conflict}")
            }
        }
    }
}

pub fn audit_page(flat: &[Element]) -> Vec<AuditIssue> {
    let mut issues = Vec::new();
    let mut seen = HashSet::new();
    let by_id: HashMap<&str, &Element> = flat.iter().map(|el| (el.id.as_str(), el)).collect();

    for element in flat {
        if !seen.insert(element.id.as_str()) {
            issues.push(AuditIssue::DuplicateId {
                id: element.id.clone(),
            });
        }
    }

    let mut groups: BTreeMap<Option<&str>, Vec<usize>> = BTreeMap::new();
    for element in flat {
        let parent_type = match element.parent_id.as_deref() {
            None => Some(None),
            Some(parent_id) => match by_id.get(parent_id) {
                Some(parent) => Some(Some(parent.element_type)),
                None => {
                    issues.push(AuditIssue::DanglingParent {
                        id: element.id.clone(),
                        parent_id: parent_id.to_string(),
                    });
                    None
                }
            },
        };

        if let Some(parent_type) = parent_type {
            if !can_drop_into_parent(element.element_type, parent_type) {
                issues.push(AuditIssue::InvalidPlacement {
                    id: element.id.clone(),
                    child: element.element_type,
                    parent: parent_type,
                });
            }
        }

        groups
            .entry(element.parent_id.as_deref())
            .or_default()
            .push(element.position);

        let layers = [
            (Viewport::Desktop, Some(&element.styles)),
            (Viewport::Tablet, element.responsive_styles.tablet.as_ref()),
            (Viewport::Mobile, element.responsive_styles.mobile.as_ref()),
        ];
        for (viewport, styles) in layers {
            let Some(styles) = styles else { continue };
            for conflict in validate_styles(styles) {
                issues.push(AuditIssue::StyleConflict {
                    id: element.id.clone(),
                    viewport,
                    conflict,
                });
            }
        }
    }

    for (parent_id, mut positions) in groups {
        positions.sort_unstable();
        if positions.iter().enumerate().any(|(index, pos)| index != *pos) {
            issues.push(AuditIssue::NonContiguousPositions {
                parent_id: parent_id.map(str::to_string),
                positions,
            });
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::style_map;

    fn parse(json: &str) -> Vec<Element> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_clean_page_has_no_issues() {
        let flat = parse(
            r#"[
                { "id": "s", "type": "section", "position": 0 },
                { "id": "t", "type": "text", "parentId": "s", "position": 0 }
            ]"#,
        );
        assert!(audit_page(&flat).is_empty());
    }

    #[test]
    fn test_reports_every_kind() {
        let mut flat = parse(
            r#"[
                { "id": "t", "type": "text", "position": 0 },
                { "id": "x", "type": "image", "parentId": "gone", "position": 0 },
                { "id": "s", "type": "section", "position": 3 },
                { "id": "s", "type": "section", "position": 1 }
            ]"#,
        );
        flat[2].styles = style_map([("padding", "1px"), ("paddingTop", "2px")]);

        let issues = audit_page(&flat);
        assert!(issues.iter().any(|i| matches!(i, AuditIssue::DuplicateId { id } if id == "s")));
        assert!(issues.iter().any(|i| matches!(i, AuditIssue::DanglingParent { id, .. } if id == "x")));
        assert!(issues.iter().any(|i| matches!(i, AuditIssue::InvalidPlacement { id, parent: None, .. } if id == "t")));
        assert!(issues.iter().any(|i| matches!(i, AuditIssue::NonContiguousPositions { parent_id: None, .. })));
        assert!(issues.iter().any(|i| matches!(i, AuditIssue::StyleConflict { viewport: Viewport::Desktop, .. })));
    }
}
