//! Error types for the element tree

use crate::element::{ElementId, ElementType};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TreeError {
    #[error("Cannot place {child} under {}", describe_parent(.parent))]
    InvalidPlacement {
        child: ElementType,
        parent: Option<ElementType>,
    },

    #[error("Parent not found: {0}")]
    ParentNotFound(ElementId),

    #[error("Would create cycle: {node_id} cannot move under {new_parent_id}")]
    CycleDetected {
        node_id: ElementId,
        new_parent_id: ElementId,
    },

    #[error("Id provider produced an id already in use: {0}")]
    DuplicateId(ElementId),
}

/// Display name of a prospective parent; `None` is the page root
pub fn describe_parent(parent: &Option<ElementType>) -> String {
    match parent {
        Some(ty) => ty.to_string(),
        None => "page root".to_string(),
    }
}
