//! # Drag and Drop
//!
//! Turns a stream of pointer callbacks into drag sessions and, on drop, into
//! a single tree command.
//!
//! ```text
//! Idle ──pointer_down──▶ Pending ──activation──▶ Dragging ──pointer_up──▶ Idle
//!                          │                        │          (+ DropAction)
//!                          └──click / scroll──▶ Idle └──cancel──▶ Idle
//! ```
//!
//! Mouse and pen gestures activate after moving `activation_distance`.
//! Touch gestures activate after being held for `touch_delay_ms`; drifting
//! past `touch_tolerance` first is treated as a scroll and abandons the
//! gesture.
//!
//! While dragging, the host reports every droppable region under the pointer.
//! The innermost region yielding a legal placement wins, and regions belonging
//! to the dragged subtree are ignored.

use crate::config::DragConfig;
use pagecraft_core::{ElementId, ElementTree, ElementType, Point};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DragPayload {
    /// Palette item
    #[serde(rename_all = "camelCase")]
    NewElement { element_type: ElementType },

    /// Element already on the page
    #[serde(rename_all = "camelCase")]
    ExistingElement {
        element_id: ElementId,
        #[serde(default)]
        parent_id: Option<ElementId>,
    },
}

impl DragPayload {
    pub fn new_element(element_type: ElementType) -> Self {
        DragPayload::NewElement { element_type }
    }

    pub fn existing(element_id: impl Into<ElementId>, parent_id: Option<ElementId>) -> Self {
        DragPayload::ExistingElement {
            element_id: element_id.into(),
            parent_id,
        }
    }

    /// Type being dragged, looked up in `tree` for existing elements
    fn element_type(&self, tree: &ElementTree) -> Option<ElementType> {
        match self {
            DragPayload::NewElement { element_type } => Some(*element_type),
            DragPayload::ExistingElement { element_id, .. } => {
                tree.get(element_id).map(|el| el.element_type)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerKind {
    #[default]
    Mouse,
    Pen,
    Touch,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointerEvent {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub kind: PointerKind,
    /// Host clock in milliseconds
    #[serde(default)]
    pub timestamp_ms: u64,
}

impl PointerEvent {
    pub fn mouse(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            kind: PointerKind::Mouse,
            timestamp_ms: 0,
        }
    }

    pub fn touch(x: f64, y: f64, timestamp_ms: u64) -> Self {
        Self {
            x,
            y,
            kind: PointerKind::Touch,
            timestamp_ms,
        }
    }

    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }

    pub fn mid_y(&self) -> f64 {
        self.y + self.height / 2.0
    }
}

/// A droppable area reported by the host. `target: None` is the page canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropRegion {
    #[serde(default)]
    pub target: Option<ElementId>,
    pub rect: Rect,
}

impl DropRegion {
    pub fn element(id: impl Into<ElementId>, rect: Rect) -> Self {
        Self {
            target: Some(id.into()),
            rect,
        }
    }

    pub fn canvas(rect: Rect) -> Self {
        Self { target: None, rect }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DropIndicator {
    Inside,
    Before,
    After,
}

/// A legal landing spot under the pointer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DropCandidate {
    /// Hovered region (`None` = canvas)
    pub target: Option<ElementId>,
    pub indicator: DropIndicator,
    /// Where the element will land
    pub parent_id: Option<ElementId>,
    pub position: usize,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum DragState {
    #[default]
    Idle,

    /// Pointer is down, activation not reached yet
    #[serde(rename_all = "camelCase")]
    Pending {
        payload: DragPayload,
        kind: PointerKind,
        origin: Point,
        started_at_ms: u64,
    },

    #[serde(rename_all = "camelCase")]
    Dragging {
        payload: DragPayload,
        pointer: Point,
        candidate: Option<DropCandidate>,
    },
}

/// The tree command a completed drop asks for
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DropAction {
    #[serde(rename_all = "camelCase")]
    Add {
        element_type: ElementType,
        parent_id: Option<ElementId>,
        position: usize,
    },

    #[serde(rename_all = "camelCase")]
    Move {
        element_id: ElementId,
        parent_id: Option<ElementId>,
        position: usize,
    },
}

#[derive(Debug, Clone, Default)]
pub struct DragController {
    state: DragState,
    config: DragConfig,
}

impl DragController {
    pub fn new(config: DragConfig) -> Self {
        Self {
            state: DragState::Idle,
            config,
        }
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    pub fn candidate(&self) -> Option<&DropCandidate> {
        match &self.state {
            DragState::Dragging { candidate, .. } => candidate.as_ref(),
            _ => None,
        }
    }

    /// Start tracking a gesture on a draggable handle. Ignored mid-gesture.
    pub fn pointer_down(&mut self, payload: DragPayload, event: PointerEvent) {
        if !matches!(self.state, DragState::Idle) {
            debug!("Pointer down ignored, gesture already in progress");
            return;
        }
        self.state = DragState::Pending {
            payload,
            kind: event.kind,
            origin: event.point(),
            started_at_ms: event.timestamp_ms,
        };
    }

    /// Activate a pending touch hold whose delay has elapsed without movement
    pub fn tick(&mut self, now_ms: u64) -> bool {
        let activate = match &self.state {
            DragState::Pending {
                kind: PointerKind::Touch,
                started_at_ms,
                ..
            } => now_ms.saturating_sub(*started_at_ms) >= self.config.touch_delay_ms,
            _ => false,
        };
        if activate {
            self.activate(None);
        }
        activate
    }

    /// Track movement; returns the current legal candidate while dragging
    pub fn pointer_move(
        &mut self,
        tree: &ElementTree,
        event: PointerEvent,
        regions: &[DropRegion],
    ) -> Option<&DropCandidate> {
        if let DragState::Pending {
            kind,
            origin,
            started_at_ms,
            ..
        } = self.state
        {
            let moved = origin.distance_to(event.point());
            let activate = match kind {
                PointerKind::Touch => {
                    let held = event.timestamp_ms.saturating_sub(started_at_ms);
                    if held >= self.config.touch_delay_ms {
                        true
                    } else if moved > self.config.touch_tolerance {
                        debug!(moved, "Touch moved before hold delay, treating as scroll");
                        self.state = DragState::Idle;
                        return None;
                    } else {
                        false
                    }
                }
                PointerKind::Mouse | PointerKind::Pen => moved >= self.config.activation_distance,
            };
            if !activate {
                return None;
            }
            self.activate(Some(event.point()));
        }

        let DragState::Dragging {
            payload,
            pointer,
            candidate,
        } = &mut self.state
        else {
            return None;
        };

        *pointer = event.point();
        *candidate = find_candidate(tree, payload, event.point(), regions);
        candidate.as_ref()
    }

    /// Finish the gesture. Returns the command to commit, if the drop landed
    /// on a legal target.
    pub fn pointer_up(
        &mut self,
        tree: &ElementTree,
        event: PointerEvent,
        regions: &[DropRegion],
    ) -> Option<DropAction> {
        match std::mem::take(&mut self.state) {
            DragState::Dragging { payload, .. } => {
                let Some(candidate) = find_candidate(tree, &payload, event.point(), regions) else {
                    debug!("Dropped outside any legal target");
                    return None;
                };
                Some(match payload {
                    DragPayload::NewElement { element_type } => DropAction::Add {
                        element_type,
                        parent_id: candidate.parent_id,
                        position: candidate.position,
                    },
                    DragPayload::ExistingElement { element_id, .. } => DropAction::Move {
                        element_id,
                        parent_id: candidate.parent_id,
                        position: candidate.position,
                    },
                })
            }
            // never activated: a click
            _ => None,
        }
    }

    /// Abandon the gesture at any point without side effects
    pub fn cancel(&mut self) {
        if !matches!(self.state, DragState::Idle) {
            debug!("Drag cancelled");
        }
        self.state = DragState::Idle;
    }

    fn activate(&mut self, pointer: Option<Point>) {
        if let DragState::Pending { payload, origin, .. } = std::mem::take(&mut self.state) {
            debug!(?payload, "Drag activated");
            self.state = DragState::Dragging {
                payload,
                pointer: pointer.unwrap_or(origin),
                candidate: None,
            };
        }
    }
}

/// Innermost legal landing spot among the regions containing `point`
pub fn find_candidate(
    tree: &ElementTree,
    payload: &DragPayload,
    point: Point,
    regions: &[DropRegion],
) -> Option<DropCandidate> {
    let dragged_type = payload.element_type(tree)?;
    let dragged_id = match payload {
        DragPayload::ExistingElement { element_id, .. } => Some(element_id.as_str()),
        DragPayload::NewElement { .. } => None,
    };

    let mut hits: Vec<(usize, &DropRegion)> = regions
        .iter()
        .filter(|region| region.rect.contains(point))
        .filter_map(|region| match region.target.as_deref() {
            None => Some((0, region)),
            Some(id) => {
                if let Some(dragged) = dragged_id {
                    if id == dragged || tree.is_ancestor(dragged, id) {
                        return None;
                    }
                }
                tree.depth(id).map(|depth| (depth + 1, region))
            }
        })
        .collect();

    // deepest first; stable, so host order breaks ties
    hits.sort_by(|a, b| b.0.cmp(&a.0));

    hits.into_iter()
        .find_map(|(_, region)| candidate_for(tree, dragged_type, dragged_id, point, region))
}

fn candidate_for(
    tree: &ElementTree,
    dragged_type: ElementType,
    dragged_id: Option<&str>,
    point: Point,
    region: &DropRegion,
) -> Option<DropCandidate> {
    let target = region.target.as_deref();

    if tree.can_place(dragged_type, target) {
        return Some(DropCandidate {
            target: target.map(str::to_string),
            indicator: DropIndicator::Inside,
            parent_id: target.map(str::to_string),
            position: siblings_without(tree, target, dragged_id).len(),
        });
    }

    // Not a valid parent itself; try landing next to it
    let target = target?;
    let parent_id = tree.get(target)?.parent_id.clone();
    if !tree.can_place(dragged_type, parent_id.as_deref()) {
        return None;
    }

    let siblings = siblings_without(tree, parent_id.as_deref(), dragged_id);
    let index = siblings.iter().position(|id| *id == target)?;
    let (indicator, position) = if point.y < region.rect.mid_y() {
        (DropIndicator::Before, index)
    } else {
        (DropIndicator::After, index + 1)
    };

    Some(DropCandidate {
        target: Some(target.to_string()),
        indicator,
        parent_id,
        position,
    })
}

/// Sibling group with the dragged element already taken out, matching how
/// moves index their destination
fn siblings_without<'a>(tree: &'a ElementTree, parent: Option<&str>, dragged: Option<&str>) -> Vec<&'a str> {
    tree.children_of(parent)
        .iter()
        .map(String::as_str)
        .filter(|id| Some(*id) != dragged)
        .collect()
}
