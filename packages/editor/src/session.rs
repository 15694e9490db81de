//! # Editor Session
//!
//! What the canvas, sidebar and toolbar talk to: the current tree, the
//! selection, the mutation entry points, undo/redo, keyboard shortcuts and
//! the drag controller.
//!
//! Every committed mutation is applied to a clone of the present tree and
//! pushed as one history step. Rejected or no-op mutations leave both the
//! tree and the history alone.

use crate::config::EditorConfig;
use crate::dnd::{DragController, DragPayload, DragState, DropAction, DropCandidate, DropRegion, PointerEvent};
use crate::errors::EditorError;
use crate::history::History;
use crate::keyboard::{shortcut_for, KeyEvent, Shortcut};
use crate::mutations::{Mutation, MutationError, MutationResult};
use pagecraft_core::styles::resolve_styles;
use pagecraft_core::{
    Element, ElementId, ElementPatch, ElementTree, IdProvider, NewElement, Point, StyleMap,
    UuidIds, Viewport,
};
use tracing::{debug, info, instrument};

pub struct EditorSession {
    history: History<ElementTree>,

    /// At most one selected element, always present in the tree
    selected: Option<ElementId>,

    /// Viewport the canvas is showing; style edits without an explicit
    /// viewport land here
    viewport: Viewport,

    drag: DragController,
    ids: Box<dyn IdProvider>,
    config: EditorConfig,
}

impl EditorSession {
    /// Empty page with default configuration and UUID ids
    pub fn new(page_id: impl Into<String>) -> Self {
        Self::with_config(ElementTree::new(page_id), EditorConfig::default())
    }

    pub fn with_config(tree: ElementTree, config: EditorConfig) -> Self {
        Self {
            history: History::with_max_levels(tree, config.history_limit),
            selected: None,
            viewport: config.default_viewport,
            drag: DragController::new(config.drag),
            ids: Box::new(UuidIds),
            config,
        }
    }

    /// Open a persisted page
    pub fn load(page_id: impl Into<String>, flat: Vec<Element>, config: EditorConfig) -> Self {
        Self::with_config(ElementTree::from_flat(page_id, flat), config)
    }

    /// Swap the id provider (deterministic ids in tests, for instance)
    pub fn with_ids(mut self, ids: impl IdProvider + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn tree(&self) -> &ElementTree {
        self.history.present()
    }

    pub fn page_id(&self) -> &str {
        self.tree().page_id()
    }

    /// Replace the page being edited. History, selection and any gesture
    /// in flight are dropped.
    pub fn switch_page(&mut self, page_id: impl Into<String>, flat: Vec<Element>) {
        let tree = ElementTree::from_flat(page_id, flat);
        info!(page_id = %tree.page_id(), elements = tree.len(), "Switched page");
        self.history.reset(tree);
        self.selected = None;
        self.drag.cancel();
    }

    pub fn selection(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn selected_element(&self) -> Option<&Element> {
        self.selected.as_deref().and_then(|id| self.tree().get(id))
    }

    /// Select an element, or clear with `None`. Unknown ids clear the
    /// selection and return false.
    pub fn select(&mut self, id: Option<&str>) -> bool {
        match id {
            Some(id) if self.tree().contains(id) => {
                self.selected = Some(id.to_string());
                true
            }
            Some(id) => {
                debug!(element_id = %id, "Selection of unknown element cleared");
                self.selected = None;
                false
            }
            None => {
                self.selected = None;
                true
            }
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Commit a mutation as one history step
    #[instrument(skip_all)]
    pub fn apply(&mut self, mutation: Mutation) -> Result<MutationResult, MutationError> {
        let mut next = self.history.present().clone();

        let result = match mutation.apply(&mut next, self.ids.as_mut()) {
            Ok(result) => result,
            Err(err) => {
                debug!(%err, ?mutation, "Rejected mutation");
                return Err(err);
            }
        };

        if result.changed() {
            self.history.set(next);
            self.sync_selection();
        }
        Ok(result)
    }

    /// Add an element and select it. `None` when the placement is illegal.
    pub fn add_element(
        &mut self,
        element: NewElement,
        parent_id: Option<&str>,
        position: Option<usize>,
    ) -> Option<ElementId> {
        let mutation = Mutation::AddElement {
            element,
            parent_id: parent_id.map(str::to_string),
            position,
        };
        let id = self.apply(mutation).ok()?.created().first()?.clone();
        self.selected = Some(id.clone());
        Some(id)
    }

    pub fn update_element(&mut self, id: &str, patch: ElementPatch) -> bool {
        self.commit(Mutation::UpdateElement {
            element_id: id.to_string(),
            patch,
        })
    }

    /// Merge `styles` into the given viewport's layer (`None` = current viewport)
    pub fn update_styles(&mut self, id: &str, viewport: Option<Viewport>, styles: StyleMap) -> bool {
        self.commit(Mutation::UpdateStyles {
            element_id: id.to_string(),
            viewport: viewport.unwrap_or(self.viewport),
            styles,
        })
    }

    /// Delete an element with its subtree
    pub fn delete_element(&mut self, id: &str) -> bool {
        self.commit(Mutation::delete(id))
    }

    pub fn delete_selection(&mut self) -> bool {
        match self.selected.clone() {
            Some(id) => self.delete_element(&id),
            None => false,
        }
    }

    pub fn move_element(&mut self, id: &str, new_parent_id: Option<&str>, position: usize) -> bool {
        self.commit(Mutation::MoveElement {
            element_id: id.to_string(),
            new_parent_id: new_parent_id.map(str::to_string),
            position,
        })
    }

    /// Expand a preset under `parent_id` as a single undo step
    pub fn apply_preset(&mut self, preset_id: &str, parent_id: &str) -> Option<Vec<ElementId>> {
        let result = self
            .apply(Mutation::ApplyPreset {
                preset_id: preset_id.to_string(),
                parent_id: parent_id.to_string(),
            })
            .ok()?;
        Some(result.created().to_vec())
    }

    pub fn undo(&mut self) -> bool {
        let undone = self.history.undo();
        if undone {
            self.sync_selection();
        }
        undone
    }

    pub fn redo(&mut self) -> bool {
        let redone = self.history.redo();
        if redone {
            self.sync_selection();
        }
        redone
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Run the shortcut bound to `event`. Returns true when the event was
    /// consumed and the host should prevent its default action.
    pub fn handle_key(&mut self, event: &KeyEvent) -> bool {
        match shortcut_for(event) {
            Some(Shortcut::Undo) => {
                self.undo();
                true
            }
            Some(Shortcut::Redo) => {
                self.redo();
                true
            }
            Some(Shortcut::DeleteSelection) => self.delete_selection(),
            None => false,
        }
    }

    pub fn drag_state(&self) -> &DragState {
        self.drag.state()
    }

    pub fn pointer_down(&mut self, payload: DragPayload, event: PointerEvent) {
        self.drag.pointer_down(payload, event);
    }

    /// Activate a touch hold once its delay has passed
    pub fn tick(&mut self, now_ms: u64) -> bool {
        self.drag.tick(now_ms)
    }

    pub fn pointer_move(&mut self, event: PointerEvent, regions: &[DropRegion]) -> Option<DropCandidate> {
        let tree = self.history.present();
        self.drag.pointer_move(tree, event, regions).cloned()
    }

    /// End the gesture and commit the drop, if any. New elements are
    /// selected once placed.
    #[instrument(skip_all)]
    pub fn pointer_up(&mut self, event: PointerEvent, regions: &[DropRegion]) -> Option<MutationResult> {
        let action = self.drag.pointer_up(self.history.present(), event, regions)?;
        debug!(?action, "Committing drop");

        match action {
            DropAction::Add {
                element_type,
                parent_id,
                position,
            } => {
                let id = self.add_element(NewElement::of(element_type), parent_id.as_deref(), Some(position))?;
                Some(MutationResult::Created { ids: vec![id] })
            }
            DropAction::Move {
                element_id,
                parent_id,
                position,
            } => self
                .apply(Mutation::MoveElement {
                    element_id,
                    new_parent_id: parent_id,
                    position,
                })
                .ok(),
        }
    }

    pub fn cancel_drag(&mut self) {
        self.drag.cancel();
    }

    /// Effective, normalized styles of an element at `viewport`
    pub fn resolved_styles(&self, id: &str, viewport: Viewport) -> Option<StyleMap> {
        self.tree().get(id).map(|el| resolve_styles(el, viewport))
    }

    pub fn snap_point(&self, point: Point) -> Point {
        self.config.grid.snap_point(point)
    }

    /// Persisted shape for saving
    pub fn flatten(&self) -> Vec<Element> {
        self.tree().flatten()
    }

    pub fn to_json(&self) -> Result<String, EditorError> {
        Ok(self.tree().to_json()?)
    }

    fn commit(&mut self, mutation: Mutation) -> bool {
        self.apply(mutation)
            .map(|result| result.changed())
            .unwrap_or(false)
    }

    fn sync_selection(&mut self) {
        if let Some(id) = &self.selected {
            if !self.tree().contains(id) {
                debug!(element_id = %id, "Selected element no longer exists");
                self.selected = None;
            }
        }
    }
}
