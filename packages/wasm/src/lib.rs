//! Browser bindings for the Pagecraft editor. Structured values cross the
//! boundary as JSON strings.

use pagecraft_core::{navbar_presets, Element, ElementPatch, NewElement, Point, StyleMap, Viewport};
use pagecraft_editor::{DragPayload, DropRegion, EditorConfig, EditorSession, KeyEvent, Mutation, PointerEvent};
use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

fn js_error(context: &str, err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&format!("{}: {}", context, err))
}

fn from_json<T: DeserializeOwned>(json: &str, what: &str) -> Result<T, JsValue> {
    serde_json::from_str(json).map_err(|e| js_error(&format!("Invalid {}", what), e))
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| js_error("Serialization error", e))
}

fn parse_viewport(viewport: &str) -> Result<Viewport, JsValue> {
    viewport.parse().map_err(|e| js_error("Invalid viewport", e))
}

#[wasm_bindgen]
pub struct Editor {
    session: EditorSession,
}

#[wasm_bindgen]
impl Editor {
    /// `config_json` follows the `pagecraft.config.json` format
    #[wasm_bindgen(constructor)]
    pub fn new(page_id: &str, config_json: Option<String>) -> Result<Editor, JsValue> {
        let config = match config_json {
            Some(json) => EditorConfig::from_json(&json).map_err(|e| js_error("Invalid config", e))?,
            None => EditorConfig::default(),
        };
        Ok(Editor {
            session: EditorSession::with_config(pagecraft_core::ElementTree::new(page_id), config),
        })
    }

    /// Replace the page with a flat element list; clears history and selection
    #[wasm_bindgen(js_name = loadPage)]
    pub fn load_page(&mut self, page_id: &str, elements_json: &str) -> Result<(), JsValue> {
        let flat: Vec<Element> = from_json(elements_json, "elements")?;
        self.session.switch_page(page_id, flat);
        Ok(())
    }

    /// Nested view of the page
    pub fn tree(&self) -> Result<String, JsValue> {
        to_json(&self.session.tree().nodes())
    }

    /// Flat, pre-order element list ready to persist
    pub fn flatten(&self) -> Result<String, JsValue> {
        to_json(&self.session.flatten())
    }

    pub fn selection(&self) -> Option<String> {
        self.session.selection().map(str::to_string)
    }

    pub fn select(&mut self, id: Option<String>) -> bool {
        self.session.select(id.as_deref())
    }

    #[wasm_bindgen(js_name = setViewport)]
    pub fn set_viewport(&mut self, viewport: &str) -> Result<(), JsValue> {
        self.session.set_viewport(parse_viewport(viewport)?);
        Ok(())
    }

    pub fn viewport(&self) -> String {
        self.session.viewport().to_string()
    }

    /// Returns the new element's id, or `undefined` when the placement is
    /// not allowed
    #[wasm_bindgen(js_name = addElement)]
    pub fn add_element(
        &mut self,
        element_json: &str,
        parent_id: Option<String>,
        position: Option<u32>,
    ) -> Result<Option<String>, JsValue> {
        let element: NewElement = from_json(element_json, "element")?;
        Ok(self
            .session
            .add_element(element, parent_id.as_deref(), position.map(|p| p as usize)))
    }

    #[wasm_bindgen(js_name = updateElement)]
    pub fn update_element(&mut self, id: &str, patch_json: &str) -> Result<bool, JsValue> {
        let patch: ElementPatch = from_json(patch_json, "patch")?;
        Ok(self.session.update_element(id, patch))
    }

    /// Merge styles into `viewport` (the current viewport when omitted)
    #[wasm_bindgen(js_name = updateStyles)]
    pub fn update_styles(
        &mut self,
        id: &str,
        viewport: Option<String>,
        styles_json: &str,
    ) -> Result<bool, JsValue> {
        let viewport = viewport.as_deref().map(parse_viewport).transpose()?;
        let styles: StyleMap = from_json(styles_json, "styles")?;
        Ok(self.session.update_styles(id, viewport, styles))
    }

    #[wasm_bindgen(js_name = deleteElement)]
    pub fn delete_element(&mut self, id: &str) -> bool {
        self.session.delete_element(id)
    }

    #[wasm_bindgen(js_name = moveElement)]
    pub fn move_element(&mut self, id: &str, parent_id: Option<String>, position: u32) -> bool {
        self.session
            .move_element(id, parent_id.as_deref(), position as usize)
    }

    /// Available navbar presets
    pub fn presets(&self) -> Result<String, JsValue> {
        to_json(&navbar_presets())
    }

    /// Ids of the created top-level elements, or `undefined` if rejected
    #[wasm_bindgen(js_name = applyPreset)]
    pub fn apply_preset(&mut self, preset_id: &str, parent_id: &str) -> Result<Option<String>, JsValue> {
        self.session
            .apply_preset(preset_id, parent_id)
            .map(|ids| to_json(&ids))
            .transpose()
    }

    /// Apply a serialized mutation. Rejections are errors here so scripted
    /// callers can tell them apart from no-ops.
    pub fn apply(&mut self, mutation_json: &str) -> Result<String, JsValue> {
        let mutation: Mutation = from_json(mutation_json, "mutation")?;
        let result = self
            .session
            .apply(mutation)
            .map_err(|e| js_error("Rejected", e))?;
        to_json(&result)
    }

    pub fn undo(&mut self) -> bool {
        self.session.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.session.redo()
    }

    #[wasm_bindgen(js_name = canUndo)]
    pub fn can_undo(&self) -> bool {
        self.session.can_undo()
    }

    #[wasm_bindgen(js_name = canRedo)]
    pub fn can_redo(&self) -> bool {
        self.session.can_redo()
    }

    /// Returns true when the host should `preventDefault()`
    #[wasm_bindgen(js_name = handleKey)]
    pub fn handle_key(&mut self, event_json: &str) -> Result<bool, JsValue> {
        let event: KeyEvent = from_json(event_json, "key event")?;
        Ok(self.session.handle_key(&event))
    }

    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&mut self, payload_json: &str, event_json: &str) -> Result<(), JsValue> {
        let payload: DragPayload = from_json(payload_json, "drag payload")?;
        let event: PointerEvent = from_json(event_json, "pointer event")?;
        self.session.pointer_down(payload, event);
        Ok(())
    }

    /// Current drop candidate as JSON, `undefined` when nothing legal is
    /// under the pointer
    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, event_json: &str, regions_json: &str) -> Result<Option<String>, JsValue> {
        let event: PointerEvent = from_json(event_json, "pointer event")?;
        let regions: Vec<DropRegion> = from_json(regions_json, "drop regions")?;
        self.session
            .pointer_move(event, &regions)
            .map(|candidate| to_json(&candidate))
            .transpose()
    }

    /// Mutation result of the drop, `undefined` when nothing was committed
    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&mut self, event_json: &str, regions_json: &str) -> Result<Option<String>, JsValue> {
        let event: PointerEvent = from_json(event_json, "pointer event")?;
        let regions: Vec<DropRegion> = from_json(regions_json, "drop regions")?;
        self.session
            .pointer_up(event, &regions)
            .map(|result| to_json(&result))
            .transpose()
    }

    /// Drive touch-hold activation from a host timer
    pub fn tick(&mut self, now_ms: f64) -> bool {
        self.session.tick(now_ms.max(0.0) as u64)
    }

    #[wasm_bindgen(js_name = cancelDrag)]
    pub fn cancel_drag(&mut self) {
        self.session.cancel_drag();
    }

    #[wasm_bindgen(js_name = dragState)]
    pub fn drag_state(&self) -> Result<String, JsValue> {
        to_json(self.session.drag_state())
    }

    /// Effective styles of an element at `viewport`
    #[wasm_bindgen(js_name = resolvedStyles)]
    pub fn resolved_styles(&self, id: &str, viewport: &str) -> Result<Option<String>, JsValue> {
        let viewport = parse_viewport(viewport)?;
        self.session
            .resolved_styles(id, viewport)
            .map(|styles| to_json(&styles))
            .transpose()
    }

    /// Snap a canvas point to the configured grid, as `[x, y]`
    #[wasm_bindgen(js_name = snapPoint)]
    pub fn snap_point(&self, x: f64, y: f64) -> Vec<f64> {
        let point = self.session.snap_point(Point::new(x, y));
        vec![point.x, point.y]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_drop_through_json() {
        let mut editor = Editor::new("home", None).unwrap();

        editor
            .pointer_down(r#"{ "kind": "newElement", "elementType": "section" }"#, r#"{ "x": 0, "y": 0 }"#)
            .unwrap();
        let regions = r#"[{ "target": null, "rect": { "x": 0, "y": 0, "width": 800, "height": 600 } }]"#;
        let candidate = editor.pointer_move(r#"{ "x": 50, "y": 50 }"#, regions).unwrap();
        assert!(candidate.unwrap().contains("\"indicator\":\"inside\""));

        let result = editor.pointer_up(r#"{ "x": 50, "y": 50 }"#, regions).unwrap();
        assert!(result.unwrap().contains("created"));
        assert!(editor.can_undo());

        let flat: Vec<Element> = serde_json::from_str(&editor.flatten().unwrap()).unwrap();
        assert_eq!(flat.len(), 1);
        assert_eq!(editor.selection(), Some(flat[0].id.clone()));

        assert!(editor.handle_key(r#"{ "key": "z", "ctrlKey": true }"#).unwrap());
        assert_eq!(editor.flatten().unwrap(), "[]");
    }

    #[test]
    fn test_illegal_add_returns_none() {
        let mut editor = Editor::new("home", None).unwrap();
        let id = editor.add_element(r#"{ "type": "text" }"#, None, None).unwrap();
        assert_eq!(id, None);
        assert!(!editor.can_undo());
    }

    #[test]
    fn test_load_and_resolve_styles() {
        let mut editor = Editor::new("home", Some(r#"{ "historyLimit": 5 }"#.to_string())).unwrap();
        editor
            .load_page(
                "about",
                r#"[{
                    "id": "s",
                    "type": "section",
                    "position": 0,
                    "styles": { "padding": "8px" },
                    "responsiveStyles": { "mobile": { "paddingTop": "0" } }
                }]"#,
            )
            .unwrap();

        let styles: StyleMap = serde_json::from_str(&editor.resolved_styles("s", "mobile").unwrap().unwrap()).unwrap();
        assert_eq!(styles["paddingTop"], "0");
        assert_eq!(styles["paddingLeft"], "8px");
        assert!(editor.resolved_styles("missing", "desktop").unwrap().is_none());
    }

    #[test]
    fn test_tree_view_nests_children() {
        let mut editor = Editor::new("home", None).unwrap();
        let section = editor.add_element(r#"{ "type": "section" }"#, None, None).unwrap().unwrap();
        editor
            .add_element(r#"{ "type": "button" }"#, Some(section.clone()), Some(0))
            .unwrap()
            .unwrap();

        let nodes: serde_json::Value = serde_json::from_str(&editor.tree().unwrap()).unwrap();
        assert_eq!(nodes[0]["id"], section.as_str());
        assert_eq!(nodes[0]["children"][0]["type"], "button");
    }
}
