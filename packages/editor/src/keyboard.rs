//! Global editor shortcuts

use serde::{Deserialize, Serialize};

/// The parts of a DOM `KeyboardEvent` the editor looks at
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyEvent {
    pub key: String,
    #[serde(default)]
    pub ctrl_key: bool,
    #[serde(default)]
    pub meta_key: bool,
    #[serde(default)]
    pub shift_key: bool,
    #[serde(default)]
    pub alt_key: bool,
    /// Focus is inside an input, textarea or contenteditable
    #[serde(default)]
    pub in_text_input: bool,
}

impl KeyEvent {
    pub fn key(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    pub fn ctrl(mut self) -> Self {
        self.ctrl_key = true;
        self
    }

    pub fn meta(mut self) -> Self {
        self.meta_key = true;
        self
    }

    pub fn shift(mut self) -> Self {
        self.shift_key = true;
        self
    }

    pub fn in_text_input(mut self) -> Self {
        self.in_text_input = true;
        self
    }

    /// Ctrl on Windows/Linux, Cmd on macOS
    fn platform_modifier(&self) -> bool {
        self.ctrl_key || self.meta_key
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Shortcut {
    Undo,
    Redo,
    DeleteSelection,
}

/// Map a key press to an editor shortcut. Nothing fires while typing.
pub fn shortcut_for(event: &KeyEvent) -> Option<Shortcut> {
    if event.in_text_input || event.alt_key {
        return None;
    }

    let key = event.key.to_ascii_lowercase();
    if event.platform_modifier() {
        return match (key.as_str(), event.shift_key) {
            ("z", false) => Some(Shortcut::Undo),
            ("z", true) | ("y", _) => Some(Shortcut::Redo),
            _ => None,
        };
    }

    match event.key.as_str() {
        "Delete" | "Backspace" => Some(Shortcut::DeleteSelection),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undo_redo_bindings() {
        assert_eq!(shortcut_for(&KeyEvent::key("z").ctrl()), Some(Shortcut::Undo));
        assert_eq!(shortcut_for(&KeyEvent::key("z").meta()), Some(Shortcut::Undo));
        assert_eq!(shortcut_for(&KeyEvent::key("Z").meta().shift()), Some(Shortcut::Redo));
        assert_eq!(shortcut_for(&KeyEvent::key("y").ctrl()), Some(Shortcut::Redo));
        assert_eq!(shortcut_for(&KeyEvent::key("z")), None);
    }

    #[test]
    fn test_delete_bindings() {
        assert_eq!(shortcut_for(&KeyEvent::key("Delete")), Some(Shortcut::DeleteSelection));
        assert_eq!(shortcut_for(&KeyEvent::key("Backspace")), Some(Shortcut::DeleteSelection));
        assert_eq!(shortcut_for(&KeyEvent::key("Backspace").ctrl()), None);
    }

    #[test]
    fn test_suppressed_in_text_input() {
        assert_eq!(shortcut_for(&KeyEvent::key("z").ctrl().in_text_input()), None);
        assert_eq!(shortcut_for(&KeyEvent::key("Backspace").in_text_input()), None);
    }

    #[test]
    fn test_deserialize_dom_event() {
        let event: KeyEvent = serde_json::from_str(r#"{ "key": "z", "metaKey": true }"#).unwrap();
        assert_eq!(shortcut_for(&event), Some(Shortcut::Undo));
    }
}
