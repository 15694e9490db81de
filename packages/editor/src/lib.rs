//! # Pagecraft Editor
//!
//! Editing engine for a Pagecraft page: history, drag-and-drop and the
//! session facade the UI talks to.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ core: ElementTree, hierarchy, styles        │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: EditorSession                       │
//! │  - Mutations applied to a cloned snapshot   │
//! │  - One history step per committed mutation  │
//! │  - Drag gestures resolved to drop commands  │
//! │  - Keyboard shortcuts                       │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ wasm: JSON facade for the browser canvas    │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **The tree is the source of truth**: nested views and resolved styles
//!    are derived from it
//! 2. **Illegal edits are no-ops**: a rejected placement leaves the tree and
//!    history as they were
//! 3. **Snapshots, not inverses**: undo restores a previous tree value
//!
//! ## Usage
//!
//! ```rust
//! use pagecraft_core::{ElementType, NewElement};
//! use pagecraft_editor::{EditorSession, KeyEvent};
//!
//! let mut session = EditorSession::new("home");
//! let section = session
//!     .add_element(NewElement::of(ElementType::Section), None, None)
//!     .unwrap();
//! assert_eq!(session.selection(), Some(section.as_str()));
//!
//! session.handle_key(&KeyEvent::key("z").ctrl());
//! assert!(session.tree().is_empty());
//! ```

mod config;
mod dnd;
mod errors;
mod history;
mod keyboard;
mod mutations;
mod session;

pub use config::{DragConfig, EditorConfig, DEFAULT_CONFIG_NAME};
pub use dnd::{
    find_candidate, DragController, DragPayload, DragState, DropAction, DropCandidate, DropIndicator,
    DropRegion, PointerEvent, PointerKind, Rect,
};
pub use errors::EditorError;
pub use history::History;
pub use keyboard::{shortcut_for, KeyEvent, Shortcut};
pub use mutations::{Mutation, MutationError, MutationResult};
pub use session::EditorSession;
