//! Sequences of serialized mutations replayed through a session, checking
//! history symmetry over whole editing runs

use pagecraft_core::{ElementTree, SequentialIds};
use pagecraft_editor::{EditorSession, Mutation, MutationError};

fn session() -> EditorSession {
    EditorSession::new("home").with_ids(SequentialIds::new("el"))
}

const SCRIPT: &str = r#"[
    { "kind": "addElement", "element": { "type": "navbar" } },
    { "kind": "applyPreset", "presetId": "simple-navbar", "parentId": "el-1" },
    { "kind": "addElement", "element": { "type": "hero" } },
    { "kind": "addElement", "element": { "type": "button" }, "parentId": "el-7" },
    { "kind": "addElement", "element": { "type": "text", "content": { "text": "Welcome" } }, "parentId": "el-7", "position": 0 },
    { "kind": "updateStyles", "elementId": "el-9", "viewport": "tablet", "styles": { "fontSize": "18px" } },
    { "kind": "moveElement", "elementId": "el-8", "newParentId": "el-1", "position": 0 },
    { "kind": "updateElement", "elementId": "el-9", "patch": { "content": { "text": "Hello" } } },
    { "kind": "deleteElement", "elementId": "el-3" }
]"#;

#[test]
fn test_script_undo_redo_symmetry() -> anyhow::Result<()> {
    let mutations: Vec<Mutation> = serde_json::from_str(SCRIPT)?;
    let mut session = session();

    let mut snapshots: Vec<ElementTree> = vec![session.tree().clone()];
    for mutation in mutations {
        let result = session.apply(mutation)?;
        assert!(result.changed());
        snapshots.push(session.tree().clone());
    }

    for expected in snapshots.iter().rev().skip(1) {
        assert!(session.undo());
        assert_eq!(session.tree(), expected);
    }
    assert!(!session.can_undo());
    assert!(session.tree().is_empty());

    for expected in snapshots.iter().skip(1) {
        assert!(session.redo());
        assert_eq!(session.tree(), expected);
    }
    assert!(!session.can_redo());

    Ok(())
}

#[test]
fn test_script_end_state() -> anyhow::Result<()> {
    let mutations: Vec<Mutation> = serde_json::from_str(SCRIPT)?;
    let mut session = session();
    for mutation in mutations {
        session.apply(mutation)?;
    }

    let tree = session.tree();
    // the button moved out of the hero into the navbar
    assert_eq!(tree.children_of(Some("el-1"))[0], "el-8");
    assert_eq!(tree.children_of(Some("el-7")), ["el-9"]);
    assert_eq!(tree.get("el-9").unwrap().content["text"], "Hello");
    assert!(!tree.contains("el-3"));

    let json = session.to_json()?;
    let reloaded = ElementTree::from_json("home", &json)?;
    assert_eq!(&reloaded, tree);
    Ok(())
}

#[test]
fn test_rejections_do_not_consume_history() -> anyhow::Result<()> {
    let mut session = session();
    let section: Mutation = serde_json::from_str(r#"{ "kind": "addElement", "element": { "type": "section" } }"#)?;
    session.apply(section)?;
    let container: Mutation = serde_json::from_str(
        r#"{ "kind": "addElement", "element": { "type": "container" }, "parentId": "el-1" }"#,
    )?;
    session.apply(container)?;

    let before = session.tree().clone();
    let cycle: Mutation = serde_json::from_str(
        r#"{ "kind": "moveElement", "elementId": "el-1", "newParentId": "el-2", "position": 0 }"#,
    )?;
    assert!(matches!(session.apply(cycle), Err(MutationError::Tree(_))));

    let root_text: Mutation = serde_json::from_str(r#"{ "kind": "addElement", "element": { "type": "text" } }"#)?;
    assert!(session.apply(root_text).is_err());

    assert_eq!(*session.tree(), before);
    assert!(session.undo());
    assert!(session.undo());
    assert!(!session.undo());
    Ok(())
}
