//! Unit tests for the edit session state machine.

use std::sync::Arc;

use smartbookmarks::database::SqliteTable;
use smartbookmarks::managers::bookmark_store::BookmarkStore;
use smartbookmarks::managers::edit_session::{EditDraft, EditSession, EditState};
use smartbookmarks::types::errors::{EditError, StoreError, ValidationError};

fn store_with(titles: &[(&str, &str)]) -> BookmarkStore {
    let store = BookmarkStore::new(Arc::new(SqliteTable::in_memory().unwrap()));
    store.bind("alice");
    for (title, url) in titles {
        store.add(title, url).unwrap();
    }
    store
}

fn id_of(store: &BookmarkStore, title: &str) -> String {
    store
        .snapshot()
        .iter()
        .find(|b| b.title == title)
        .map(|b| b.id.clone())
        .unwrap()
}

#[test]
fn test_new_session_is_idle() {
    let session = EditSession::new();
    assert_eq!(session.state(), &EditState::Idle);
    assert!(!session.is_editing());
    assert_eq!(session.error(), None);
}

#[test]
fn test_begin_seeds_working_copies_from_snapshot() {
    let store = store_with(&[("Docs", "docs.rs")]);
    let id = id_of(&store, "Docs");
    let mut session = EditSession::new();

    let draft = session.begin(&store.snapshot(), &id).unwrap();

    assert_eq!(
        draft,
        EditDraft {
            bookmark_id: id.clone(),
            title: "Docs".to_string(),
            url: "https://docs.rs/".to_string(),
        }
    );
    assert_eq!(session.draft(), Some(&draft));
}

#[test]
fn test_begin_on_another_bookmark_replaces_session() {
    let store = store_with(&[("One", "one.com"), ("Two", "two.com")]);
    let mut session = EditSession::new();

    session.begin(&store.snapshot(), &id_of(&store, "One")).unwrap();
    session.set_title("One (edited)").unwrap();
    session.begin(&store.snapshot(), &id_of(&store, "Two")).unwrap();

    let draft = session.draft().unwrap();
    assert_eq!(draft.bookmark_id, id_of(&store, "Two"));
    assert_eq!(draft.title, "Two", "edits to the first bookmark are discarded");
}

#[test]
fn test_begin_unknown_id_keeps_current_state() {
    let store = store_with(&[("One", "one.com")]);
    let mut session = EditSession::new();
    session.begin(&store.snapshot(), &id_of(&store, "One")).unwrap();
    let before = session.state().clone();

    let err = session.begin(&store.snapshot(), "missing").unwrap_err();

    assert_eq!(err, EditError::UnknownBookmark("missing".to_string()));
    assert_eq!(session.state(), &before);
}

#[test]
fn test_setters_require_an_active_session() {
    let mut session = EditSession::new();
    assert_eq!(session.set_title("x"), Err(EditError::NotEditing));
    assert_eq!(session.set_url("x"), Err(EditError::NotEditing));
}

#[test]
fn test_cancel_discards_working_copies_without_touching_store() {
    let store = store_with(&[("Keep", "keep.com")]);
    let id = id_of(&store, "Keep");
    let mut session = EditSession::new();
    session.begin(&store.snapshot(), &id).unwrap();
    session.set_title("Changed").unwrap();

    session.cancel();

    assert_eq!(session.state(), &EditState::Idle);
    assert_eq!(store.get(&id).unwrap().title, "Keep");
}

#[test]
fn test_save_writes_through_store_and_returns_to_idle() {
    let store = store_with(&[("Old", "old.com")]);
    let id = id_of(&store, "Old");
    let mut session = EditSession::new();
    session.begin(&store.snapshot(), &id).unwrap();
    session.set_title("New").unwrap();
    session.set_url("new.com/x").unwrap();

    session.save(&store).unwrap();

    assert!(!session.is_editing());
    assert_eq!(session.error(), None);
    let saved = store.get(&id).unwrap();
    assert_eq!(saved.title, "New");
    assert_eq!(saved.url, "https://new.com/x");
}

#[test]
fn test_failed_save_keeps_session_and_records_error() {
    let store = store_with(&[("Site", "site.com")]);
    let id = id_of(&store, "Site");
    let mut session = EditSession::new();
    session.begin(&store.snapshot(), &id).unwrap();
    session.set_title("").unwrap();

    let err = session.save(&store).unwrap_err();

    assert_eq!(
        err,
        EditError::Store(StoreError::Validation(ValidationError::MissingFields))
    );
    assert_eq!(session.error(), Some("All fields are required"));
    let draft = session.draft().unwrap();
    assert_eq!(draft.title, "");
    assert_eq!(draft.url, "https://site.com/");
    assert_eq!(store.get(&id).unwrap().title, "Site");

    session.set_title("Fixed").unwrap();
    session.save(&store).unwrap();
    assert_eq!(session.error(), None);
    assert_eq!(store.get(&id).unwrap().title, "Fixed");
}

#[test]
fn test_save_while_idle_is_rejected() {
    let store = store_with(&[]);
    let mut session = EditSession::new();
    assert_eq!(session.save(&store), Err(EditError::NotEditing));
}

#[test]
fn test_state_serializes_with_tag() {
    let idle = serde_json::to_value(EditState::Idle).unwrap();
    assert_eq!(idle, serde_json::json!({ "state": "Idle" }));

    let editing = serde_json::to_value(EditState::Editing(EditDraft {
        bookmark_id: "b1".to_string(),
        title: "T".to_string(),
        url: "https://t.com/".to_string(),
    }))
    .unwrap();
    assert_eq!(editing["state"], "Editing");
    assert_eq!(editing["bookmark_id"], "b1");
}
