//! Edit session state machine.
//!
//! Tracks the single bookmark, if any, whose fields are open for local editing.
//! Working copies live here until a save succeeds or the edit is cancelled;
//! the store's snapshot is never touched by editing itself.

use serde::Serialize;

use crate::managers::bookmark_store::BookmarkStore;
use crate::types::bookmark::Bookmark;
use crate::types::errors::EditError;

/// Working copy of a bookmark under edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditDraft {
    pub bookmark_id: String,
    pub title: String,
    pub url: String,
}

/// `Idle` or `Editing` exactly one bookmark.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state")]
pub enum EditState {
    #[default]
    Idle,
    Editing(EditDraft),
}

/// Owner of the [`EditState`] plus the last save error.
#[derive(Debug, Default)]
pub struct EditSession {
    state: EditState,
    error: Option<String>,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &EditState {
        &self.state
    }

    pub fn draft(&self) -> Option<&EditDraft> {
        match &self.state {
            EditState::Editing(draft) => Some(draft),
            EditState::Idle => None,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.draft().is_some()
    }

    /// Message of the last failed save, cleared on begin, cancel and the next save.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Opens bookmark `id` for editing, seeding the working copies from `snapshot`.
    ///
    /// An active session for another bookmark is discarded. If `id` is not in
    /// the snapshot the current state is left as it was.
    pub fn begin(&mut self, snapshot: &[Bookmark], id: &str) -> Result<EditDraft, EditError> {
        let bookmark = snapshot
            .iter()
            .find(|b| b.id == id)
            .ok_or_else(|| EditError::UnknownBookmark(id.to_string()))?;

        if let Some(previous) = self.draft() {
            tracing::debug!(previous = %previous.bookmark_id, next = id, "replacing active edit session");
        }

        let draft = EditDraft {
            bookmark_id: bookmark.id.clone(),
            title: bookmark.title.clone(),
            url: bookmark.url.clone(),
        };
        self.error = None;
        self.state = EditState::Editing(draft.clone());
        Ok(draft)
    }

    pub fn set_title(&mut self, title: &str) -> Result<(), EditError> {
        self.draft_mut()?.title = title.to_string();
        Ok(())
    }

    pub fn set_url(&mut self, url: &str) -> Result<(), EditError> {
        self.draft_mut()?.url = url.to_string();
        Ok(())
    }

    /// Back to `Idle`, discarding working copies and any pending error.
    pub fn cancel(&mut self) {
        self.state = EditState::Idle;
        self.error = None;
    }

    /// Writes the working copies through [`BookmarkStore::update`].
    ///
    /// Returns to `Idle` only on success. On failure the session stays open
    /// with its working copies, and the error is kept for display.
    pub fn save(&mut self, store: &BookmarkStore) -> Result<(), EditError> {
        self.error = None;
        let draft = self.draft().cloned().ok_or(EditError::NotEditing)?;

        match store.update(&draft.bookmark_id, &draft.title, &draft.url) {
            Ok(()) => {
                self.cancel();
                Ok(())
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e.into())
            }
        }
    }

    fn draft_mut(&mut self) -> Result<&mut EditDraft, EditError> {
        match &mut self.state {
            EditState::Editing(draft) => Ok(draft),
            EditState::Idle => Err(EditError::NotEditing),
        }
    }
}
