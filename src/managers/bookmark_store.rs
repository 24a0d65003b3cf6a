//! Bookmark Store for SmartBookmarks.
//!
//! Owns the local snapshot of the signed-in user's bookmarks and performs
//! CRUD against a [`RemoteTable`]. Mutations never patch the snapshot
//! directly; it only changes through [`BookmarkStore::refresh`], which
//! replaces it wholesale with what the remote store returns.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::remote::RemoteTable;
use crate::services::url_normalizer;
use crate::types::bookmark::{Bookmark, BookmarkPatch, NewBookmark};
use crate::types::errors::{StoreError, ValidationError};

/// Immutable, newest-first list of bookmarks. Cheap to clone.
pub type Snapshot = Arc<Vec<Bookmark>>;

struct StoreState {
    owner: Option<String>,
    /// Bumped on every bind/unbind so refreshes started for a previous owner
    /// can be recognised and dropped.
    generation: u64,
    /// Ticket of the fetch that produced `bookmarks`.
    installed_ticket: u64,
    bookmarks: Snapshot,
}

/// Local mirror of one user's bookmarks.
pub struct BookmarkStore {
    remote: Arc<dyn RemoteTable>,
    state: RwLock<StoreState>,
    busy: AtomicBool,
    next_ticket: AtomicU64,
}

/// Clears the busy flag when a mutation finishes, whatever its outcome.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Checks that both fields are present and normalizes the URL.
///
/// Returns the title unchanged and the canonical URL.
pub fn validate_input(title: &str, raw_url: &str) -> Result<(String, String), ValidationError> {
    if title.is_empty() || raw_url.is_empty() {
        return Err(ValidationError::MissingFields);
    }
    let url = url_normalizer::normalize(raw_url)?;
    Ok((title.to_string(), url))
}

impl BookmarkStore {
    /// Creates an unbound store with an empty snapshot.
    pub fn new(remote: Arc<dyn RemoteTable>) -> Self {
        Self {
            remote,
            state: RwLock::new(StoreState {
                owner: None,
                generation: 0,
                installed_ticket: 0,
                bookmarks: Arc::new(Vec::new()),
            }),
            busy: AtomicBool::new(false),
            next_ticket: AtomicU64::new(1),
        }
    }

    /// Scopes the store to `user_id` and empties the snapshot.
    pub fn bind(&self, user_id: &str) {
        let mut state = self.state.write();
        state.owner = Some(user_id.to_string());
        state.generation += 1;
        state.bookmarks = Arc::new(Vec::new());
    }

    /// Drops the owner scope and empties the snapshot.
    pub fn unbind(&self) {
        let mut state = self.state.write();
        state.owner = None;
        state.generation += 1;
        state.bookmarks = Arc::new(Vec::new());
    }

    /// The user the store is currently scoped to.
    pub fn owner(&self) -> Option<String> {
        self.state.read().owner.clone()
    }

    /// The current snapshot. Later refreshes never mutate a returned snapshot.
    pub fn snapshot(&self) -> Snapshot {
        self.state.read().bookmarks.clone()
    }

    /// Looks up a bookmark in the current snapshot.
    pub fn get(&self, id: &str) -> Option<Bookmark> {
        self.state.read().bookmarks.iter().find(|b| b.id == id).cloned()
    }

    /// Whether a user-initiated mutation is in flight.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Re-fetches the owner's rows and replaces the snapshot in one step.
    ///
    /// Not gated by the busy flag. On failure the previous snapshot stays in
    /// place. The result is discarded if the store was rebound while the fetch
    /// was running, or if a fetch started later has already been installed.
    pub fn refresh(&self) -> Result<(), StoreError> {
        let (owner, generation) = {
            let state = self.state.read();
            (state.owner.clone().ok_or(StoreError::NotBound)?, state.generation)
        };
        let ticket = self.next_ticket.fetch_add(1, Ordering::AcqRel);

        let rows = self.remote.select_by_owner(&owner).map_err(|e| {
            tracing::warn!(user_id = %owner, error = %e, "refresh failed, keeping previous snapshot");
            e
        })?;
        let bookmarks = ingest(&owner, rows);

        let mut state = self.state.write();
        if state.generation != generation {
            tracing::debug!(user_id = %owner, "discarding refresh for a previous session");
            return Ok(());
        }
        if ticket <= state.installed_ticket {
            tracing::debug!(user_id = %owner, ticket, "discarding refresh overtaken by a newer fetch");
            return Ok(());
        }
        tracing::debug!(user_id = %owner, count = bookmarks.len(), "snapshot replaced");
        state.installed_ticket = ticket;
        state.bookmarks = Arc::new(bookmarks);
        Ok(())
    }

    /// Inserts a bookmark for the bound user, then refreshes.
    ///
    /// # Errors
    /// - [`StoreError::Validation`] for an empty field or unparsable URL (no remote call)
    /// - [`StoreError::NotBound`] before sign-in
    /// - [`StoreError::Busy`] while another mutation is in flight
    /// - [`StoreError::Remote`] if the insert is rejected
    pub fn add(&self, title: &str, raw_url: &str) -> Result<(), StoreError> {
        let (title, url) = validate_input(title, raw_url)?;
        let owner = self.owner().ok_or(StoreError::NotBound)?;

        {
            let _guard = self.acquire()?;
            let created = self.remote.insert(&NewBookmark {
                title,
                url,
                user_id: owner,
            })?;
            tracing::info!(id = %created.id, url = %created.url, "bookmark added");
        }

        self.refresh_after_write();
        Ok(())
    }

    /// Replaces title and url of bookmark `id`, then refreshes.
    ///
    /// Same validation and errors as [`BookmarkStore::add`].
    pub fn update(&self, id: &str, title: &str, raw_url: &str) -> Result<(), StoreError> {
        let (title, url) = validate_input(title, raw_url)?;
        let owner = self.owner().ok_or(StoreError::NotBound)?;

        {
            let _guard = self.acquire()?;
            let affected = self.remote.update(&owner, id, &BookmarkPatch { title, url })?;
            tracing::info!(id, affected, "bookmark updated");
        }

        self.refresh_after_write();
        Ok(())
    }

    /// Deletes bookmark `id`, then refreshes. Unknown ids are not an error.
    pub fn delete(&self, id: &str) -> Result<(), StoreError> {
        let owner = self.owner().ok_or(StoreError::NotBound)?;

        {
            let _guard = self.acquire()?;
            let affected = self.remote.delete(&owner, id)?;
            tracing::info!(id, affected, "bookmark deleted");
        }

        self.refresh_after_write();
        Ok(())
    }

    fn acquire(&self) -> Result<BusyGuard<'_>, StoreError> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| StoreError::Busy)?;
        Ok(BusyGuard(&self.busy))
    }

    /// The write already succeeded; a failed refresh is left for the next notification.
    fn refresh_after_write(&self) {
        if let Err(e) = self.refresh() {
            tracing::warn!(error = %e, "refresh after write failed");
        }
    }
}

/// Drops rows that belong to someone else and orders the rest newest first.
fn ingest(owner: &str, rows: Vec<Bookmark>) -> Vec<Bookmark> {
    let total = rows.len();
    let mut bookmarks: Vec<Bookmark> = rows.into_iter().filter(|b| b.user_id == owner).collect();
    if bookmarks.len() != total {
        tracing::warn!(
            user_id = %owner,
            dropped = total - bookmarks.len(),
            "ignoring rows owned by another user"
        );
    }
    // Stable: rows with equal timestamps keep the order the remote returned.
    bookmarks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    bookmarks
}
