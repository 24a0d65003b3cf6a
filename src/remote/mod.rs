//! Boundary to the remote `bookmarks` table and its change feed.
//!
//! [`RemoteTable`] is the CRUD surface, [`ChangeFeed`] the realtime surface.
//! Backends:
//! - [`crate::database::SqliteTable`]: embedded table, also used by tests
//! - [`rest::RestTable`]: PostgREST / Supabase REST endpoint
//!
//! [`change_hub::ChangeHub`] is an in-process feed; [`notifying::NotifyingTable`]
//! wires any table to it so local writes emit notifications.

use std::sync::mpsc::Receiver;
use std::sync::Arc;

use crate::types::bookmark::{Bookmark, BookmarkPatch, NewBookmark};
use crate::types::change::{ChangeEvent, ChangeFilter};
use crate::types::errors::RemoteError;

pub mod change_hub;
pub mod notifying;
pub mod rest;

pub use change_hub::ChangeHub;
pub use notifying::NotifyingTable;
pub use rest::RestTable;

/// Row operations on the remote `bookmarks` table.
///
/// Every write is scoped by owner as well as row id, so a row owned by another
/// user is never touched (it simply counts as zero affected rows).
pub trait RemoteTable: Send + Sync {
    /// All rows owned by `user_id`, newest `created_at` first.
    fn select_by_owner(&self, user_id: &str) -> Result<Vec<Bookmark>, RemoteError>;
    /// Inserts a row and returns it with the server-assigned fields filled in.
    fn insert(&self, row: &NewBookmark) -> Result<Bookmark, RemoteError>;
    /// Updates title/url of row `id`. Returns the number of affected rows.
    fn update(&self, user_id: &str, id: &str, patch: &BookmarkPatch) -> Result<usize, RemoteError>;
    /// Deletes row `id`. Returns the number of affected rows.
    fn delete(&self, user_id: &str, id: &str) -> Result<usize, RemoteError>;
}

impl<T: RemoteTable + ?Sized> RemoteTable for Arc<T> {
    fn select_by_owner(&self, user_id: &str) -> Result<Vec<Bookmark>, RemoteError> {
        (**self).select_by_owner(user_id)
    }

    fn insert(&self, row: &NewBookmark) -> Result<Bookmark, RemoteError> {
        (**self).insert(row)
    }

    fn update(&self, user_id: &str, id: &str, patch: &BookmarkPatch) -> Result<usize, RemoteError> {
        (**self).update(user_id, id, patch)
    }

    fn delete(&self, user_id: &str, id: &str) -> Result<usize, RemoteError> {
        (**self).delete(user_id, id)
    }
}

/// An open change-feed subscription.
///
/// `events` disconnects once the feed drops the subscription.
pub struct Subscription {
    pub id: u64,
    pub events: Receiver<ChangeEvent>,
}

/// Source of realtime row-change notifications.
pub trait ChangeFeed: Send + Sync {
    fn subscribe(&self, filter: ChangeFilter) -> Result<Subscription, RemoteError>;
    /// Removes subscription `id`. Unknown ids are ignored.
    fn unsubscribe(&self, id: u64);
}
