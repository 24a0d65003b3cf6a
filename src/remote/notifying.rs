//! Decorator that turns successful writes into change notifications.

use std::sync::Arc;

use super::{ChangeHub, RemoteTable};
use crate::types::bookmark::{Bookmark, BookmarkPatch, NewBookmark};
use crate::types::change::{ChangeEvent, ChangeKind};
use crate::types::errors::RemoteError;

/// Wraps a [`RemoteTable`] and publishes one [`ChangeEvent`] per affected write.
///
/// Writes that touch no row (unknown id, foreign owner) publish nothing,
/// matching a database change feed.
pub struct NotifyingTable<R> {
    inner: R,
    hub: Arc<ChangeHub>,
}

impl<R: RemoteTable> NotifyingTable<R> {
    pub fn new(inner: R, hub: Arc<ChangeHub>) -> Self {
        Self { inner, hub }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }
}

impl<R: RemoteTable> RemoteTable for NotifyingTable<R> {
    fn select_by_owner(&self, user_id: &str) -> Result<Vec<Bookmark>, RemoteError> {
        self.inner.select_by_owner(user_id)
    }

    fn insert(&self, row: &NewBookmark) -> Result<Bookmark, RemoteError> {
        let created = self.inner.insert(row)?;
        self.hub
            .publish(&ChangeEvent::bookmarks(ChangeKind::Insert, &created.user_id, &created.id));
        Ok(created)
    }

    fn update(&self, user_id: &str, id: &str, patch: &BookmarkPatch) -> Result<usize, RemoteError> {
        let affected = self.inner.update(user_id, id, patch)?;
        if affected > 0 {
            self.hub.publish(&ChangeEvent::bookmarks(ChangeKind::Update, user_id, id));
        }
        Ok(affected)
    }

    fn delete(&self, user_id: &str, id: &str) -> Result<usize, RemoteError> {
        let affected = self.inner.delete(user_id, id)?;
        if affected > 0 {
            self.hub.publish(&ChangeEvent::bookmarks(ChangeKind::Delete, user_id, id));
        }
        Ok(affected)
    }
}
