//! Realtime Sync for SmartBookmarks.
//!
//! Subscribes to the change feed for one user's bookmarks and calls
//! [`BookmarkStore::refresh`] once per received notification. Notifications
//! are neither deduplicated nor batched: every refresh replaces the snapshot
//! wholesale, so redundant ones are harmless.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::managers::bookmark_store::BookmarkStore;
use crate::remote::ChangeFeed;
use crate::types::change::{ChangeEvent, ChangeFilter};
use crate::types::errors::RemoteError;

/// Starts and stops per-user change subscriptions.
pub struct RealtimeSync {
    feed: Arc<dyn ChangeFeed>,
    store: Arc<BookmarkStore>,
    channel: String,
}

/// A running subscription and its worker thread.
///
/// Dropping the handle stops the subscription, so a discarded handle never
/// leaves a worker refreshing on behalf of a stale user.
pub struct SubscriptionHandle {
    id: u64,
    user_id: String,
    channel: String,
    feed: Arc<dyn ChangeFeed>,
    stopped: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl SubscriptionHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Stops future notifications from triggering refreshes, then waits for a
    /// refresh already in progress to finish.
    fn shutdown(&mut self) {
        self.stopped.store(true, Ordering::Release);
        self.feed.unsubscribe(self.id);

        if let Some(worker) = self.worker.take() {
            if worker.thread().id() == thread::current().id() {
                return;
            }
            if worker.join().is_err() {
                tracing::error!(channel = %self.channel, id = self.id, "realtime worker panicked");
            }
        }
    }
}

impl Drop for SubscriptionHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl RealtimeSync {
    pub fn new(feed: Arc<dyn ChangeFeed>, store: Arc<BookmarkStore>, channel: impl Into<String>) -> Self {
        Self {
            feed,
            store,
            channel: channel.into(),
        }
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Subscribes to insert/update/delete events on `user_id`'s bookmarks, then
    /// performs the initial full fetch.
    ///
    /// The subscription is opened before the fetch so no change made in between
    /// is missed. A failed initial fetch is logged and left to the next
    /// notification.
    ///
    /// # Errors
    /// Returns [`RemoteError`] if the subscription cannot be opened.
    pub fn start(&self, user_id: &str) -> Result<SubscriptionHandle, RemoteError> {
        let filter = ChangeFilter::bookmarks_for(user_id);
        let row_filter = filter.row_filter();
        let subscription = self.feed.subscribe(filter)?;
        let stopped = Arc::new(AtomicBool::new(false));

        let worker = {
            let store = Arc::clone(&self.store);
            let stopped = Arc::clone(&stopped);
            let events = subscription.events;
            thread::Builder::new()
                .name(format!("{}-{}", self.channel, subscription.id))
                .spawn(move || run_worker(events, store, stopped))
        };
        let worker = match worker {
            Ok(worker) => worker,
            Err(e) => {
                self.feed.unsubscribe(subscription.id);
                return Err(RemoteError::Network(format!("failed to start realtime worker: {}", e)));
            }
        };

        tracing::info!(
            channel = %self.channel,
            id = subscription.id,
            filter = %row_filter,
            "realtime subscription started"
        );

        let handle = SubscriptionHandle {
            id: subscription.id,
            user_id: user_id.to_string(),
            channel: self.channel.clone(),
            feed: Arc::clone(&self.feed),
            stopped,
            worker: Some(worker),
        };

        if let Err(e) = self.store.refresh() {
            tracing::warn!(user_id, error = %e, "initial fetch failed");
        }

        Ok(handle)
    }

    /// Tears down a subscription. Does not abort a refresh already dispatched.
    pub fn stop(&self, mut handle: SubscriptionHandle) {
        handle.shutdown();
        tracing::info!(channel = %handle.channel, id = handle.id, "realtime subscription stopped");
    }
}

fn run_worker(events: Receiver<ChangeEvent>, store: Arc<BookmarkStore>, stopped: Arc<AtomicBool>) {
    for event in events.iter() {
        if stopped.load(Ordering::Acquire) {
            break;
        }
        tracing::debug!(kind = ?event.kind, record_id = %event.record_id, "change notification");
        if let Err(e) = store.refresh() {
            tracing::warn!(error = %e, "refresh after notification failed");
        }
    }
}
