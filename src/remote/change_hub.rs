//! In-process change feed.
//!
//! Fans each published [`ChangeEvent`] out to every subscriber whose
//! [`ChangeFilter`] matches it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Sender};

use parking_lot::Mutex;

use super::{ChangeFeed, Subscription};
use crate::types::change::{ChangeEvent, ChangeFilter};
use crate::types::errors::RemoteError;

struct Subscriber {
    id: u64,
    filter: ChangeFilter,
    tx: Sender<ChangeEvent>,
}

/// Broadcast hub implementing [`ChangeFeed`].
pub struct ChangeHub {
    next_id: AtomicU64,
    subscribers: Mutex<Vec<Subscriber>>,
}

impl ChangeHub {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Delivers `event` to matching subscribers. Returns how many received it.
    ///
    /// Subscribers whose receiving end is gone are pruned.
    pub fn publish(&self, event: &ChangeEvent) -> usize {
        let mut subscribers = self.subscribers.lock();
        let mut delivered = 0;
        subscribers.retain(|sub| {
            if !sub.filter.matches(event) {
                return true;
            }
            match sub.tx.send(event.clone()) {
                Ok(()) => {
                    delivered += 1;
                    true
                }
                Err(_) => false,
            }
        });
        tracing::debug!(
            kind = ?event.kind,
            user_id = %event.user_id,
            record_id = %event.record_id,
            delivered,
            "change published"
        );
        delivered
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }
}

impl Default for ChangeHub {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeFeed for ChangeHub {
    fn subscribe(&self, filter: ChangeFilter) -> Result<Subscription, RemoteError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::channel();
        tracing::debug!(id, table = %filter.table, filter = %filter.row_filter(), "subscribed");
        self.subscribers.lock().push(Subscriber { id, filter, tx });
        Ok(Subscription { id, events: rx })
    }

    fn unsubscribe(&self, id: u64) {
        self.subscribers.lock().retain(|sub| sub.id != id);
    }
}
