//! Unit tests for realtime subscriptions driving store refreshes.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use smartbookmarks::database::SqliteTable;
use smartbookmarks::managers::bookmark_store::BookmarkStore;
use smartbookmarks::managers::realtime_sync::RealtimeSync;
use smartbookmarks::remote::{ChangeHub, NotifyingTable, RemoteTable};
use smartbookmarks::types::bookmark::{Bookmark, BookmarkPatch, NewBookmark};
use smartbookmarks::types::change::{ChangeEvent, ChangeKind};
use smartbookmarks::types::errors::RemoteError;

/// Counts selects so tests can observe refreshes.
struct CountingTable {
    inner: SqliteTable,
    selects: AtomicUsize,
}

impl RemoteTable for CountingTable {
    fn select_by_owner(&self, user_id: &str) -> Result<Vec<Bookmark>, RemoteError> {
        self.selects.fetch_add(1, Ordering::SeqCst);
        self.inner.select_by_owner(user_id)
    }

    fn insert(&self, row: &NewBookmark) -> Result<Bookmark, RemoteError> {
        self.inner.insert(row)
    }

    fn update(&self, user_id: &str, id: &str, patch: &BookmarkPatch) -> Result<usize, RemoteError> {
        self.inner.update(user_id, id, patch)
    }

    fn delete(&self, user_id: &str, id: &str) -> Result<usize, RemoteError> {
        self.inner.delete(user_id, id)
    }
}

struct Fixture {
    hub: Arc<ChangeHub>,
    table: Arc<CountingTable>,
    store: Arc<BookmarkStore>,
    sync: RealtimeSync,
}

fn fixture() -> Fixture {
    let hub = Arc::new(ChangeHub::new());
    let table = Arc::new(CountingTable {
        inner: SqliteTable::in_memory().unwrap(),
        selects: AtomicUsize::new(0),
    });
    let store = Arc::new(BookmarkStore::new(table.clone()));
    store.bind("alice");
    let sync = RealtimeSync::new(hub.clone(), store.clone(), "bookmarks-realtime");
    Fixture {
        hub,
        table,
        store,
        sync,
    }
}

fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    condition()
}

fn insert_for(table: &CountingTable, user_id: &str, title: &str) -> Bookmark {
    table
        .inner
        .insert(&NewBookmark {
            title: title.to_string(),
            url: format!("https://{}.com/", title.to_lowercase()),
            user_id: user_id.to_string(),
        })
        .unwrap()
}

#[test]
fn test_start_performs_initial_fetch() {
    let f = fixture();
    insert_for(&f.table, "alice", "Existing");

    let handle = f.sync.start("alice").unwrap();

    assert_eq!(handle.user_id(), "alice");
    assert_eq!(handle.channel(), "bookmarks-realtime");
    assert_eq!(f.hub.subscriber_count(), 1);
    assert_eq!(f.store.snapshot().len(), 1, "initial fetch happens before start returns");
}

#[test]
fn test_each_notification_triggers_a_refresh() {
    let f = fixture();
    let _handle = f.sync.start("alice").unwrap();
    let baseline = f.table.selects.load(Ordering::SeqCst);

    // Simulates a write made by another device.
    let row = insert_for(&f.table, "alice", "Remote");
    f.hub.publish(&ChangeEvent::bookmarks(ChangeKind::Insert, "alice", &row.id));

    assert!(wait_until(|| f.store.snapshot().len() == 1));

    f.hub.publish(&ChangeEvent::bookmarks(ChangeKind::Update, "alice", &row.id));
    f.hub.publish(&ChangeEvent::bookmarks(ChangeKind::Update, "alice", &row.id));
    assert!(wait_until(|| f.table.selects.load(Ordering::SeqCst) == baseline + 3));
}

#[test]
fn test_notifications_for_other_users_are_ignored() {
    let f = fixture();
    let _handle = f.sync.start("alice").unwrap();

    let delivered = f
        .hub
        .publish(&ChangeEvent::bookmarks(ChangeKind::Insert, "bob", "whatever"));

    assert_eq!(delivered, 0);
}

#[test]
fn test_writes_through_notifying_table_reach_other_stores() {
    let hub = Arc::new(ChangeHub::new());
    let table = Arc::new(NotifyingTable::new(SqliteTable::in_memory().unwrap(), hub.clone()));

    // Two devices signed in as the same user, sharing one backend.
    let phone = Arc::new(BookmarkStore::new(table.clone()));
    let laptop = Arc::new(BookmarkStore::new(table.clone()));
    phone.bind("alice");
    laptop.bind("alice");
    let _laptop_sync = RealtimeSync::new(hub.clone(), laptop.clone(), "bookmarks-realtime")
        .start("alice")
        .unwrap();

    phone.add("Shared", "shared.io").unwrap();

    assert!(wait_until(|| laptop.snapshot().len() == 1));
    assert_eq!(laptop.snapshot()[0].url, "https://shared.io/");
}

#[test]
fn test_stop_unsubscribes_and_halts_refreshes() {
    let f = fixture();
    let handle = f.sync.start("alice").unwrap();

    f.sync.stop(handle);
    let selects = f.table.selects.load(Ordering::SeqCst);

    assert_eq!(f.hub.subscriber_count(), 0);
    assert_eq!(
        f.hub.publish(&ChangeEvent::bookmarks(ChangeKind::Insert, "alice", "x")),
        0
    );
    thread::sleep(Duration::from_millis(50));
    assert_eq!(f.table.selects.load(Ordering::SeqCst), selects);
}

#[test]
fn test_dropping_handle_stops_subscription() {
    let f = fixture();
    {
        let _handle = f.sync.start("alice").unwrap();
        assert_eq!(f.hub.subscriber_count(), 1);
    }
    assert_eq!(f.hub.subscriber_count(), 0);
}
