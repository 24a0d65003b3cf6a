use serde::{Deserialize, Serialize};

/// Table every bookmark query and subscription targets.
pub const BOOKMARKS_TABLE: &str = "bookmarks";

/// Kind of row change carried by a realtime notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

/// Which change kinds a subscription listens for. `All` is the `*` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EventFilter {
    #[default]
    #[serde(rename = "*")]
    All,
    #[serde(rename = "INSERT")]
    Insert,
    #[serde(rename = "UPDATE")]
    Update,
    #[serde(rename = "DELETE")]
    Delete,
}

impl EventFilter {
    pub fn matches(&self, kind: ChangeKind) -> bool {
        matches!(
            (self, kind),
            (EventFilter::All, _)
                | (EventFilter::Insert, ChangeKind::Insert)
                | (EventFilter::Update, ChangeKind::Update)
                | (EventFilter::Delete, ChangeKind::Delete)
        )
    }
}

/// A single row-change notification.
///
/// Consumers treat it as "something changed"; the fields exist for filtering and logging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    pub table: String,
    pub user_id: String,
    pub record_id: String,
}

impl ChangeEvent {
    pub fn bookmarks(kind: ChangeKind, user_id: &str, record_id: &str) -> Self {
        Self {
            kind,
            table: BOOKMARKS_TABLE.to_string(),
            user_id: user_id.to_string(),
            record_id: record_id.to_string(),
        }
    }
}

/// Subscription parameters: event kind, target table and `user_id` row filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeFilter {
    pub event: EventFilter,
    pub table: String,
    pub user_id: String,
}

impl ChangeFilter {
    /// All changes to the bookmarks owned by `user_id`.
    pub fn bookmarks_for(user_id: &str) -> Self {
        Self {
            event: EventFilter::All,
            table: BOOKMARKS_TABLE.to_string(),
            user_id: user_id.to_string(),
        }
    }

    pub fn matches(&self, event: &ChangeEvent) -> bool {
        self.event.matches(event.kind) && self.table == event.table && self.user_id == event.user_id
    }

    /// Row filter in realtime filter syntax, e.g. `user_id=eq.abc`.
    pub fn row_filter(&self) -> String {
        format!("user_id=eq.{}", self.user_id)
    }
}
