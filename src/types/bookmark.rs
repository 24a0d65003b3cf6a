use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A bookmark row as stored in the remote `bookmarks` table.
///
/// `url` is always canonical (see [`crate::services::url_normalizer::normalize`]).
/// `id`, `user_id` and `created_at` are assigned by the remote store and never change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub title: String,
    pub url: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

/// Insert payload. The remote store assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewBookmark {
    pub title: String,
    pub url: String,
    pub user_id: String,
}

/// Field-level update payload. Only title and url are mutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookmarkPatch {
    pub title: String,
    pub url: String,
}

/// PostgREST serializes bigint identity columns as JSON numbers; uuid columns as strings.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Int(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Int(n) => n.to_string(),
    })
}
