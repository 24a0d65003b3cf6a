//! PostgREST client for a hosted `bookmarks` table (e.g. a Supabase project).
//!
//! Uses blocking `reqwest`. Row-level security on the server is expected to
//! enforce ownership; the client still filters every request by `user_id`.

use parking_lot::RwLock;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use url::Url;

use super::RemoteTable;
use crate::types::bookmark::{Bookmark, BookmarkPatch, NewBookmark};
use crate::types::change::BOOKMARKS_TABLE;
use crate::types::errors::RemoteError;

const REST_PREFIX: &str = "rest/v1";

/// Error body returned by PostgREST.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// [`RemoteTable`] backed by a PostgREST endpoint.
pub struct RestTable {
    client: Client,
    endpoint: Url,
    api_key: String,
    access_token: RwLock<Option<String>>,
}

impl RestTable {
    /// Creates a client for `<base_url>/rest/v1/bookmarks`.
    ///
    /// # Errors
    /// Returns [`RemoteError::Network`] if `base_url` is not a valid URL or the
    /// HTTP client cannot be built.
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, RemoteError> {
        let mut base = Url::parse(base_url).map_err(|e| RemoteError::Network(format!("invalid base url: {}", e)))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let endpoint = base
            .join(&format!("{}/{}", REST_PREFIX, BOOKMARKS_TABLE))
            .map_err(|e| RemoteError::Network(format!("invalid base url: {}", e)))?;

        let client = Client::builder().build()?;

        Ok(Self {
            client,
            endpoint,
            api_key: api_key.to_string(),
            access_token: RwLock::new(None),
        })
    }

    /// Sets (or clears) the user's access token sent as the bearer credential.
    /// Without one, the anon key is used.
    pub fn set_access_token(&self, token: Option<String>) {
        *self.access_token.write() = token;
    }

    /// The bearer token currently set, if any.
    pub fn access_token(&self) -> Option<String> {
        self.access_token.read().clone()
    }

    /// Full table endpoint.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// URL listing every row owned by `user_id`, newest first.
    pub fn select_url(&self, user_id: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("user_id", &format!("eq.{}", user_id))
            .append_pair("order", "created_at.desc");
        url
    }

    /// URL addressing row `id` owned by `user_id`.
    pub fn row_url(&self, user_id: &str, id: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("id", &format!("eq.{}", id))
            .append_pair("user_id", &format!("eq.{}", user_id));
        url
    }

    fn headers(&self) -> Result<HeaderMap, RemoteError> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(&self.api_key)
            .map_err(|e| RemoteError::Network(format!("invalid api key: {}", e)))?;
        headers.insert("apikey", key);

        let bearer = self
            .access_token
            .read()
            .clone()
            .unwrap_or_else(|| self.api_key.clone());
        let auth = HeaderValue::from_str(&format!("Bearer {}", bearer))
            .map_err(|e| RemoteError::Network(format!("invalid access token: {}", e)))?;
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    fn send(&self, request: RequestBuilder) -> Result<Response, RemoteError> {
        let response = request.headers(self.headers()?).send()?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .and_then(|b| b.message)
            .unwrap_or(text);
        Err(RemoteError::Rejected {
            status: status.as_u16(),
            message,
        })
    }

    fn representation(&self, request: RequestBuilder) -> Result<Vec<Bookmark>, RemoteError> {
        let response = self.send(request.header("Prefer", "return=representation"))?;
        let rows: Vec<Bookmark> = response.json()?;
        Ok(rows)
    }
}

impl RemoteTable for RestTable {
    fn select_by_owner(&self, user_id: &str) -> Result<Vec<Bookmark>, RemoteError> {
        let response = self.send(self.client.get(self.select_url(user_id)))?;
        let rows: Vec<Bookmark> = response.json()?;
        Ok(rows)
    }

    fn insert(&self, row: &NewBookmark) -> Result<Bookmark, RemoteError> {
        let rows = self.representation(self.client.post(self.endpoint.clone()).json(row))?;
        rows.into_iter()
            .next()
            .ok_or_else(|| RemoteError::Decode("insert returned no row".to_string()))
    }

    fn update(&self, user_id: &str, id: &str, patch: &BookmarkPatch) -> Result<usize, RemoteError> {
        let rows = self.representation(self.client.patch(self.row_url(user_id, id)).json(patch))?;
        Ok(rows.len())
    }

    fn delete(&self, user_id: &str, id: &str) -> Result<usize, RemoteError> {
        let rows = self.representation(self.client.delete(self.row_url(user_id, id)))?;
        Ok(rows.len())
    }
}
