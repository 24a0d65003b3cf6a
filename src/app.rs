//! App Core for SmartBookmarks.
//!
//! Builds the remote backend from [`ClientConfig`] and wires the change hub,
//! bookmark store, realtime sync and session controller together.

use std::sync::Arc;

use crate::database::{Database, SqliteTable};
use crate::managers::bookmark_store::BookmarkStore;
use crate::managers::realtime_sync::RealtimeSync;
use crate::managers::session_controller::SessionController;
use crate::remote::{ChangeHub, NotifyingTable, RemoteTable, RestTable};
use crate::services::auth::HostAuth;
use crate::types::settings::{BackendConfig, ClientConfig};

/// Everything a host needs to drive one client session.
pub struct App {
    pub config: ClientConfig,
    pub hub: Arc<ChangeHub>,
    pub auth: Arc<HostAuth>,
    pub session: SessionController,
    rest: Option<Arc<RestTable>>,
}

impl App {
    /// Creates an App for the configured backend.
    pub fn new(config: ClientConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let hub = Arc::new(ChangeHub::new());

        let (table, rest): (Arc<dyn RemoteTable>, Option<Arc<RestTable>>) = match &config.backend {
            BackendConfig::Sqlite { path } => {
                if let Some(parent) = std::path::Path::new(path).parent() {
                    if !parent.as_os_str().is_empty() {
                        std::fs::create_dir_all(parent)
                            .map_err(|e| format!("Failed to create data directory: {}", e))?;
                    }
                }
                let db = Database::open(path)?;
                let table = NotifyingTable::new(SqliteTable::new(db), hub.clone());
                (Arc::new(table), None)
            }
            BackendConfig::Rest { base_url, api_key } => {
                let rest = Arc::new(RestTable::new(base_url, api_key)?);
                let table = NotifyingTable::new(rest.clone(), hub.clone());
                (Arc::new(table), Some(rest))
            }
        };

        Ok(Self::assemble(config, hub, table, rest))
    }

    /// App on a fresh in-memory SQLite table.
    pub fn in_memory() -> Result<Self, Box<dyn std::error::Error>> {
        let hub = Arc::new(ChangeHub::new());
        let table = NotifyingTable::new(SqliteTable::in_memory()?, hub.clone());
        Ok(Self::assemble(ClientConfig::default(), hub, Arc::new(table), None))
    }

    fn assemble(
        config: ClientConfig,
        hub: Arc<ChangeHub>,
        table: Arc<dyn RemoteTable>,
        rest: Option<Arc<RestTable>>,
    ) -> Self {
        let auth = Arc::new(HostAuth::new());
        let store = Arc::new(BookmarkStore::new(table));
        let realtime = RealtimeSync::new(hub.clone(), store.clone(), config.realtime_channel.clone());
        let session = SessionController::new(auth.clone(), store, realtime);

        Self {
            config,
            hub,
            auth,
            session,
            rest,
        }
    }

    /// Passes the user's access token to the REST backend, if there is one.
    pub fn set_access_token(&self, token: Option<String>) {
        if let Some(rest) = &self.rest {
            rest.set_access_token(token);
        }
    }

    /// The access token held by the REST backend. Always `None` for the embedded one.
    pub fn access_token(&self) -> Option<String> {
        self.rest.as_ref().and_then(|rest| rest.access_token())
    }

    /// Startup sequence: resume a session the auth collaborator already holds.
    pub fn startup(&mut self) {
        match self.session.restore() {
            Ok(Some(user)) => tracing::info!(user_id = %user.id, "session restored"),
            Ok(None) => tracing::debug!("no existing session"),
            Err(e) => tracing::warn!(error = %e, "failed to restore session"),
        }
    }
}
