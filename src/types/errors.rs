use thiserror::Error;

// === ValidationError ===

/// Input rejected locally, before any remote call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Title or URL is empty.
    #[error("All fields are required")]
    MissingFields,
    /// The URL could not be normalized into an absolute URL.
    #[error("Invalid URL format")]
    InvalidUrl,
}

// === RemoteError ===

/// Failure reported by (or while talking to) the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    /// The request never got a response.
    #[error("Network error: {0}")]
    Network(String),
    /// The remote store answered and refused the request.
    #[error("Remote store rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },
    /// The response could not be turned into typed rows.
    #[error("Malformed remote response: {0}")]
    Decode(String),
    /// The embedded table failed.
    #[error("Bookmark database error: {0}")]
    Database(String),
}

impl From<rusqlite::Error> for RemoteError {
    fn from(e: rusqlite::Error) -> Self {
        RemoteError::Database(e.to_string())
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            RemoteError::Decode(e.to_string())
        } else {
            RemoteError::Network(e.to_string())
        }
    }
}

// === StoreError ===

/// Errors surfaced by `BookmarkStore` operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Remote(#[from] RemoteError),
    /// A user-initiated mutation is already in flight.
    #[error("Another change is still in progress")]
    Busy,
    /// No user is bound to the store.
    #[error("No signed-in user")]
    NotBound,
}

// === EditError ===

/// Errors from the edit-session state machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("No bookmark is being edited")]
    NotEditing,
    #[error("Bookmark not found: {0}")]
    UnknownBookmark(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

// === AuthError ===

/// Errors from the auth collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Sign-in finished without producing a user identity.
    #[error("No authenticated user")]
    NoIdentity,
    #[error("Auth provider error: {0}")]
    Provider(String),
}

// === SessionError ===

/// Errors from session lifecycle transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    /// The realtime subscription could not be opened.
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

// === ConfigError ===

/// Errors related to loading or saving the client configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config I/O error: {0}")]
    Io(String),
    #[error("Config serialization error: {0}")]
    Serialization(String),
    #[error("Invalid config value: {0}")]
    InvalidValue(String),
}
