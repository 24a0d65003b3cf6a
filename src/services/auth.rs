//! Auth collaborator boundary.
//!
//! The OAuth flow itself happens outside this crate; [`AuthProvider`] is the
//! slice of it the session controller consumes.

use parking_lot::RwLock;

use crate::types::errors::AuthError;
use crate::types::user::{OAuthProvider, User};

/// Operations the client core needs from the auth collaborator.
pub trait AuthProvider: Send + Sync {
    /// Starts a provider-delegated sign-in.
    fn sign_in(&self, provider: OAuthProvider) -> Result<(), AuthError>;
    /// Terminates the current auth session.
    fn sign_out(&self) -> Result<(), AuthError>;
    /// The authenticated identity, or `None` when signed out.
    fn current_user(&self) -> Option<User>;
}

/// Auth provider for hosts that run the OAuth flow themselves.
///
/// The host hands the established identity over with [`HostAuth::establish`];
/// `sign_in` then confirms it, rejecting an identity without an id.
#[derive(Default)]
pub struct HostAuth {
    pending: RwLock<Option<User>>,
    current: RwLock<Option<User>>,
}

impl HostAuth {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the identity produced by the host's OAuth flow.
    pub fn establish(&self, user: User) {
        *self.pending.write() = Some(user);
    }

    /// Starts out already signed in as `user`, as after a restored session.
    pub fn signed_in(user: User) -> Self {
        Self {
            pending: RwLock::new(None),
            current: RwLock::new(Some(user)),
        }
    }
}

impl AuthProvider for HostAuth {
    fn sign_in(&self, provider: OAuthProvider) -> Result<(), AuthError> {
        let user = self.pending.write().take().ok_or(AuthError::NoIdentity)?;
        if user.id.trim().is_empty() {
            return Err(AuthError::Provider("identity has an empty id".to_string()));
        }
        tracing::debug!(provider = provider.as_str(), user_id = %user.id, "identity confirmed");
        *self.current.write() = Some(user);
        Ok(())
    }

    fn sign_out(&self) -> Result<(), AuthError> {
        self.pending.write().take();
        self.current.write().take();
        Ok(())
    }

    fn current_user(&self) -> Option<User> {
        self.current.read().clone()
    }
}
