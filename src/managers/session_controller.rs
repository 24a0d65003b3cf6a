//! Session Controller for SmartBookmarks.
//!
//! Owns the signed-in user and everything scoped to it: the store binding,
//! the realtime subscription and the edit session. It is the only component
//! that talks to the [`AuthProvider`].

use std::sync::Arc;

use crate::managers::bookmark_store::BookmarkStore;
use crate::managers::edit_session::{EditDraft, EditSession};
use crate::managers::realtime_sync::{RealtimeSync, SubscriptionHandle};
use crate::services::auth::AuthProvider;
use crate::types::errors::{AuthError, EditError, SessionError};
use crate::types::user::{OAuthProvider, User};

/// Drives sign-in/sign-out and keeps exactly one subscription per session.
pub struct SessionController {
    auth: Arc<dyn AuthProvider>,
    store: Arc<BookmarkStore>,
    realtime: RealtimeSync,
    user: Option<User>,
    subscription: Option<SubscriptionHandle>,
    editor: EditSession,
}

impl SessionController {
    pub fn new(auth: Arc<dyn AuthProvider>, store: Arc<BookmarkStore>, realtime: RealtimeSync) -> Self {
        Self {
            auth,
            store,
            realtime,
            user: None,
            subscription: None,
            editor: EditSession::new(),
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn store(&self) -> &Arc<BookmarkStore> {
        &self.store
    }

    pub fn editor(&self) -> &EditSession {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut EditSession {
        &mut self.editor
    }

    /// Whether a realtime subscription is currently running.
    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    /// Signs in through the auth collaborator and activates the resulting user.
    ///
    /// Signing in as a different user first tears the previous session down.
    pub fn sign_in(&mut self, provider: OAuthProvider) -> Result<User, SessionError> {
        self.auth.sign_in(provider)?;
        let user = self.auth.current_user().ok_or(AuthError::NoIdentity)?;
        self.activate(user)
    }

    /// Activates the collaborator's existing identity, if it has one.
    pub fn restore(&mut self) -> Result<Option<User>, SessionError> {
        match self.auth.current_user() {
            Some(user) => self.activate(user).map(Some),
            None => Ok(None),
        }
    }

    /// Ends the session: stops the subscription, clears the snapshot, the
    /// edit session and the user.
    ///
    /// Local teardown happens even if the collaborator fails to sign out; that
    /// failure is returned afterwards.
    pub fn sign_out(&mut self) -> Result<(), SessionError> {
        let result = self.auth.sign_out();
        if let Some(user) = &self.user {
            tracing::info!(user_id = %user.id, "signing out");
        }
        self.teardown();
        result.map_err(SessionError::from)
    }

    /// Opens bookmark `id` from the current snapshot for editing.
    pub fn begin_edit(&mut self, id: &str) -> Result<EditDraft, EditError> {
        let snapshot = self.store.snapshot();
        self.editor.begin(&snapshot, id)
    }

    /// Saves the active edit session through the store.
    pub fn save_edit(&mut self) -> Result<(), EditError> {
        self.editor.save(&self.store)
    }

    pub fn cancel_edit(&mut self) {
        self.editor.cancel();
    }

    fn activate(&mut self, user: User) -> Result<User, SessionError> {
        let same_user = self.user.as_ref().is_some_and(|u| u.id == user.id);
        if same_user && self.subscription.is_some() {
            self.user = Some(user.clone());
            return Ok(user);
        }

        self.teardown();
        self.store.bind(&user.id);

        let handle = match self.realtime.start(&user.id) {
            Ok(handle) => handle,
            Err(e) => {
                self.store.unbind();
                return Err(e.into());
            }
        };

        tracing::info!(user_id = %user.id, "session started");
        self.subscription = Some(handle);
        self.user = Some(user.clone());
        Ok(user)
    }

    fn teardown(&mut self) {
        if let Some(handle) = self.subscription.take() {
            self.realtime.stop(handle);
        }
        self.store.unbind();
        self.editor.cancel();
        self.user = None;
    }
}
