//! The single source of truth for who is logged in.

use docqa_core::auth::{AuthContext, AuthState, CredentialStore, Identity, Session};
use docqa_core::error::Result;
use std::sync::Arc;
use tokio::sync::watch;

/// Holds the current [`AuthState`] and mirrors it to durable storage.
///
/// Every transition publishes exactly one new value on the watch channel,
/// so observers never see a half-applied state. All methods are
/// synchronous; none of them suspend.
pub struct SessionStore {
    storage: Arc<dyn CredentialStore>,
    state: watch::Sender<AuthState>,
}

impl SessionStore {
    /// Creates a store in the `Loading` state. Call [`restore`](Self::restore)
    /// before serving routes.
    pub fn new(storage: Arc<dyn CredentialStore>) -> Self {
        let (state, _) = watch::channel(AuthState::Loading);
        Self { storage, state }
    }

    /// Rebuilds the session from the persisted records.
    ///
    /// Both records present and well-formed yield `Authenticated`. Anything
    /// else yields `Anonymous` and both records are purged. Never fails.
    pub fn restore(&self) -> AuthState {
        let restored = match self.read_persisted() {
            Some(session) => {
                tracing::info!(
                    "[Session] Restored session for {} ({})",
                    session.identity().email,
                    session.role()
                );
                AuthState::Authenticated(session)
            }
            None => {
                self.purge_storage();
                AuthState::Anonymous
            }
        };
        self.state.send_replace(restored.clone());
        restored
    }

    fn read_persisted(&self) -> Option<Session> {
        let token = match self.storage.read_token() {
            Ok(Some(token)) => token,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("[Session] Could not read token record: {}", e);
                return None;
            }
        };
        let identity_json = match self.storage.read_identity() {
            Ok(Some(json)) => json,
            Ok(None) => {
                tracing::warn!("[Session] Token present without identity, discarding");
                return None;
            }
            Err(e) => {
                tracing::warn!("[Session] Could not read identity record: {}", e);
                return None;
            }
        };
        let identity: Identity = match serde_json::from_str(&identity_json) {
            Ok(identity) => identity,
            Err(e) => {
                tracing::warn!("[Session] Malformed identity record: {}", e);
                return None;
            }
        };
        match Session::new(token, identity) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!("[Session] Persisted session rejected: {}", e);
                None
            }
        }
    }

    /// Establishes a session, replacing any prior one.
    ///
    /// The token is written first, then the identity. If the identity write
    /// fails the token record is rolled back and the in-memory state is left
    /// untouched.
    pub fn login(&self, token: impl Into<String>, identity: Identity) -> Result<()> {
        let session = Session::new(token, identity)?;
        let identity_json = serde_json::to_string(session.identity())?;
        let previous_token = self.token();

        self.storage.write_token(session.token())?;
        if let Err(e) = self.storage.write_identity(&identity_json) {
            let rollback = match &previous_token {
                Some(previous) => self.storage.write_token(previous),
                None => self.storage.clear_token(),
            };
            if let Err(rollback_err) = rollback {
                tracing::error!("[Session] Token rollback failed: {}", rollback_err);
            }
            return Err(e);
        }

        tracing::info!(
            "[Session] Logged in as {} ({})",
            session.identity().email,
            session.role()
        );
        self.state.send_replace(AuthState::Authenticated(session));
        Ok(())
    }

    /// Ends the session. In-memory state is cleared before storage is
    /// touched; storage failures are logged, not returned.
    pub fn logout(&self) {
        if self.state.borrow().is_authenticated() {
            tracing::info!("[Session] Logged out");
        }
        self.state.send_replace(AuthState::Anonymous);
        self.purge_storage();
    }

    /// Purges a session whose credential the backend rejected.
    pub fn expire(&self) {
        if self.state.borrow().is_authenticated() {
            tracing::warn!("[Session] Credential expired or invalid, session purged");
        }
        self.state.send_replace(AuthState::Anonymous);
        self.purge_storage();
    }

    fn purge_storage(&self) {
        if let Err(e) = self.storage.clear_token() {
            tracing::warn!("[Session] Failed to clear token record: {}", e);
        }
        if let Err(e) = self.storage.clear_identity() {
            tracing::warn!("[Session] Failed to clear identity record: {}", e);
        }
    }

    /// Receives every subsequent state, starting from the current one.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    pub fn session(&self) -> Option<Session> {
        self.state.borrow().session().cloned()
    }

    pub fn identity(&self) -> Option<Identity> {
        self.state.borrow().session().map(|s| s.identity().clone())
    }

    pub fn token(&self) -> Option<String> {
        self.state.borrow().session().map(|s| s.token().to_string())
    }
}

impl AuthContext for SessionStore {
    fn bearer_token(&self) -> Option<String> {
        self.token()
    }

    fn expire(&self) {
        SessionStore::expire(self);
    }
}
