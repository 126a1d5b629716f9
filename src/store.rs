//! Process-wide Twitter credential store
//!
//! Exactly one [`CredentialSession`] exists per process. It is created empty
//! at startup, populated by the authorization callback, refreshed on demand,
//! and dies with the process — there is no persistence layer.
//!
//! Refresh tokens rotate: the old token becomes invalid the moment a new one
//! is issued. Every read-modify-write sequence against the session (check
//! access token, refresh, post, persist) must therefore run under a single
//! [`CredentialStore::lock`] acquisition so concurrent webhook deliveries
//! cannot race two refresh calls against the same token.

use tokio::sync::{Mutex, MutexGuard};

/// The single shared OAuth2 session.
#[derive(Debug, Clone, Default)]
pub struct CredentialSession {
    /// PKCE code verifier, written at authorization start and consumed at
    /// the callback.
    pub code_verifier: String,
    /// CSRF state echoed back by the provider. One-shot: not rotated after
    /// a successful callback.
    pub csrf_state: String,
    /// Short-lived bearer token. Empty means "refresh or authorize first".
    pub access_token: String,
    /// Long-lived rotating token used to mint new access tokens.
    pub refresh_token: String,
}

impl CredentialSession {
    pub fn has_access_token(&self) -> bool {
        !self.access_token.is_empty()
    }

    /// True once an authorization attempt has been started.
    pub fn has_pending_auth(&self) -> bool {
        !self.csrf_state.is_empty()
    }

    /// Replace the access/refresh pair. The two are only ever written
    /// together so a stale refresh token can never outlive its paired
    /// access token.
    pub fn set_tokens(&mut self, access: impl Into<String>, refresh: impl Into<String>) {
        self.access_token = access.into();
        self.refresh_token = refresh.into();
    }

    /// Replace the PKCE verifier and CSRF state together. Starting a new
    /// attempt invalidates any attempt still pending a callback.
    pub fn set_auth_attempt(&mut self, code_verifier: impl Into<String>, state: impl Into<String>) {
        self.code_verifier = code_verifier.into();
        self.csrf_state = state.into();
    }
}

/// Owner of the single [`CredentialSession`], injectable into every
/// component that needs it.
#[derive(Debug, Default)]
pub struct CredentialStore {
    session: Mutex<CredentialSession>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the session for a read-modify-write critical section.
    ///
    /// Hold the guard across the whole "ensure token, post, persist"
    /// sequence; dropping it between steps reintroduces the refresh race.
    pub async fn lock(&self) -> MutexGuard<'_, CredentialSession> {
        self.session.lock().await
    }

    /// Current session by value. Mutating the copy does not touch the store.
    pub async fn snapshot(&self) -> CredentialSession {
        self.session.lock().await.clone()
    }

    pub async fn set_tokens(&self, access: impl Into<String>, refresh: impl Into<String>) {
        self.session.lock().await.set_tokens(access, refresh);
    }

    pub async fn set_auth_attempt(
        &self,
        code_verifier: impl Into<String>,
        state: impl Into<String>,
    ) {
        self.session
            .lock()
            .await
            .set_auth_attempt(code_verifier, state);
    }
}
