use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use client_core::HttpClient;
use parking_lot::RwLock;
use std::sync::Arc;

use crate::{LoginCredentials, Role, TokenStore, User};

/// Where the session currently stands.
///
/// `Unchecked` only exists between startup and the first
/// [`AuthStore::restore_session`] call; the route guard refuses to run on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Unchecked,
    Anonymous,
    Authenticated(User),
}

impl SessionState {
    pub fn user(&self) -> Option<&User> {
        match self {
            SessionState::Authenticated(user) => Some(user),
            _ => None,
        }
    }
}

/// Client-side session holder.
///
/// Owns the credential lifecycle: it writes the shared credential cell the
/// HTTP wrapper reads from, persists the encoded Basic pair through a
/// [`TokenStore`], and reacts to the wrapper's 401 notifications by dropping
/// the session.
pub struct AuthStore {
    http: HttpClient,
    tokens: Arc<dyn TokenStore>,
    state: Arc<RwLock<SessionState>>,
}

impl AuthStore {
    /// Build the store and register its session-invalidated listener on the
    /// client's event hub.
    pub fn new(http: HttpClient, tokens: Arc<dyn TokenStore>) -> Arc<Self> {
        let store = Arc::new(Self {
            state: Arc::new(RwLock::new(SessionState::Unchecked)),
            tokens,
            http,
        });

        let state = store.state.clone();
        let credentials = store.http.credentials().clone();
        let tokens = store.tokens.clone();
        store.http.events().on_unauthorized(move || {
            credentials.clear();
            if let Err(e) = tokens.clear() {
                tracing::warn!(error = %e, "failed to clear persisted session");
            }
            *state.write() = SessionState::Anonymous;
        });

        store
    }

    /// Exchange a username/password pair for a session.
    ///
    /// Encodes the pair as a Basic credential and validates it against the
    /// identity endpoint. Success persists the token and moves the state to
    /// authenticated; any failure (bad credentials, transport, malformed
    /// payload) resolves to `false` without raising, state anonymous.
    pub async fn login(&self, credentials: &LoginCredentials) -> bool {
        let token = BASE64.encode(format!(
            "{}:{}",
            credentials.username, credentials.password
        ));
        self.http.credentials().set(format!("Basic {token}"));

        match self.http.get::<User>("/auth/me").await {
            Ok(user) => {
                if let Err(e) = self.tokens.save(&token) {
                    tracing::warn!(error = %e, "failed to persist session token");
                }
                tracing::info!(username = %user.username, "logged in");
                *self.state.write() = SessionState::Authenticated(user);
                true
            }
            Err(e) => {
                tracing::debug!(error = %e, "login rejected");
                self.http.credentials().clear();
                *self.state.write() = SessionState::Anonymous;
                false
            }
        }
    }

    /// Replay a persisted token, if any.
    ///
    /// With nothing persisted the state settles to anonymous without any
    /// network traffic. A persisted token is validated against the identity
    /// endpoint; rejection clears it.
    pub async fn restore_session(&self) -> bool {
        let Some(token) = self.tokens.load() else {
            *self.state.write() = SessionState::Anonymous;
            return false;
        };

        self.http.credentials().set(format!("Basic {token}"));
        match self.http.get::<User>("/auth/me").await {
            Ok(user) => {
                tracing::debug!(username = %user.username, "session restored");
                *self.state.write() = SessionState::Authenticated(user);
                true
            }
            Err(e) => {
                tracing::debug!(error = %e, "persisted session rejected");
                self.http.credentials().clear();
                if let Err(e) = self.tokens.clear() {
                    tracing::warn!(error = %e, "failed to clear persisted session");
                }
                *self.state.write() = SessionState::Anonymous;
                false
            }
        }
    }

    /// Drop in-memory and persisted credentials.
    pub fn logout(&self) {
        self.http.credentials().clear();
        if let Err(e) = self.tokens.clear() {
            tracing::warn!(error = %e, "failed to clear persisted session");
        }
        *self.state.write() = SessionState::Anonymous;
    }

    pub fn state(&self) -> SessionState {
        self.state.read().clone()
    }

    pub fn session_checked(&self) -> bool {
        !matches!(*self.state.read(), SessionState::Unchecked)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(*self.state.read(), SessionState::Authenticated(_))
    }

    pub fn current_user(&self) -> Option<User> {
        self.state.read().user().cloned()
    }

    pub fn can_access_parts(&self) -> bool {
        self.has_role(Role::Parts)
    }

    pub fn can_access_records(&self) -> bool {
        self.has_role(Role::Records)
    }

    fn has_role(&self, role: Role) -> bool {
        self.state.read().user().is_some_and(|u| u.role == role)
    }
}
