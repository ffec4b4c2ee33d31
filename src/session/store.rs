use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult};
use crate::routes;

use super::token::TokenStore;

/// Authenticated admin profile as returned by the server. The permission
/// sequence keeps server order: the first mapped key decides the user's
/// landing page.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub permissions: Vec<String>,
}

/// Legacy/super-admin sentinel: an empty permission sequence means
/// unrestricted access, not "no access". Every permission check goes through
/// this one predicate.
pub fn is_unrestricted(identity: &Identity) -> bool {
    identity.permissions.is_empty()
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginReply {
    #[serde(rename = "accessToken")]
    pub access_token: String,
    pub user: Identity,
}

/// Transport seam between the session store and the auth endpoints, so the
/// store can be exercised without a live server.
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> AppResult<LoginReply>;
    async fn fetch_identity(&self, token: &str) -> AppResult<Identity>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Initial restore has not completed yet; the guard must not redirect.
    Restoring,
    Anonymous,
    Authenticated(Identity),
}

/// Single source of truth for "who is logged in". Constructed once at
/// startup and handed to the guard, the gateway wiring and the console by
/// `Arc`; the store is the only component that persists or clears the token
/// (the gateway clears it too, but only on the 401 path).
pub struct SessionStore {
    tokens: Arc<dyn TokenStore>,
    auth: Arc<dyn AuthApi>,
    state: RwLock<SessionState>,
}

impl SessionStore {
    pub fn new(tokens: Arc<dyn TokenStore>, auth: Arc<dyn AuthApi>) -> Arc<Self> {
        Arc::new(Self { tokens, auth, state: RwLock::new(SessionState::Restoring) })
    }

    pub fn state(&self) -> SessionState { self.state.read().clone() }

    pub fn is_restoring(&self) -> bool { matches!(*self.state.read(), SessionState::Restoring) }

    pub fn identity(&self) -> Option<Identity> {
        match &*self.state.read() {
            SessionState::Authenticated(id) => Some(id.clone()),
            _ => None,
        }
    }

    /// Attempt to rebuild the session from the persisted token. Never fails:
    /// any problem (missing token, network error, 401, bad payload) resolves
    /// to Anonymous with the token cleared, and the app renders the login
    /// view. Idempotent: a re-check runs the same fetch and swaps the state
    /// only at the end, so no Anonymous flicker is observable in between.
    pub async fn restore(&self) {
        let next = match self.tokens.load() {
            None => {
                debug!("session.restore: no persisted token");
                SessionState::Anonymous
            }
            Some(token) => match self.auth.fetch_identity(&token).await {
                Ok(identity) => {
                    info!("session.restore: identity restored for {}", identity.email);
                    SessionState::Authenticated(identity)
                }
                Err(e) => {
                    warn!("session.restore: identity fetch failed ({}), clearing token", e);
                    self.tokens.clear();
                    SessionState::Anonymous
                }
            },
        };
        *self.state.write() = next;
    }

    /// Authenticate against the server. On success the returned token is
    /// persisted (overwriting any previous one) and the identity is set. On
    /// failure the server's error payload is propagated untouched and the
    /// session state is left as it was; presenting the message is the login
    /// view's job. A token that cannot be persisted is a failure too: a
    /// session that silently would not survive a restart is worse than a
    /// visible storage error.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<Identity> {
        let reply = self.auth.login(email, password).await?;
        if let Err(e) = self.tokens.save(&reply.access_token) {
            warn!("session.login: token persist failed: {}", e);
            return Err(AppError::storage("token_persist".to_string(), e.to_string()));
        }
        *self.state.write() = SessionState::Authenticated(reply.user.clone());
        info!("session.login: {} logged in", reply.user.email);
        Ok(reply.user)
    }

    /// Synchronous, infallible, no server round-trip.
    pub fn logout(&self) {
        self.tokens.clear();
        *self.state.write() = SessionState::Anonymous;
        info!("session.logout");
    }

    /// The mid-session auth-failure path (expired/revoked token observed as a
    /// 401 anywhere). Identical effect to logout; wired as the gateway's
    /// unauthorized hook so no page has to handle token expiry itself.
    pub fn invalidate(&self) {
        self.tokens.clear();
        *self.state.write() = SessionState::Anonymous;
        warn!("session.invalidate: token rejected by server");
    }

    pub fn has_permission(&self, key: &str) -> bool {
        match self.identity() {
            None => false,
            Some(id) => is_unrestricted(&id) || id.permissions.iter().any(|p| p == key),
        }
    }

    /// The page a restricted user lands on after login: first permission in
    /// server order with a known route mapping; "/" for anonymous or
    /// unrestricted identities.
    pub fn default_landing_page(&self) -> &'static str {
        routes::default_landing(self.identity().as_ref())
    }
}
