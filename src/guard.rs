//! Per-navigation route gate. Re-evaluated on every route change and on every
//! session state change; there is no terminal state.

use std::sync::Arc;

use tracing::debug;

use crate::routes::{self, LOGIN_ROUTE};
use crate::session::SessionStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavDecision {
    /// Session restore has not completed; render a neutral waiting view and
    /// do not redirect. Redirecting here would flash an authenticated user
    /// through the login screen.
    Loading,
    /// Unauthenticated navigation to the login route: render the login view.
    RenderLogin,
    /// Unauthenticated navigation anywhere else.
    RedirectToLogin,
    /// Authenticated and authorized: render the page inside the
    /// authenticated chrome. `permission` is None for the root route.
    Render { path: &'static str, permission: Option<&'static str> },
    /// Authenticated but not authorized, or an unknown path: silent redirect
    /// to the user's own landing page. Deliberately not an error view.
    Redirect { to: String },
}

pub struct RouteGuard {
    session: Arc<SessionStore>,
}

impl RouteGuard {
    pub fn new(session: Arc<SessionStore>) -> Self { Self { session } }

    pub fn decide(&self, path: &str) -> NavDecision {
        if self.session.is_restoring() {
            return NavDecision::Loading;
        }

        let authenticated = self.session.identity().is_some();
        if !authenticated {
            return if path == LOGIN_ROUTE { NavDecision::RenderLogin } else { NavDecision::RedirectToLogin };
        }

        // Authenticated users have no business on the login route.
        if path == LOGIN_ROUTE {
            return NavDecision::Redirect { to: self.session.default_landing_page().to_string() };
        }

        // Catch-all: unknown paths resolve like an unauthorized known path.
        let Some(known_path) = routes::PERMISSION_ROUTES
            .iter()
            .find(|(_, p)| *p == path)
            .map(|(_, p)| *p)
        else {
            debug!("guard: unknown path {}, redirecting to landing", path);
            return NavDecision::Redirect { to: self.session.default_landing_page().to_string() };
        };

        match routes::permission_for(known_path) {
            None => NavDecision::Render { path: known_path, permission: None },
            Some(key) if self.session.has_permission(key) => {
                NavDecision::Render { path: known_path, permission: Some(key) }
            }
            Some(key) => {
                debug!("guard: missing permission {} for {}, redirecting", key, path);
                NavDecision::Redirect { to: self.session.default_landing_page().to_string() }
            }
        }
    }
}
