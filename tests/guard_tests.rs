use std::sync::Arc;

use async_trait::async_trait;

use agora::error::{AppError, AppResult};
use agora::guard::{NavDecision, RouteGuard};
use agora::session::{AuthApi, Identity, LoginReply, MemoryTokenStore, SessionStore};

struct FixedAuth {
    identity: Identity,
}

#[async_trait]
impl AuthApi for FixedAuth {
    async fn login(&self, _email: &str, _password: &str) -> AppResult<LoginReply> {
        Ok(LoginReply { access_token: "T".into(), user: self.identity.clone() })
    }

    async fn fetch_identity(&self, token: &str) -> AppResult<Identity> {
        if token == "T" {
            Ok(self.identity.clone())
        } else {
            Err(AppError::from_response(401, "{}".into()))
        }
    }
}

fn identity(perms: &[&str]) -> Identity {
    Identity {
        name: "Ada Admin".into(),
        email: "ada@agora.test".into(),
        role: "admin".into(),
        permissions: perms.iter().map(|s| s.to_string()).collect(),
    }
}

/// Guard over a store seeded with a token; `restore` has NOT run yet.
fn restoring_guard(perms: &[&str]) -> (RouteGuard, Arc<SessionStore>) {
    let store = SessionStore::new(
        Arc::new(MemoryTokenStore::with_token("T")),
        Arc::new(FixedAuth { identity: identity(perms) }),
    );
    (RouteGuard::new(store.clone()), store)
}

async fn authenticated_guard(perms: &[&str]) -> (RouteGuard, Arc<SessionStore>) {
    let (guard, store) = restoring_guard(perms);
    store.restore().await;
    (guard, store)
}

async fn anonymous_guard() -> (RouteGuard, Arc<SessionStore>) {
    let store = SessionStore::new(
        Arc::new(MemoryTokenStore::new()),
        Arc::new(FixedAuth { identity: identity(&[]) }),
    );
    store.restore().await;
    (RouteGuard::new(store.clone()), store)
}

#[tokio::test]
async fn restoring_session_always_yields_loading() {
    let (guard, _store) = restoring_guard(&["orders"]);
    // No redirects while the restore is in flight, whatever the path.
    for path in ["/", "/login", "/orders", "/nowhere"] {
        assert_eq!(guard.decide(path), NavDecision::Loading, "path {}", path);
    }
}

#[tokio::test]
async fn anonymous_navigation_funnels_to_login() {
    let (guard, _store) = anonymous_guard().await;
    assert_eq!(guard.decide("/login"), NavDecision::RenderLogin);
    for path in ["/", "/orders", "/users", "/nowhere"] {
        assert_eq!(guard.decide(path), NavDecision::RedirectToLogin, "path {}", path);
    }
}

#[tokio::test]
async fn authorized_paths_render_with_their_permission() {
    let (guard, _store) = authenticated_guard(&["orders", "payments"]).await;
    assert_eq!(
        guard.decide("/orders"),
        NavDecision::Render { path: "/orders", permission: Some("orders") }
    );
    assert_eq!(
        guard.decide("/payments"),
        NavDecision::Render { path: "/payments", permission: Some("payments") }
    );
}

#[tokio::test]
async fn root_renders_for_any_authenticated_admin() {
    let (guard, _store) = authenticated_guard(&["orders"]).await;
    assert_eq!(guard.decide("/"), NavDecision::Render { path: "/", permission: None });
}

#[tokio::test]
async fn unauthorized_path_redirects_silently_to_own_landing() {
    let (guard, _store) = authenticated_guard(&["orders"]).await;
    // Not an error view: the user is sent to their own first page.
    assert_eq!(guard.decide("/users"), NavDecision::Redirect { to: "/orders".into() });
}

#[tokio::test]
async fn unknown_path_redirects_like_an_unauthorized_one() {
    let (guard, _store) = authenticated_guard(&["payments"]).await;
    assert_eq!(guard.decide("/reports"), NavDecision::Redirect { to: "/payments".into() });
    assert_eq!(guard.decide("/orders/123"), NavDecision::Redirect { to: "/payments".into() });
}

#[tokio::test]
async fn authenticated_user_on_login_route_is_sent_home() {
    let (guard, _store) = authenticated_guard(&["riders"]).await;
    assert_eq!(guard.decide("/login"), NavDecision::Redirect { to: "/riders".into() });
}

#[tokio::test]
async fn unrestricted_admin_renders_every_known_page() {
    let (guard, _store) = authenticated_guard(&[]).await;
    for path in ["/", "/farmers", "/restaurants", "/boutiques", "/riders", "/customers", "/orders", "/payments", "/analytics", "/users"] {
        assert!(
            matches!(guard.decide(path), NavDecision::Render { .. }),
            "unrestricted admin blocked from {}",
            path
        );
    }
}

#[tokio::test]
async fn logout_mid_session_flips_decisions_back_to_login() {
    let (guard, store) = authenticated_guard(&["orders"]).await;
    assert!(matches!(guard.decide("/orders"), NavDecision::Render { .. }));

    store.logout();
    assert_eq!(guard.decide("/orders"), NavDecision::RedirectToLogin);
    assert_eq!(guard.decide("/login"), NavDecision::RenderLogin);
}
