use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use agora::error::{AppError, AppResult};
use agora::session::{
    AuthApi, Identity, LoginReply, MemoryTokenStore, SessionState, SessionStore, TokenStore,
};

// Scripted auth backend: accepts exactly one token and one credential pair,
// and counts identity fetches so idempotence is observable.
struct StubAuth {
    valid_token: &'static str,
    identity: Identity,
    fetch_calls: AtomicUsize,
}

impl StubAuth {
    fn new(valid_token: &'static str, permissions: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            valid_token,
            identity: Identity {
                name: "Ada Admin".into(),
                email: "ada@agora.test".into(),
                role: "admin".into(),
                permissions: permissions.iter().map(|s| s.to_string()).collect(),
            },
            fetch_calls: AtomicUsize::new(0),
        })
    }

    fn fetches(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthApi for StubAuth {
    async fn login(&self, email: &str, password: &str) -> AppResult<LoginReply> {
        if email == self.identity.email && password == "secret" {
            Ok(LoginReply { access_token: self.valid_token.to_string(), user: self.identity.clone() })
        } else {
            Err(AppError::from_response(401, r#"{"error":"Invalid credentials"}"#.into()))
        }
    }

    async fn fetch_identity(&self, token: &str) -> AppResult<Identity> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if token == self.valid_token {
            Ok(self.identity.clone())
        } else {
            Err(AppError::from_response(401, r#"{"error":"Token expired"}"#.into()))
        }
    }
}

fn wire(
    tokens: MemoryTokenStore,
    auth: Arc<StubAuth>,
) -> (Arc<SessionStore>, Arc<MemoryTokenStore>) {
    let tokens = Arc::new(tokens);
    let store = SessionStore::new(tokens.clone(), auth);
    (store, tokens)
}

#[tokio::test]
async fn starts_restoring_then_restores_to_anonymous_without_token() {
    let auth = StubAuth::new("T", &[]);
    let (store, _tokens) = wire(MemoryTokenStore::new(), auth.clone());

    assert_eq!(store.state(), SessionState::Restoring);
    assert!(store.is_restoring());

    store.restore().await;
    assert_eq!(store.state(), SessionState::Anonymous);
    // No token means no network round-trip at all.
    assert_eq!(auth.fetches(), 0);
}

#[tokio::test]
async fn restore_with_valid_token_authenticates_and_keeps_token() {
    let auth = StubAuth::new("T", &["orders"]);
    let (store, tokens) = wire(MemoryTokenStore::with_token("T"), auth.clone());

    store.restore().await;
    let id = store.identity().expect("authenticated");
    assert_eq!(id.email, "ada@agora.test");
    assert_eq!(tokens.load().as_deref(), Some("T"));
    assert_eq!(auth.fetches(), 1);
}

#[tokio::test]
async fn restore_with_rejected_token_clears_it_and_goes_anonymous() {
    let auth = StubAuth::new("T", &["orders"]);
    let (store, tokens) = wire(MemoryTokenStore::with_token("STALE"), auth);

    store.restore().await;
    assert_eq!(store.state(), SessionState::Anonymous);
    assert_eq!(tokens.load(), None);
}

#[tokio::test]
async fn restore_is_idempotent() {
    let auth = StubAuth::new("T", &["payments"]);
    let (store, tokens) = wire(MemoryTokenStore::with_token("T"), auth.clone());

    store.restore().await;
    store.restore().await;

    // Same observable state, same token; the re-check just fetched again.
    assert!(matches!(store.state(), SessionState::Authenticated(_)));
    assert_eq!(tokens.load().as_deref(), Some("T"));
    assert_eq!(auth.fetches(), 2);
}

#[tokio::test]
async fn login_persists_token_and_sets_identity() {
    let auth = StubAuth::new("FRESH", &["orders", "payments"]);
    let (store, tokens) = wire(MemoryTokenStore::new(), auth);
    store.restore().await;

    let id = store.login("ada@agora.test", "secret").await.expect("login ok");
    assert_eq!(id.permissions, vec!["orders", "payments"]);
    assert_eq!(tokens.load().as_deref(), Some("FRESH"));
    assert!(matches!(store.state(), SessionState::Authenticated(_)));
}

#[tokio::test]
async fn failed_login_keeps_existing_session_and_surfaces_payload_verbatim() {
    let auth = StubAuth::new("T", &["orders"]);
    let (store, tokens) = wire(MemoryTokenStore::with_token("T"), auth);
    store.restore().await;
    assert!(store.identity().is_some());

    let err = store.login("ada@agora.test", "wrong").await.expect_err("login must fail");
    assert!(err.is_auth());
    assert_eq!(err.message(), r#"{"error":"Invalid credentials"}"#);

    // The failed attempt touched nothing: same identity, same token.
    assert!(store.identity().is_some());
    assert_eq!(tokens.load().as_deref(), Some("T"));
}

struct BrokenTokenStore;

impl TokenStore for BrokenTokenStore {
    fn load(&self) -> Option<String> {
        None
    }
    fn save(&self, _token: &str) -> anyhow::Result<()> {
        anyhow::bail!("disk full")
    }
    fn clear(&self) {}
}

#[tokio::test]
async fn login_fails_loudly_when_the_token_cannot_be_persisted() {
    let auth = StubAuth::new("T", &["orders"]);
    let store = SessionStore::new(Arc::new(BrokenTokenStore), auth);
    store.restore().await;

    let err = store.login("ada@agora.test", "secret").await.expect_err("persist must fail");
    assert!(matches!(err, AppError::Storage { .. }));
    assert!(err.message().contains("disk full"));

    // No half-session that would not survive a restart.
    assert_eq!(store.state(), SessionState::Anonymous);
}

#[tokio::test]
async fn logout_clears_token_and_state_synchronously() {
    let auth = StubAuth::new("T", &[]);
    let (store, tokens) = wire(MemoryTokenStore::with_token("T"), auth);
    store.restore().await;
    assert!(store.identity().is_some());

    store.logout();
    assert_eq!(store.state(), SessionState::Anonymous);
    assert_eq!(tokens.load(), None);
}

#[tokio::test]
async fn empty_permission_sequence_grants_everything() {
    let auth = StubAuth::new("T", &[]);
    let (store, _tokens) = wire(MemoryTokenStore::with_token("T"), auth);
    store.restore().await;

    for key in ["dashboard", "farmers", "orders", "users"] {
        assert!(store.has_permission(key), "unrestricted admin lost {}", key);
    }
    assert_eq!(store.default_landing_page(), "/");
}

#[tokio::test]
async fn restricted_permissions_are_membership_checks() {
    let auth = StubAuth::new("T", &["payments", "orders"]);
    let (store, _tokens) = wire(MemoryTokenStore::with_token("T"), auth);
    store.restore().await;

    assert!(store.has_permission("payments"));
    assert!(store.has_permission("orders"));
    assert!(!store.has_permission("users"));
    // First permission in server order wins the landing page.
    assert_eq!(store.default_landing_page(), "/payments");
}

#[tokio::test]
async fn anonymous_session_has_no_permissions() {
    let auth = StubAuth::new("T", &[]);
    let (store, _tokens) = wire(MemoryTokenStore::new(), auth);
    store.restore().await;

    assert!(!store.has_permission("dashboard"));
    assert_eq!(store.default_landing_page(), "/");
}
