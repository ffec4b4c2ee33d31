//! HTTP client for the Agora REST API. Every outgoing request goes through
//! here so bearer-token injection and the global 401 policy live in exactly
//! one place; page controllers never touch token logic.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::{RequestBuilder, Response, Url};
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::session::{AuthApi, Identity, LoginReply, TokenStore};

type UnauthorizedHook = Box<dyn Fn() + Send + Sync>;

pub struct ApiGateway {
    base: Url,
    client: reqwest::Client,
    tokens: Arc<dyn TokenStore>,
    on_unauthorized: RwLock<Option<UnauthorizedHook>>,
}

impl ApiGateway {
    pub fn new(base: &str, tokens: Arc<dyn TokenStore>) -> anyhow::Result<Arc<Self>> {
        let base = Url::parse(base).map_err(|e| anyhow::anyhow!("invalid base URL '{}': {}", base, e))?;
        let client = reqwest::Client::builder().build()?;
        Ok(Arc::new(Self { base, client, tokens, on_unauthorized: RwLock::new(None) }))
    }

    /// Called exactly once at wiring time with `SessionStore::invalidate`, so
    /// a 401 from any endpoint logs the whole app out.
    pub fn set_unauthorized_hook(&self, hook: impl Fn() + Send + Sync + 'static) {
        *self.on_unauthorized.write() = Some(Box::new(hook));
    }

    fn join(&self, path: &str) -> AppResult<Url> {
        self.base
            .join(path)
            .map_err(|e| AppError::internal("bad_path".to_string(), format!("cannot join '{}': {}", path, e)))
    }

    /// Attach the bearer token (when one is persisted) and a request id, then
    /// send. Does NOT apply the 401 policy; `execute` wraps this for the
    /// admin endpoints while the auth endpoints keep their own failure
    /// semantics.
    async fn send(&self, mut rb: RequestBuilder) -> AppResult<Response> {
        if let Some(token) = self.tokens.load() {
            rb = rb.bearer_auth(token);
        }
        let request_id = Uuid::new_v4();
        rb = rb.header("x-request-id", request_id.to_string());
        debug!("gateway.send request_id={}", request_id);
        Ok(rb.send().await?)
    }

    /// Send with the global auth policy: a 401 from any endpoint clears the
    /// persisted token, fires the unauthorized hook and surfaces an auth
    /// error. Every other non-success status passes the server payload
    /// through unmodified for the calling page to display.
    async fn execute(&self, rb: RequestBuilder) -> AppResult<Value> {
        let resp = self.send(rb).await?;
        let status = resp.status();
        if status.as_u16() == 401 {
            warn!("gateway: 401 received, clearing session token");
            self.tokens.clear();
            if let Some(hook) = &*self.on_unauthorized.read() {
                hook();
            }
            let body = resp.text().await.unwrap_or_default();
            return Err(AppError::from_response(401, body));
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AppError::from_response(status.as_u16(), body));
        }
        let val = resp.json::<Value>().await?;
        Ok(val)
    }

    pub async fn get_json(&self, path: &str, query: &[(String, String)]) -> AppResult<Value> {
        let url = self.join(path)?;
        self.execute(self.client.get(url).query(query)).await
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> AppResult<Value> {
        let url = self.join(path)?;
        self.execute(self.client.post(url).json(body)).await
    }

    pub async fn put_json(&self, path: &str, body: &Value) -> AppResult<Value> {
        let url = self.join(path)?;
        self.execute(self.client.put(url).json(body)).await
    }

    pub async fn patch_json(&self, path: &str, body: &Value) -> AppResult<Value> {
        let url = self.join(path)?;
        self.execute(self.client.patch(url).json(body)).await
    }

    pub async fn delete_json(&self, path: &str) -> AppResult<Value> {
        let url = self.join(path)?;
        self.execute(self.client.delete(url)).await
    }
}

/// The auth endpoints deliberately bypass the 401 interceptor: a failed login
/// must not clear an existing session, and a failed restore is handled by the
/// session store itself.
#[async_trait]
impl AuthApi for ApiGateway {
    async fn login(&self, email: &str, password: &str) -> AppResult<LoginReply> {
        let url = self.join("/auth/login")?;
        let resp = self
            .client
            .post(url)
            .json(&serde_json::json!({"email": email, "password": password}))
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            // Server payload verbatim; the login view decides how to show it.
            let body = resp.text().await.unwrap_or_default();
            return Err(AppError::from_response(status.as_u16(), body));
        }
        let reply = resp.json::<LoginReply>().await?;
        Ok(reply)
    }

    async fn fetch_identity(&self, token: &str) -> AppResult<Identity> {
        let url = self.join("/auth/me")?;
        let resp = self.client.get(url).bearer_auth(token).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AppError::from_response(status.as_u16(), body));
        }
        let identity = resp.json::<Identity>().await?;
        Ok(identity)
    }
}
