use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use super::{fetch_list, fetch_one, ListQuery, Paginated};
use crate::error::AppResult;
use crate::gateway::ApiGateway;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub blocked: bool,
    #[serde(default)]
    pub order_count: u64,
    pub created_at: DateTime<Utc>,
}

pub async fn list(gw: &ApiGateway, q: &ListQuery) -> AppResult<Paginated<Customer>> {
    fetch_list(gw, "/admin/customers", q).await
}

pub async fn detail(gw: &ApiGateway, id: &str) -> AppResult<Customer> {
    fetch_one(gw, &format!("/admin/customers/{}", id)).await
}

pub async fn set_blocked(gw: &ApiGateway, id: &str, blocked: bool) -> AppResult<()> {
    gw.patch_json(&format!("/admin/customers/{}/block", id), &json!({"blocked": blocked}))
        .await?;
    Ok(())
}

pub fn columns() -> &'static [&'static str] {
    &["id", "name", "email", "blocked", "orders", "joined"]
}

pub fn row(c: &Customer) -> Vec<String> {
    vec![
        c.id.clone(),
        c.name.clone(),
        c.email.clone(),
        c.blocked.to_string(),
        c.order_count.to_string(),
        c.created_at.format("%Y-%m-%d").to_string(),
    ]
}
