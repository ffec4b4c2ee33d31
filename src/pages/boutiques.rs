use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use super::{fetch_list, fetch_one, ListQuery, Paginated};
use crate::error::AppResult;
use crate::gateway::ApiGateway;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Boutique {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub category: Option<String>,
    pub verified: bool,
    #[serde(default)]
    pub product_count: u32,
    pub created_at: DateTime<Utc>,
}

pub async fn list(gw: &ApiGateway, q: &ListQuery) -> AppResult<Paginated<Boutique>> {
    fetch_list(gw, "/admin/boutiques", q).await
}

pub async fn detail(gw: &ApiGateway, id: &str) -> AppResult<Boutique> {
    fetch_one(gw, &format!("/admin/boutiques/{}", id)).await
}

pub async fn set_verified(gw: &ApiGateway, id: &str, verified: bool) -> AppResult<()> {
    gw.patch_json(&format!("/admin/boutiques/{}/verification", id), &json!({"verified": verified}))
        .await?;
    Ok(())
}

pub fn columns() -> &'static [&'static str] {
    &["id", "name", "category", "email", "verified", "products"]
}

pub fn row(b: &Boutique) -> Vec<String> {
    vec![
        b.id.clone(),
        b.name.clone(),
        b.category.clone().unwrap_or_default(),
        b.email.clone(),
        b.verified.to_string(),
        b.product_count.to_string(),
    ]
}
