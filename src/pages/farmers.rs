//! Farmers vertical: registered farm sellers, their verification state and
//! wallet balance (computed server-side, displayed here).

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use super::{fetch_list, fetch_one, ListQuery, Paginated};
use crate::error::AppResult;
use crate::gateway::ApiGateway;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Farmer {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub farm_name: String,
    pub verified: bool,
    #[serde(default)]
    pub wallet_balance: f64,
    pub created_at: DateTime<Utc>,
}

pub async fn list(gw: &ApiGateway, q: &ListQuery) -> AppResult<Paginated<Farmer>> {
    fetch_list(gw, "/admin/farmers", q).await
}

pub async fn detail(gw: &ApiGateway, id: &str) -> AppResult<Farmer> {
    fetch_one(gw, &format!("/admin/farmers/{}", id)).await
}

/// Dispatch a verification decision; the workflow itself runs server-side.
pub async fn set_verified(gw: &ApiGateway, id: &str, verified: bool) -> AppResult<()> {
    gw.patch_json(&format!("/admin/farmers/{}/verification", id), &json!({"verified": verified}))
        .await?;
    Ok(())
}

pub fn columns() -> &'static [&'static str] {
    &["id", "name", "farm", "email", "verified", "wallet", "joined"]
}

pub fn row(f: &Farmer) -> Vec<String> {
    vec![
        f.id.clone(),
        f.name.clone(),
        f.farm_name.clone(),
        f.email.clone(),
        f.verified.to_string(),
        format!("{:.2}", f.wallet_balance),
        f.created_at.format("%Y-%m-%d").to_string(),
    ]
}
