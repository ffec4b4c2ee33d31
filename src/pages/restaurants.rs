//! Restaurants vertical: verification plus the open/closed toggle.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use super::{fetch_list, fetch_one, ListQuery, Paginated};
use crate::error::AppResult;
use crate::gateway::ApiGateway;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub cuisine: Option<String>,
    pub verified: bool,
    pub open: bool,
    #[serde(default)]
    pub commission_rate: f64,
    pub created_at: DateTime<Utc>,
}

pub async fn list(gw: &ApiGateway, q: &ListQuery) -> AppResult<Paginated<Restaurant>> {
    fetch_list(gw, "/admin/restaurants", q).await
}

pub async fn detail(gw: &ApiGateway, id: &str) -> AppResult<Restaurant> {
    fetch_one(gw, &format!("/admin/restaurants/{}", id)).await
}

pub async fn set_verified(gw: &ApiGateway, id: &str, verified: bool) -> AppResult<()> {
    gw.patch_json(&format!("/admin/restaurants/{}/verification", id), &json!({"verified": verified}))
        .await?;
    Ok(())
}

pub async fn set_open(gw: &ApiGateway, id: &str, open: bool) -> AppResult<()> {
    gw.patch_json(&format!("/admin/restaurants/{}/availability", id), &json!({"open": open}))
        .await?;
    Ok(())
}

pub fn columns() -> &'static [&'static str] {
    &["id", "name", "cuisine", "email", "verified", "open", "commission"]
}

pub fn row(r: &Restaurant) -> Vec<String> {
    vec![
        r.id.clone(),
        r.name.clone(),
        r.cuisine.clone().unwrap_or_default(),
        r.email.clone(),
        r.verified.to_string(),
        r.open.to_string(),
        format!("{:.1}%", r.commission_rate * 100.0),
    ]
}
