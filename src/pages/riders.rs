use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use super::{fetch_list, fetch_one, ListQuery, Paginated};
use crate::error::AppResult;
use crate::gateway::ApiGateway;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rider {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub active: bool,
    #[serde(default)]
    pub deliveries_completed: u64,
    #[serde(default)]
    pub wallet_balance: f64,
    pub created_at: DateTime<Utc>,
}

pub async fn list(gw: &ApiGateway, q: &ListQuery) -> AppResult<Paginated<Rider>> {
    fetch_list(gw, "/admin/riders", q).await
}

pub async fn detail(gw: &ApiGateway, id: &str) -> AppResult<Rider> {
    fetch_one(gw, &format!("/admin/riders/{}", id)).await
}

pub async fn set_active(gw: &ApiGateway, id: &str, active: bool) -> AppResult<()> {
    gw.patch_json(&format!("/admin/riders/{}/activation", id), &json!({"active": active}))
        .await?;
    Ok(())
}

pub fn columns() -> &'static [&'static str] {
    &["id", "name", "phone", "active", "deliveries", "wallet"]
}

pub fn row(r: &Rider) -> Vec<String> {
    vec![
        r.id.clone(),
        r.name.clone(),
        r.phone.clone().unwrap_or_default(),
        r.active.to_string(),
        r.deliveries_completed.to_string(),
        format!("{:.2}", r.wallet_balance),
    ]
}
