use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use super::{fetch_list, fetch_one, ListQuery, Paginated};
use crate::error::AppResult;
use crate::gateway::ApiGateway;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: String,
    pub order_id: String,
    pub method: String,
    pub status: String,
    pub amount: f64,
    #[serde(default)]
    pub commission: f64,
    pub created_at: DateTime<Utc>,
}

pub async fn list(gw: &ApiGateway, q: &ListQuery) -> AppResult<Paginated<Payment>> {
    fetch_list(gw, "/admin/payments", q).await
}

pub async fn detail(gw: &ApiGateway, id: &str) -> AppResult<Payment> {
    fetch_one(gw, &format!("/admin/payments/{}", id)).await
}

pub async fn mark_settled(gw: &ApiGateway, id: &str) -> AppResult<()> {
    gw.patch_json(&format!("/admin/payments/{}/settle", id), &json!({})).await?;
    Ok(())
}

pub fn columns() -> &'static [&'static str] {
    &["id", "order", "method", "status", "amount", "commission"]
}

pub fn row(p: &Payment) -> Vec<String> {
    vec![
        p.id.clone(),
        p.order_id.clone(),
        p.method.clone(),
        p.status.clone(),
        format!("{:.2}", p.amount),
        format!("{:.2}", p.commission),
    ]
}
