//! Orders across all verticals. Status values and legal transitions are
//! owned by the server; this page only filters, displays and dispatches.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use super::{fetch_list, fetch_one, ListQuery, Paginated};
use crate::error::AppResult;
use crate::gateway::ApiGateway;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub customer_name: String,
    pub vendor_name: String,
    pub vertical: String,
    pub status: String,
    pub total: f64,
    pub created_at: DateTime<Utc>,
}

pub async fn list(gw: &ApiGateway, q: &ListQuery) -> AppResult<Paginated<Order>> {
    fetch_list(gw, "/admin/orders", q).await
}

pub async fn detail(gw: &ApiGateway, id: &str) -> AppResult<Order> {
    fetch_one(gw, &format!("/admin/orders/{}", id)).await
}

/// Dispatch a status change; the server validates the transition and rejects
/// illegal ones with a payload the page surfaces as-is.
pub async fn update_status(gw: &ApiGateway, id: &str, status: &str) -> AppResult<()> {
    gw.patch_json(&format!("/admin/orders/{}/status", id), &json!({"status": status}))
        .await?;
    Ok(())
}

pub fn columns() -> &'static [&'static str] {
    &["id", "customer", "vendor", "vertical", "status", "total", "placed"]
}

pub fn row(o: &Order) -> Vec<String> {
    vec![
        o.id.clone(),
        o.customer_name.clone(),
        o.vendor_name.clone(),
        o.vertical.clone(),
        o.status.clone(),
        format!("{:.2}", o.total),
        o.created_at.format("%Y-%m-%d %H:%M").to_string(),
    ]
}
