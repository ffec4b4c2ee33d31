//! Analytics page. The browser UI charts these series; the console renders
//! the raw points as a table, which keeps the endpoint contract identical.

use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::gateway::ApiGateway;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenuePoint {
    pub date: String,
    pub orders: u64,
    pub revenue: f64,
    #[serde(default)]
    pub commission: f64,
}

pub async fn revenue(gw: &ApiGateway, days: u32) -> AppResult<Vec<RevenuePoint>> {
    let val = gw
        .get_json("/admin/analytics/revenue", &[("days".to_string(), days.to_string())])
        .await?;
    serde_json::from_value(val)
        .map_err(|e| AppError::parse("bad_analytics_payload".to_string(), e.to_string()))
}

pub fn columns() -> &'static [&'static str] { &["date", "orders", "revenue", "commission"] }

pub fn row(p: &RevenuePoint) -> Vec<String> {
    vec![
        p.date.clone(),
        p.orders.to_string(),
        format!("{:.2}", p.revenue),
        format!("{:.2}", p.commission),
    ]
}
