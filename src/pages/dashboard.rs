//! Root landing page: one summary call, rendered as a two-column table.

use serde::Deserialize;

use super::fetch_one;
use crate::error::AppResult;
use crate::gateway::ApiGateway;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub farmers: u64,
    pub restaurants: u64,
    pub boutiques: u64,
    pub riders: u64,
    pub customers: u64,
    pub orders_today: u64,
    pub revenue_today: f64,
    #[serde(default)]
    pub pending_verifications: u64,
}

pub async fn summary(gw: &ApiGateway) -> AppResult<Summary> {
    fetch_one(gw, "/admin/dashboard/summary").await
}

pub fn columns() -> &'static [&'static str] { &["metric", "value"] }

pub fn rows(s: &Summary) -> Vec<Vec<String>> {
    vec![
        vec!["farmers".into(), s.farmers.to_string()],
        vec!["restaurants".into(), s.restaurants.to_string()],
        vec!["boutiques".into(), s.boutiques.to_string()],
        vec!["riders".into(), s.riders.to_string()],
        vec!["customers".into(), s.customers.to_string()],
        vec!["orders today".into(), s.orders_today.to_string()],
        vec!["revenue today".into(), format!("{:.2}", s.revenue_today)],
        vec!["pending verifications".into(), s.pending_verifications.to_string()],
    ]
}
