//! Page controllers: one module per vertical, all following the same
//! fetch-paginated-list / render / dispatch-mutation / refetch pattern. All
//! business rules (verification, commissions, wallet balances, order state
//! transitions) are server-side; these modules only display and dispatch.

pub mod analytics;
pub mod boutiques;
pub mod customers;
pub mod dashboard;
pub mod farmers;
pub mod orders;
pub mod payments;
pub mod restaurants;
pub mod riders;
pub mod users;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::gateway::ApiGateway;

/// Server-side page of results. `total` is the full row count so the console
/// can show "page X of Y".
#[derive(Debug, Clone, Deserialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: u32,
    #[serde(rename = "perPage")]
    pub per_page: u32,
    pub total: u64,
}

impl<T> Paginated<T> {
    pub fn page_count(&self) -> u32 {
        if self.per_page == 0 {
            return 1;
        }
        (self.total.div_ceil(self.per_page as u64)).max(1) as u32
    }

    pub fn has_next(&self) -> bool { self.page < self.page_count() }
    pub fn has_prev(&self) -> bool { self.page > 1 }
}

/// List-view parameters shared by every page: 1-based page number, page size,
/// free-text search and page-specific filters.
#[derive(Debug, Clone)]
pub struct ListQuery {
    pub page: u32,
    pub per_page: u32,
    pub search: Option<String>,
    pub filters: Vec<(String, String)>,
}

impl ListQuery {
    pub fn new(per_page: u32) -> Self {
        Self { page: 1, per_page, search: None, filters: Vec::new() }
    }

    pub fn pairs(&self) -> Vec<(String, String)> {
        let mut q = vec![
            ("page".to_string(), self.page.to_string()),
            ("perPage".to_string(), self.per_page.to_string()),
        ];
        if let Some(s) = &self.search {
            if !s.is_empty() {
                q.push(("search".to_string(), s.clone()));
            }
        }
        for (k, v) in &self.filters {
            q.push((k.clone(), v.clone()));
        }
        q
    }

    pub fn with_search(mut self, text: &str) -> Self {
        self.search = if text.is_empty() { None } else { Some(text.to_string()) };
        self.page = 1;
        self
    }

    pub fn with_filter(mut self, key: &str, value: &str) -> Self {
        self.filters.retain(|(k, _)| k != key);
        self.filters.push((key.to_string(), value.to_string()));
        self.page = 1;
        self
    }
}

/// Shared list fetch: GET the endpoint with the query pairs and decode a
/// typed page out of the JSON.
pub async fn fetch_list<T: DeserializeOwned>(
    gw: &ApiGateway,
    path: &str,
    q: &ListQuery,
) -> AppResult<Paginated<T>> {
    let val = gw.get_json(path, &q.pairs()).await?;
    serde_json::from_value(val)
        .map_err(|e| AppError::parse("bad_list_payload".to_string(), format!("{}: {}", path, e)))
}

/// Shared detail fetch.
pub async fn fetch_one<T: DeserializeOwned>(gw: &ApiGateway, path: &str) -> AppResult<T> {
    let val = gw.get_json(path, &[]).await?;
    serde_json::from_value(val)
        .map_err(|e| AppError::parse("bad_detail_payload".to_string(), format!("{}: {}", path, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_count_rounds_up_and_never_hits_zero() {
        let p = Paginated::<i32> { items: vec![], page: 1, per_page: 20, total: 41 };
        assert_eq!(p.page_count(), 3);
        assert!(p.has_next());
        assert!(!p.has_prev());

        let empty = Paginated::<i32> { items: vec![], page: 1, per_page: 20, total: 0 };
        assert_eq!(empty.page_count(), 1);
        assert!(!empty.has_next());
    }

    #[test]
    fn query_pairs_skip_empty_search_and_replace_filters() {
        let q = ListQuery::new(20).with_search("").with_filter("status", "pending").with_filter("status", "paid");
        let pairs = q.pairs();
        assert!(pairs.iter().all(|(k, _)| k != "search"));
        let statuses: Vec<&str> = pairs.iter().filter(|(k, _)| k == "status").map(|(_, v)| v.as_str()).collect();
        assert_eq!(statuses, vec!["paid"]);
    }
}
