//! Admin user management. Permission sequences are edited here; order
//! matters because the first mapped key is the user's landing page.

use serde::Deserialize;
use serde_json::json;

use super::{fetch_list, fetch_one, ListQuery, Paginated};
use crate::error::AppResult;
use crate::gateway::ApiGateway;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    #[serde(default)]
    pub permissions: Vec<String>,
}

pub async fn list(gw: &ApiGateway, q: &ListQuery) -> AppResult<Paginated<AdminUser>> {
    fetch_list(gw, "/admin/users", q).await
}

pub async fn detail(gw: &ApiGateway, id: &str) -> AppResult<AdminUser> {
    fetch_one(gw, &format!("/admin/users/{}", id)).await
}

/// Replace the user's permission sequence wholesale, preserving the given
/// order. An empty sequence grants unrestricted access (legacy sentinel).
pub async fn set_permissions(gw: &ApiGateway, id: &str, permissions: &[String]) -> AppResult<()> {
    gw.put_json(&format!("/admin/users/{}/permissions", id), &json!({"permissions": permissions}))
        .await?;
    Ok(())
}

pub fn columns() -> &'static [&'static str] { &["id", "name", "email", "role", "permissions"] }

pub fn row(u: &AdminUser) -> Vec<String> {
    let perms = if u.permissions.is_empty() { "(all)".to_string() } else { u.permissions.join(",") };
    vec![u.id.clone(), u.name.clone(), u.email.clone(), u.role.clone(), perms]
}
