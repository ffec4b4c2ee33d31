//! The permission-key ↔ route-path table, kept in exactly one place so the
//! navigation menu, the route guard and the default-landing computation can
//! never drift apart.

use crate::session::{is_unrestricted, Identity};

pub const LOGIN_ROUTE: &str = "/login";
pub const ROOT_ROUTE: &str = "/";

/// Closed set of permission keys and the page each one gates, in navigation
/// menu order. `dashboard` maps to the root route, which itself requires no
/// permission (any authenticated admin may open it).
pub static PERMISSION_ROUTES: &[(&str, &str)] = &[
    ("dashboard", "/"),
    ("farmers", "/farmers"),
    ("restaurants", "/restaurants"),
    ("boutiques", "/boutiques"),
    ("riders", "/riders"),
    ("customers", "/customers"),
    ("orders", "/orders"),
    ("payments", "/payments"),
    ("analytics", "/analytics"),
    ("users", "/users"),
];

pub fn path_for(key: &str) -> Option<&'static str> {
    PERMISSION_ROUTES.iter().find(|(k, _)| *k == key).map(|(_, p)| *p)
}

/// Reverse lookup used by the guard: the permission a path requires. The
/// login route and the root/dashboard route carry no requirement.
pub fn permission_for(path: &str) -> Option<&'static str> {
    if path == ROOT_ROUTE || path == LOGIN_ROUTE {
        return None;
    }
    PERMISSION_ROUTES.iter().find(|(_, p)| *p == path).map(|(k, _)| *k)
}

pub fn is_known_route(path: &str) -> bool {
    path == LOGIN_ROUTE || PERMISSION_ROUTES.iter().any(|(_, p)| *p == path)
}

/// First-match-wins landing computation: scan the identity's permission
/// sequence in server order and take the first key with a route mapping.
/// Anonymous and unrestricted identities land on the root.
pub fn default_landing(identity: Option<&Identity>) -> &'static str {
    let Some(id) = identity else { return ROOT_ROUTE; };
    if is_unrestricted(id) {
        return ROOT_ROUTE;
    }
    for key in &id.permissions {
        if let Some(path) = path_for(key) {
            return path;
        }
    }
    ROOT_ROUTE
}

/// Menu entries visible to this identity, filtered through the same table
/// the guard consults.
pub fn nav_entries(identity: &Identity) -> Vec<(&'static str, &'static str)> {
    PERMISSION_ROUTES
        .iter()
        .filter(|(key, _)| is_unrestricted(identity) || identity.permissions.iter().any(|p| p == key))
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(perms: &[&str]) -> Identity {
        Identity {
            name: "Test Admin".into(),
            email: "admin@agora.test".into(),
            role: "admin".into(),
            permissions: perms.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn table_is_a_bijection() {
        // Every nav key gates exactly one path and every gated path has
        // exactly one nav key; drift here breaks the guard or the menu.
        for (key, path) in PERMISSION_ROUTES {
            assert_eq!(path_for(key), Some(*path));
            if *path != ROOT_ROUTE {
                assert_eq!(permission_for(path), Some(*key), "path {} lost its key", path);
            }
        }
        let mut keys: Vec<&str> = PERMISSION_ROUTES.iter().map(|(k, _)| *k).collect();
        let mut paths: Vec<&str> = PERMISSION_ROUTES.iter().map(|(_, p)| *p).collect();
        keys.sort();
        keys.dedup();
        paths.sort();
        paths.dedup();
        assert_eq!(keys.len(), PERMISSION_ROUTES.len());
        assert_eq!(paths.len(), PERMISSION_ROUTES.len());
    }

    #[test]
    fn root_and_login_require_no_permission() {
        assert_eq!(permission_for(ROOT_ROUTE), None);
        assert_eq!(permission_for(LOGIN_ROUTE), None);
        assert_eq!(permission_for("/orders"), Some("orders"));
        assert_eq!(permission_for("/nowhere"), None);
        assert!(!is_known_route("/nowhere"));
    }

    #[test]
    fn landing_is_first_match_in_server_order() {
        // Order of the permission sequence decides, not table order.
        assert_eq!(default_landing(Some(&identity(&["orders", "payments"]))), "/orders");
        assert_eq!(default_landing(Some(&identity(&["payments", "orders"]))), "/payments");
        // Unknown keys are skipped, not fatal
        assert_eq!(default_landing(Some(&identity(&["reports", "riders"]))), "/riders");
        // No mapped key at all falls back to root
        assert_eq!(default_landing(Some(&identity(&["reports"]))), ROOT_ROUTE);
    }

    #[test]
    fn landing_for_anonymous_and_unrestricted_is_root() {
        assert_eq!(default_landing(None), ROOT_ROUTE);
        assert_eq!(default_landing(Some(&identity(&[]))), ROOT_ROUTE);
    }

    #[test]
    fn nav_filtering_uses_the_same_table() {
        let full = nav_entries(&identity(&[]));
        assert_eq!(full.len(), PERMISSION_ROUTES.len());

        let narrow = nav_entries(&identity(&["orders", "payments"]));
        let keys: Vec<&str> = narrow.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec!["orders", "payments"]);
    }
}
