//! Central configuration for the rasa_auth crate

use std::sync::LazyLock;

const DEFAULT_ROUTE_PREFIX: &str = "/api/auth";

/// Route prefix under which the login, logout and me endpoints are mounted.
///
/// Default: "/api/auth"
pub static RASA_AUTH_ROUTE_PREFIX: LazyLock<String> = LazyLock::new(route_prefix_from_env);

fn route_prefix_from_env() -> String {
    normalize_route_prefix(std::env::var("RASA_AUTH_ROUTE_PREFIX").ok().as_deref())
}

/// Ensures a single leading slash and no trailing slash.
fn normalize_route_prefix(value: Option<&str>) -> String {
    let trimmed = value.map(str::trim).unwrap_or_default().trim_matches('/');
    if trimmed.is_empty() {
        return DEFAULT_ROUTE_PREFIX.to_string();
    }
    format!("/{trimmed}")
}
