//! Central configuration for the rasa_auth_axum crate

use std::sync::LazyLock;

const DEFAULT_LOGIN_URL: &str = "/admin/login";

/// Where unauthenticated GET requests to protected pages are sent.
/// Default: "/admin/login"
pub static RASA_LOGIN_URL: LazyLock<String> =
    LazyLock::new(|| login_url(std::env::var("RASA_LOGIN_URL").ok().as_deref()));

fn login_url(env_value: Option<&str>) -> String {
    match env_value.map(str::trim) {
        Some(url) if !url.is_empty() => url.to_string(),
        _ => DEFAULT_LOGIN_URL.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_url() {
        assert_eq!(login_url(None), "/admin/login");
        assert_eq!(login_url(Some("")), "/admin/login");
        assert_eq!(login_url(Some("/signin")), "/signin");
    }
}
