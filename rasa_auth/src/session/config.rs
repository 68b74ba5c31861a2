use std::sync::LazyLock;

const DEFAULT_SESSION_COOKIE_NAME: &str = "admin_session";

/// Seven days.
const DEFAULT_SESSION_COOKIE_MAX_AGE: u64 = 7 * 24 * 60 * 60;

/// Browsers cap cookie lifetimes at 400 days.
const MAX_SESSION_COOKIE_MAX_AGE: u64 = 400 * 24 * 60 * 60;

pub static SESSION_COOKIE_NAME: LazyLock<String> = LazyLock::new(|| {
    parse_session_cookie_name(std::env::var("SESSION_COOKIE_NAME").ok().as_deref())
});

/// Lifetime of a session in seconds, used both for `expires_at` and the cookie `Max-Age`.
pub static SESSION_COOKIE_MAX_AGE: LazyLock<u64> = LazyLock::new(|| {
    parse_session_cookie_max_age(std::env::var("SESSION_COOKIE_MAX_AGE").ok().as_deref())
});

/// Number of random bytes in a session token; hex encoding doubles the length.
pub(super) const SESSION_TOKEN_BYTES: usize = 32;

fn parse_session_cookie_name(value: Option<&str>) -> String {
    match value {
        Some(name) if is_valid_cookie_name(name) => name.to_string(),
        Some(name) => {
            tracing::warn!(
                "Ignoring invalid SESSION_COOKIE_NAME {:?}, using {}",
                name,
                DEFAULT_SESSION_COOKIE_NAME
            );
            DEFAULT_SESSION_COOKIE_NAME.to_string()
        }
        None => DEFAULT_SESSION_COOKIE_NAME.to_string(),
    }
}

fn parse_session_cookie_max_age(value: Option<&str>) -> u64 {
    value
        .and_then(|s| s.trim().parse().ok())
        .filter(|secs: &u64| (1..=MAX_SESSION_COOKIE_MAX_AGE).contains(secs))
        .unwrap_or(DEFAULT_SESSION_COOKIE_MAX_AGE)
}

// RFC 6265 token characters
fn is_valid_cookie_name(name: &str) -> bool {
    !name.is_empty()
        && name.bytes().all(|b| {
            b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
        })
}
