use http::header::{COOKIE, HeaderMap, HeaderValue, SET_COOKIE};

use crate::session::config::{SESSION_COOKIE_MAX_AGE, SESSION_COOKIE_NAME};
use crate::session::errors::SessionError;

/// Builds the `Set-Cookie` value that hands a session token to the browser.
///
/// `admin_session=<token>; Path=/; HttpOnly; Secure; SameSite=Strict; Max-Age=604800`
pub fn encode_session_cookie(token: &str) -> String {
    build_cookie(SESSION_COOKIE_NAME.as_str(), token, *SESSION_COOKIE_MAX_AGE)
}

/// Builds the `Set-Cookie` value that makes the browser drop the session cookie.
pub fn clear_session_cookie() -> String {
    build_cookie(SESSION_COOKIE_NAME.as_str(), "", 0)
}

/// Extracts the session token from a raw `Cookie` request header.
///
/// The cookie name must match exactly; empty values are skipped.
pub fn decode_session_cookie(raw_cookie_header: &str) -> Option<String> {
    find_cookie(raw_cookie_header, SESSION_COOKIE_NAME.as_str())
}

/// Looks for the session token across every `Cookie` header of a request.
pub fn session_token_from_headers(headers: &HeaderMap) -> Option<String> {
    let token = headers.get_all(COOKIE).iter().find_map(|value| {
        match value.to_str() {
            Ok(raw) => decode_session_cookie(raw),
            Err(_) => {
                tracing::debug!("Skipping non-ASCII cookie header");
                None
            }
        }
    });

    if token.is_none() {
        tracing::debug!("No session cookie '{}' found", SESSION_COOKIE_NAME.as_str());
    }

    token
}

/// Appends a `Set-Cookie` header.
pub fn header_set_cookie(headers: &mut HeaderMap, cookie: &str) -> Result<(), SessionError> {
    let value = HeaderValue::from_str(cookie)
        .map_err(|_| SessionError::HeaderError("Failed to parse cookie".to_string()))?;
    headers.append(SET_COOKIE, value);
    Ok(())
}

fn build_cookie(name: &str, value: &str, max_age: u64) -> String {
    format!("{name}={value}; Path=/; HttpOnly; Secure; SameSite=Strict; Max-Age={max_age}")
}

fn find_cookie(raw_cookie_header: &str, name: &str) -> Option<String> {
    raw_cookie_header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        if key.trim() != name {
            return None;
        }
        let value = value.trim();
        let value = value
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .unwrap_or(value);
        (!value.is_empty()).then(|| value.to_string())
    })
}
