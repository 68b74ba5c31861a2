use http::header::HeaderMap;
use serde::Deserialize;

use crate::credential::verify_password;
use crate::session::{
    SessionUser, clear_session_cookie, create_session, encode_session_cookie,
    get_admin_from_session, header_set_cookie, revoke_session, session_token_from_headers,
};
use crate::storage::AuthStore;

use super::errors::CoordinationError;

/// JSON body of a login request. Absent fields deserialize as empty strings.
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Checks an email/password pair and opens a session.
///
/// Returns the logged-in admin and the headers carrying the session cookie.
/// An unknown email, an inactive account and a wrong password all fail with
/// the same `InvalidCredentials`.
#[tracing::instrument(skip(store, password))]
pub async fn login_core<S>(
    store: &S,
    email: &str,
    password: &str,
) -> Result<(SessionUser, HeaderMap), CoordinationError>
where
    S: AuthStore + ?Sized,
{
    if email.trim().is_empty() || password.is_empty() {
        return Err(CoordinationError::MissingCredentials.log());
    }

    let user = store
        .get_user_by_email(email)
        .await?
        .ok_or_else(|| CoordinationError::InvalidCredentials.log())?;

    if !user.is_active {
        tracing::debug!("Login attempt for inactive user {}", user.id);
        return Err(CoordinationError::InvalidCredentials.log());
    }

    if !verify_password(password, &user.password_hash) {
        return Err(CoordinationError::InvalidCredentials.log());
    }

    let token = create_session(store, user.id).await?;

    let mut headers = HeaderMap::new();
    header_set_cookie(&mut headers, &encode_session_cookie(token.as_str()))?;

    tracing::info!("Admin {} logged in", user.id);
    Ok((SessionUser::from(user), headers))
}

/// Revokes the session named by the request's cookie, if any, and returns the
/// headers that clear the cookie.
///
/// A store failure while deleting the session is returned as an error; the
/// cookie is only cleared once the session is gone.
#[tracing::instrument(skip_all)]
pub async fn logout_core<S>(
    store: &S,
    request_headers: &HeaderMap,
) -> Result<HeaderMap, CoordinationError>
where
    S: AuthStore + ?Sized,
{
    if let Some(token) = session_token_from_headers(request_headers) {
        revoke_session(store, &token).await?;
        tracing::info!("Session revoked on logout");
    }

    let mut headers = HeaderMap::new();
    header_set_cookie(&mut headers, &clear_session_cookie())?;
    Ok(headers)
}

/// Resolves the admin behind the request's session cookie.
pub async fn authenticate_request<S>(
    store: &S,
    request_headers: &HeaderMap,
) -> Result<Option<SessionUser>, CoordinationError>
where
    S: AuthStore + ?Sized,
{
    let Some(token) = session_token_from_headers(request_headers) else {
        return Ok(None);
    };
    Ok(get_admin_from_session(store, &token).await?)
}
