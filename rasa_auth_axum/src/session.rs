use axum::{
    extract::{FromRef, FromRequestParts, OptionalFromRequestParts},
    response::{IntoResponse, Redirect, Response},
};
use chrono::{DateTime, Utc};
use http::{Method, StatusCode, request::Parts};
use serde::Serialize;

use super::config::RASA_LOGIN_URL;
use super::state::AuthState;
use rasa_auth::{SessionUser, authenticate_request};

/// Rejection for [`AuthAdmin`].
#[derive(Debug, PartialEq)]
pub enum AuthRejection {
    /// Send the browser to `RASA_LOGIN_URL`
    Redirect,
    Unauthorized,
    /// The session could not be checked because the store failed
    Internal,
}

impl AuthRejection {
    /// Unauthenticated GETs are redirected to the login page; other methods get 401.
    pub fn unauthenticated(method: &Method) -> Self {
        if method == Method::GET {
            Self::Redirect
        } else {
            Self::Unauthorized
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Redirect => {
                tracing::debug!("Redirecting to {}", RASA_LOGIN_URL.as_str());
                Redirect::temporary(RASA_LOGIN_URL.as_str()).into_response()
            }
            Self::Unauthorized => {
                tracing::debug!("Unauthorized");
                (StatusCode::UNAUTHORIZED, "Unauthorized").into_response()
            }
            Self::Internal => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

/// Authenticated admin, available as an Axum extractor
///
/// Reads the session cookie, validates the session and loads the admin it
/// belongs to. Inactive and deleted admins are treated as logged out.
///
/// ```no_run
/// use axum::{routing::get, Router};
/// use rasa_auth_axum::{AuthAdmin, AuthState};
///
/// async fn dashboard(admin: AuthAdmin) -> String {
///     format!("Hello, {}!", admin.email)
/// }
///
/// fn app(state: AuthState) -> Router {
///     Router::new().route("/admin", get(dashboard)).with_state(state)
/// }
/// ```
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct AuthAdmin {
    pub id: i64,
    pub email: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<SessionUser> for AuthAdmin {
    fn from(user: SessionUser) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

async fn admin_from_parts(
    parts: &Parts,
    state: &AuthState,
) -> Result<Option<AuthAdmin>, AuthRejection> {
    authenticate_request(&*state.store, &parts.headers)
        .await
        .map(|user| user.map(AuthAdmin::from))
        .map_err(|e| {
            tracing::error!("Failed to check admin session: {}", e);
            AuthRejection::Internal
        })
}

impl<S> FromRequestParts<S> for AuthAdmin
where
    AuthState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AuthState::from_ref(state);
        admin_from_parts(parts, &state)
            .await?
            .ok_or_else(|| AuthRejection::unauthenticated(&parts.method))
    }
}

impl<S> OptionalFromRequestParts<S> for AuthAdmin
where
    AuthState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        let state = AuthState::from_ref(state);
        admin_from_parts(parts, &state).await
    }
}
