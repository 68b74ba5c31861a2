use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use http::{HeaderMap, Method};

use super::session::{AuthAdmin, AuthRejection};
use super::state::AuthState;
use rasa_auth::authenticate_request;

async fn check(
    state: &AuthState,
    headers: &HeaderMap,
    method: &Method,
) -> Result<AuthAdmin, AuthRejection> {
    match authenticate_request(&*state.store, headers).await {
        Ok(Some(user)) => Ok(AuthAdmin::from(user)),
        Ok(None) => Err(AuthRejection::unauthenticated(method)),
        Err(e) => {
            tracing::error!("Failed to check admin session: {}", e);
            Err(AuthRejection::Internal)
        }
    }
}

/// Route layer that answers 401 for any unauthenticated request.
///
/// The admin is stored in request extensions for handlers to pick up with
/// `Extension<AuthAdmin>`.
pub async fn is_authenticated_401(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Response {
    match check(&state, req.headers(), req.method()).await {
        Ok(admin) => {
            req.extensions_mut().insert(admin);
            next.run(req).await
        }
        Err(AuthRejection::Redirect) => AuthRejection::Unauthorized.into_response(),
        Err(rejection) => rejection.into_response(),
    }
}

/// Route layer that redirects unauthenticated GETs to the login page and
/// answers 401 for other methods.
pub async fn is_authenticated_redirect(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Response {
    match check(&state, req.headers(), req.method()).await {
        Ok(admin) => {
            req.extensions_mut().insert(admin);
            next.run(req).await
        }
        Err(rejection) => rejection.into_response(),
    }
}
