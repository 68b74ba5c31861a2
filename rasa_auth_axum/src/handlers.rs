use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use http::{HeaderMap, StatusCode};
use serde_json::{Value, json};

use super::error::{IntoResponseError, json_error};
use super::session::AuthAdmin;
use super::state::AuthState;
use rasa_auth::{CoordinationError, LoginRequest, login_core, logout_core};

type JsonResult = Result<(HeaderMap, Json<Value>), (StatusCode, Json<Value>)>;

pub(super) async fn login(
    State(state): State<AuthState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> JsonResult {
    // An unreadable body is treated like one without credentials
    let Json(request) = payload.unwrap_or_default();

    match login_core(&*state.store, &request.email, &request.password).await {
        Ok((user, headers)) => Ok((
            headers,
            Json(json!({
                "success": true,
                "user": {
                    "id": user.id,
                    "email": user.email,
                    "name": user.name,
                },
            })),
        )),
        Err(CoordinationError::MissingCredentials) => Err(json_error((
            StatusCode::BAD_REQUEST,
            "Email and password are required".to_string(),
        ))),
        Err(CoordinationError::InvalidCredentials) => Err(json_error((
            StatusCode::UNAUTHORIZED,
            "Invalid credentials".to_string(),
        ))),
        Err(_) => Err(json_error((
            StatusCode::INTERNAL_SERVER_ERROR,
            "Login failed".to_string(),
        ))),
    }
}

pub(super) async fn logout(State(state): State<AuthState>, headers: HeaderMap) -> JsonResult {
    let response_headers = logout_core(&*state.store, &headers)
        .await
        .into_response_error()
        .map_err(json_error)?;
    Ok((response_headers, Json(json!({ "success": true }))))
}

pub(super) async fn me(
    admin: Option<AuthAdmin>,
) -> Result<Json<AuthAdmin>, (StatusCode, Json<Value>)> {
    admin
        .map(Json)
        .ok_or_else(|| json_error((StatusCode::UNAUTHORIZED, "Not authenticated".to_string())))
}
