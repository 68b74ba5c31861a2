use askama::Template;
use axum::{
    Extension, Json, Router,
    extract::State,
    http::StatusCode,
    middleware::from_fn_with_state,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
};
use serde_json::{Value, json};

use rasa_auth::{RASA_AUTH_ROUTE_PREFIX, list_admin_sessions};
use rasa_auth_axum::{AuthAdmin, AuthState, IntoResponseError, RASA_LOGIN_URL, is_authenticated_401};

pub(super) fn router(state: AuthState) -> Router {
    Router::new()
        .route("/admin", get(dashboard))
        .route("/admin/login", get(login_page))
        .route(
            "/admin/sessions",
            get(sessions).route_layer(from_fn_with_state(state.clone(), is_authenticated_401)),
        )
        .route("/api/health", get(health))
        .with_state(state)
}

#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardTemplate<'a> {
    display_name: &'a str,
    prefix: &'a str,
    login_url: &'a str,
}

#[derive(Template)]
#[template(path = "login.html")]
struct LoginTemplate<'a> {
    prefix: &'a str,
}

fn render(template: &impl Template) -> Result<Html<String>, (StatusCode, String)> {
    template
        .render()
        .map(Html)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
}

// Anonymous GETs are redirected to RASA_LOGIN_URL by the extractor
async fn dashboard(admin: AuthAdmin) -> Result<Html<String>, (StatusCode, String)> {
    render(&DashboardTemplate {
        display_name: admin.name.as_deref().unwrap_or(&admin.email),
        prefix: RASA_AUTH_ROUTE_PREFIX.as_str(),
        login_url: RASA_LOGIN_URL.as_str(),
    })
}

async fn login_page(admin: Option<AuthAdmin>) -> Result<Response, (StatusCode, String)> {
    if admin.is_some() {
        return Ok(Redirect::to("/admin").into_response());
    }

    Ok(render(&LoginTemplate {
        prefix: RASA_AUTH_ROUTE_PREFIX.as_str(),
    })?
    .into_response())
}

async fn sessions(
    State(state): State<AuthState>,
    Extension(admin): Extension<AuthAdmin>,
) -> Result<Json<Value>, (StatusCode, String)> {
    let sessions = list_admin_sessions(&*state.store, admin.id)
        .await
        .into_response_error()?;

    let sessions: Vec<Value> = sessions
        .iter()
        .map(|s| json!({ "created_at": s.created_at, "expires_at": s.expires_at }))
        .collect();
    Ok(Json(json!({ "user_id": admin.id, "sessions": sessions })))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
