//! Router for the admin authentication endpoints

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use rasa_auth::AuthStore;
use tower_http::LatencyUnit;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use super::handlers::{login, logout, me};
use super::state::AuthState;

/// Create the router for the admin authentication endpoints
///
/// Mount it under `RASA_AUTH_ROUTE_PREFIX`; the endpoints are then:
/// - `POST {prefix}/login`
/// - `POST {prefix}/logout`
/// - `GET {prefix}/me`
pub fn rasa_auth_router(store: Arc<dyn AuthStore>) -> Router {
    rasa_auth_router_no_trace(store).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(
                DefaultOnResponse::new()
                    .level(Level::INFO)
                    .latency_unit(LatencyUnit::Millis),
            ),
    )
}

/// Same as [`rasa_auth_router`] without the HTTP tracing middleware.
pub fn rasa_auth_router_no_trace(store: Arc<dyn AuthStore>) -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(me))
        .with_state(AuthState::new(store))
}
