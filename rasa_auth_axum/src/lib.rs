//! rasa_auth_axum - Axum integration for rasa_auth
//!
//! Provides the login/logout/me router, the [`AuthAdmin`] extractor and route
//! layers that guard admin pages.

mod config;
mod error;
mod handlers;
mod middleware;
mod router;
mod session;
mod state;

#[cfg(test)]
mod test_utils;

pub use config::RASA_LOGIN_URL;
pub use error::IntoResponseError;
pub use middleware::{is_authenticated_401, is_authenticated_redirect};
pub use router::{rasa_auth_router, rasa_auth_router_no_trace};
pub use session::{AuthAdmin, AuthRejection};
pub use state::AuthState;

// Re-export the route prefix from the core crate
pub use rasa_auth::RASA_AUTH_ROUTE_PREFIX;
