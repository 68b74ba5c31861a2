use std::sync::Arc;

use rasa_auth::AuthStore;

/// Shared state for the auth routes and extractors.
///
/// Applications with their own state implement `FromRef<AppState> for AuthState`.
#[derive(Clone)]
pub struct AuthState {
    pub store: Arc<dyn AuthStore>,
}

impl AuthState {
    pub fn new(store: Arc<dyn AuthStore>) -> Self {
        Self { store }
    }
}
