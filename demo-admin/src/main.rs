use std::time::Duration;

use axum::Router;
use dotenvy::dotenv;

use rasa_auth::{AuthStore, CoordinationError, StoreConfig, create_admin_user, open_store};
use rasa_auth_axum::{AuthState, RASA_AUTH_ROUTE_PREFIX, rasa_auth_router};

mod pages;
mod server;
use server::{init_tracing, spawn_http_server, spawn_session_sweeper};

const SWEEP_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Creates the admin named by `RASA_ADMIN_EMAIL` / `RASA_ADMIN_PASSWORD` if both are set.
async fn seed_admin(store: &dyn AuthStore) -> Result<(), CoordinationError> {
    let (Ok(email), Ok(password)) = (
        std::env::var("RASA_ADMIN_EMAIL"),
        std::env::var("RASA_ADMIN_PASSWORD"),
    ) else {
        tracing::info!("RASA_ADMIN_EMAIL/RASA_ADMIN_PASSWORD not set, skipping admin seed");
        return Ok(());
    };
    let name = std::env::var("RASA_ADMIN_NAME").ok();

    match create_admin_user(store, &email, &password, name).await {
        Ok(user) => {
            tracing::info!("Seeded admin user {}", user.email);
            Ok(())
        }
        Err(CoordinationError::Conflict(_)) => {
            tracing::info!("Admin user {} already exists", email);
            Ok(())
        }
        Err(e) => Err(e),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    init_tracing("demo_admin");

    let store = open_store(&StoreConfig::from_env()?).await?;
    seed_admin(&*store).await?;

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);

    let app = Router::new()
        .merge(pages::router(AuthState::new(store.clone())))
        .nest(RASA_AUTH_ROUTE_PREFIX.as_str(), rasa_auth_router(store.clone()));

    spawn_session_sweeper(store, SWEEP_INTERVAL);
    spawn_http_server(port, app).await??;
    Ok(())
}
