use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rasa_auth::{
    AdminUser, AdminUserStore, InMemoryStore, NewAdminUser, SESSION_COOKIE_NAME, SessionRecord,
    SessionStore, StorageError, UserError, create_admin_user, create_session,
};

use crate::state::AuthState;

pub(crate) const ADMIN_EMAIL: &str = "admin@example.com";
pub(crate) const ADMIN_PASSWORD: &str = "correct-pw";

/// State holding one admin plus a `Cookie` header value for a live session of theirs.
pub(crate) async fn state_with_admin() -> (AuthState, String) {
    let store = Arc::new(InMemoryStore::new());
    let admin = create_admin_user(&*store, ADMIN_EMAIL, ADMIN_PASSWORD, Some("Admin".into()))
        .await
        .unwrap();
    let token = create_session(&*store, admin.id).await.unwrap();

    (AuthState::new(store), session_cookie(token.as_str()))
}

/// State whose store fails every call, plus a well-formed session cookie.
pub(crate) fn unavailable_state() -> (AuthState, String) {
    let cookie = session_cookie(&"ab".repeat(32));
    (AuthState::new(Arc::new(UnavailableStore)), cookie)
}

fn session_cookie(token: &str) -> String {
    format!("{}={}", SESSION_COOKIE_NAME.as_str(), token)
}

/// Store whose every operation fails as if the database were down.
pub(crate) struct UnavailableStore;

fn storage_down() -> StorageError {
    StorageError::Storage("connection refused".to_string())
}

fn users_down() -> UserError {
    UserError::Storage("connection refused".to_string())
}

#[async_trait]
impl SessionStore for UnavailableStore {
    async fn init_sessions(&self) -> Result<(), StorageError> {
        Err(storage_down())
    }

    async fn insert_session(&self, _record: &SessionRecord) -> Result<(), StorageError> {
        Err(storage_down())
    }

    async fn get_session(&self, _token: &str) -> Result<Option<SessionRecord>, StorageError> {
        Err(storage_down())
    }

    async fn delete_session(&self, _token: &str) -> Result<(), StorageError> {
        Err(storage_down())
    }

    async fn delete_sessions_by_user(&self, _user_id: i64) -> Result<u64, StorageError> {
        Err(storage_down())
    }

    async fn delete_expired_sessions(&self, _now: DateTime<Utc>) -> Result<u64, StorageError> {
        Err(storage_down())
    }

    async fn list_sessions_by_user(
        &self,
        _user_id: i64,
    ) -> Result<Vec<SessionRecord>, StorageError> {
        Err(storage_down())
    }
}

#[async_trait]
impl AdminUserStore for UnavailableStore {
    async fn init_users(&self) -> Result<(), UserError> {
        Err(users_down())
    }

    async fn get_user(&self, _id: i64) -> Result<Option<AdminUser>, UserError> {
        Err(users_down())
    }

    async fn get_user_by_email(&self, _email: &str) -> Result<Option<AdminUser>, UserError> {
        Err(users_down())
    }

    async fn insert_user(&self, _user: NewAdminUser) -> Result<AdminUser, UserError> {
        Err(users_down())
    }

    async fn update_user(&self, _user: &AdminUser) -> Result<AdminUser, UserError> {
        Err(users_down())
    }

    async fn delete_user(&self, _id: i64) -> Result<(), UserError> {
        Err(users_down())
    }

    async fn list_users(&self) -> Result<Vec<AdminUser>, UserError> {
        Err(users_down())
    }
}
