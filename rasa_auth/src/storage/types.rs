use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::userdb::AdminUserStore;

use super::errors::StorageError;

/// A persisted session row.
///
/// `user_id` is a plain reference to an admin user; the session table does not
/// own the user.
#[derive(Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct SessionRecord {
    pub token: String,
    pub user_id: i64,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl SessionRecord {
    /// True while `now` is strictly before `expires_at`.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

impl std::fmt::Debug for SessionRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRecord")
            .field("token", &"<redacted>")
            .field("user_id", &self.user_id)
            .field("expires_at", &self.expires_at)
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Persistence for session records, keyed by token with a secondary index on user id.
///
/// Single-row operations are expected to be atomic in the backing store.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Create tables or verify connectivity. Safe to call more than once.
    async fn init_sessions(&self) -> Result<(), StorageError>;

    async fn insert_session(&self, record: &SessionRecord) -> Result<(), StorageError>;

    /// Exact-match lookup by token. Expired rows are returned as-is.
    async fn get_session(&self, token: &str) -> Result<Option<SessionRecord>, StorageError>;

    /// Deleting a missing token is not an error.
    async fn delete_session(&self, token: &str) -> Result<(), StorageError>;

    /// Returns the number of sessions removed.
    async fn delete_sessions_by_user(&self, user_id: i64) -> Result<u64, StorageError>;

    /// Removes rows with `expires_at <= now`, returning how many were removed.
    async fn delete_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64, StorageError>;

    async fn list_sessions_by_user(&self, user_id: i64)
    -> Result<Vec<SessionRecord>, StorageError>;
}

/// Everything the auth flows need from persistence: sessions plus admin users.
pub trait AuthStore: SessionStore + AdminUserStore {}

impl<T: SessionStore + AdminUserStore + ?Sized> AuthStore for T {}
