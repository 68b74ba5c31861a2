use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis::AsyncCommands;
use std::sync::Arc;

use crate::userdb::{AdminUser, AdminUserStore, NewAdminUser, UserError};

use super::errors::StorageError;
use super::types::{SessionRecord, SessionStore};

const CACHE_PREFIX: &str = "rasa";

/// Session storage in Redis.
///
/// Each session lives under `rasa:session:<token>` with a TTL equal to its
/// remaining lifetime, and its token is added to the `rasa:user_sessions:<id>`
/// set so a user's sessions can be found without scanning. The set expires no
/// earlier than the longest-lived session it indexes.
pub struct RedisSessionStore {
    client: redis::Client,
}

impl RedisSessionStore {
    pub fn connect(url: &str) -> Result<Self, StorageError> {
        let client = redis::Client::open(url)?;
        Ok(Self { client })
    }

    fn session_key(token: &str) -> String {
        format!("{CACHE_PREFIX}:session:{token}")
    }

    fn user_key(user_id: i64) -> String {
        format!("{CACHE_PREFIX}:user_sessions:{user_id}")
    }
}

/// New TTL for a user's session set after adding a session that lives for
/// `session_ttl` seconds, or `None` to keep the current one.
///
/// `current` is the Redis `TTL` reply: -1 for no expiry, -2 for a missing key.
fn extended_index_ttl(current: i64, session_ttl: i64) -> Option<i64> {
    (current < session_ttl).then_some(session_ttl)
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn init_sessions(&self) -> Result<(), StorageError> {
        // Verify the connection works
        let _conn = self.client.get_multiplexed_async_connection().await?;
        Ok(())
    }

    async fn insert_session(&self, record: &SessionRecord) -> Result<(), StorageError> {
        let ttl = (record.expires_at - Utc::now()).num_seconds();
        if ttl <= 0 {
            tracing::debug!("Not storing a session that is already expired");
            return Ok(());
        }

        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let key = Self::session_key(&record.token);
        let value = serde_json::to_string(record)?;

        let stored: bool = conn.set_nx(&key, value).await?;
        if !stored {
            return Err(StorageError::Storage(
                "Session token already exists".to_string(),
            ));
        }
        let _: () = conn.expire(&key, ttl).await?;

        let user_key = Self::user_key(record.user_id);
        let _: () = conn.sadd(&user_key, &record.token).await?;

        let current: i64 = conn.ttl(&user_key).await?;
        if let Some(index_ttl) = extended_index_ttl(current, ttl) {
            let _: () = conn.expire(&user_key, index_ttl).await?;
        }

        Ok(())
    }

    async fn get_session(&self, token: &str) -> Result<Option<SessionRecord>, StorageError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let value: Option<String> = conn.get(Self::session_key(token)).await?;

        match value {
            Some(v) => Ok(Some(serde_json::from_str(&v)?)),
            None => Ok(None),
        }
    }

    async fn delete_session(&self, token: &str) -> Result<(), StorageError> {
        let Some(record) = self.get_session(token).await? else {
            return Ok(());
        };

        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _: () = conn.del(Self::session_key(token)).await?;
        let _: () = conn.srem(Self::user_key(record.user_id), token).await?;
        Ok(())
    }

    async fn delete_sessions_by_user(&self, user_id: i64) -> Result<u64, StorageError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let user_key = Self::user_key(user_id);
        let tokens: Vec<String> = conn.smembers(&user_key).await?;

        let mut removed = 0u64;
        for token in &tokens {
            let deleted: u64 = conn.del(Self::session_key(token)).await?;
            removed += deleted;
        }
        let _: () = conn.del(&user_key).await?;

        Ok(removed)
    }

    async fn delete_expired_sessions(&self, _now: DateTime<Utc>) -> Result<u64, StorageError> {
        // Redis drops expired keys on its own
        Ok(0)
    }

    async fn list_sessions_by_user(
        &self,
        user_id: i64,
    ) -> Result<Vec<SessionRecord>, StorageError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let user_key = Self::user_key(user_id);
        let tokens: Vec<String> = conn.smembers(&user_key).await?;

        let mut records = Vec::with_capacity(tokens.len());
        for token in tokens {
            let value: Option<String> = conn.get(Self::session_key(&token)).await?;
            match value {
                Some(v) => records.push(serde_json::from_str::<SessionRecord>(&v)?),
                None => {
                    // Key expired, prune the index entry
                    let _: () = conn.srem(&user_key, &token).await?;
                }
            }
        }
        records.sort_by_key(|record| record.created_at);
        Ok(records)
    }
}

/// Sessions from one backend, admin users from another.
pub struct CompositeStore {
    sessions: Arc<dyn SessionStore>,
    users: Arc<dyn AdminUserStore>,
}

impl CompositeStore {
    pub fn new(sessions: Arc<dyn SessionStore>, users: Arc<dyn AdminUserStore>) -> Self {
        Self { sessions, users }
    }
}

#[async_trait]
impl SessionStore for CompositeStore {
    async fn init_sessions(&self) -> Result<(), StorageError> {
        self.sessions.init_sessions().await
    }

    async fn insert_session(&self, record: &SessionRecord) -> Result<(), StorageError> {
        self.sessions.insert_session(record).await
    }

    async fn get_session(&self, token: &str) -> Result<Option<SessionRecord>, StorageError> {
        self.sessions.get_session(token).await
    }

    async fn delete_session(&self, token: &str) -> Result<(), StorageError> {
        self.sessions.delete_session(token).await
    }

    async fn delete_sessions_by_user(&self, user_id: i64) -> Result<u64, StorageError> {
        self.sessions.delete_sessions_by_user(user_id).await
    }

    async fn delete_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64, StorageError> {
        self.sessions.delete_expired_sessions(now).await
    }

    async fn list_sessions_by_user(
        &self,
        user_id: i64,
    ) -> Result<Vec<SessionRecord>, StorageError> {
        self.sessions.list_sessions_by_user(user_id).await
    }
}

#[async_trait]
impl AdminUserStore for CompositeStore {
    async fn init_users(&self) -> Result<(), UserError> {
        self.users.init_users().await
    }

    async fn get_user(&self, id: i64) -> Result<Option<AdminUser>, UserError> {
        self.users.get_user(id).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<AdminUser>, UserError> {
        self.users.get_user_by_email(email).await
    }

    async fn insert_user(&self, user: NewAdminUser) -> Result<AdminUser, UserError> {
        self.users.insert_user(user).await
    }

    async fn update_user(&self, user: &AdminUser) -> Result<AdminUser, UserError> {
        self.users.update_user(user).await
    }

    async fn delete_user(&self, id: i64) -> Result<(), UserError> {
        // Sessions may live in a different backend, so cascade by hand
        self.sessions
            .delete_sessions_by_user(id)
            .await
            .map_err(|e| UserError::Storage(e.to_string()))?;
        self.users.delete_user(id).await
    }

    async fn list_users(&self) -> Result<Vec<AdminUser>, UserError> {
        self.users.list_users().await
    }
}
