use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::userdb::MemoryUserTable;

use super::errors::StorageError;
use super::types::{SessionRecord, SessionStore};

/// Process-local store for sessions and admin users.
///
/// Used by tests and by the demo when no database is configured. Deleting a
/// user also drops that user's sessions, like the `ON DELETE CASCADE` of the
/// SQL backends.
pub struct InMemoryStore {
    pub(crate) sessions: RwLock<HashMap<String, SessionRecord>>,
    pub(crate) users: RwLock<MemoryUserTable>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        tracing::info!("Creating new in-memory auth store");
        Self {
            sessions: RwLock::new(HashMap::new()),
            users: RwLock::new(MemoryUserTable::default()),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemoryStore {
    async fn init_sessions(&self) -> Result<(), StorageError> {
        Ok(())
    }

    async fn insert_session(&self, record: &SessionRecord) -> Result<(), StorageError> {
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&record.token) {
            return Err(StorageError::Storage(
                "UNIQUE constraint failed: session token".to_string(),
            ));
        }
        sessions.insert(record.token.clone(), record.clone());
        Ok(())
    }

    async fn get_session(&self, token: &str) -> Result<Option<SessionRecord>, StorageError> {
        Ok(self.sessions.read().await.get(token).cloned())
    }

    async fn delete_session(&self, token: &str) -> Result<(), StorageError> {
        self.sessions.write().await.remove(token);
        Ok(())
    }

    async fn delete_sessions_by_user(&self, user_id: i64) -> Result<u64, StorageError> {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, record| record.user_id != user_id);
        Ok((before - sessions.len()) as u64)
    }

    async fn delete_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64, StorageError> {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, record| record.is_active_at(now));
        Ok((before - sessions.len()) as u64)
    }

    async fn list_sessions_by_user(
        &self,
        user_id: i64,
    ) -> Result<Vec<SessionRecord>, StorageError> {
        let sessions = self.sessions.read().await;
        let mut records: Vec<SessionRecord> = sessions
            .values()
            .filter(|record| record.user_id == user_id)
            .cloned()
            .collect();
        records.sort_by_key(|record| record.created_at);
        Ok(records)
    }
}
