//! Store double whose session and user halves can be switched to fail.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::storage::{InMemoryStore, SessionRecord, SessionStore, StorageError};
use crate::userdb::{AdminUser, AdminUserStore, NewAdminUser, UserError};

#[derive(Default)]
pub(crate) struct FailingStore {
    inner: InMemoryStore,
    fail_sessions: AtomicBool,
    fail_users: AtomicBool,
}

impl FailingStore {
    pub(crate) fn fail_sessions(&self, fail: bool) {
        self.fail_sessions.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn fail_users(&self, fail: bool) {
        self.fail_users.store(fail, Ordering::SeqCst);
    }

    fn check_sessions(&self) -> Result<(), StorageError> {
        if self.fail_sessions.load(Ordering::SeqCst) {
            return Err(StorageError::Storage("session store down".to_string()));
        }
        Ok(())
    }

    fn check_users(&self) -> Result<(), UserError> {
        if self.fail_users.load(Ordering::SeqCst) {
            return Err(UserError::Storage("user store down".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl SessionStore for FailingStore {
    async fn init_sessions(&self) -> Result<(), StorageError> {
        self.check_sessions()
    }

    async fn insert_session(&self, record: &SessionRecord) -> Result<(), StorageError> {
        self.check_sessions()?;
        self.inner.insert_session(record).await
    }

    async fn get_session(&self, token: &str) -> Result<Option<SessionRecord>, StorageError> {
        self.check_sessions()?;
        self.inner.get_session(token).await
    }

    async fn delete_session(&self, token: &str) -> Result<(), StorageError> {
        self.check_sessions()?;
        self.inner.delete_session(token).await
    }

    async fn delete_sessions_by_user(&self, user_id: i64) -> Result<u64, StorageError> {
        self.check_sessions()?;
        self.inner.delete_sessions_by_user(user_id).await
    }

    async fn delete_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64, StorageError> {
        self.check_sessions()?;
        self.inner.delete_expired_sessions(now).await
    }

    async fn list_sessions_by_user(
        &self,
        user_id: i64,
    ) -> Result<Vec<SessionRecord>, StorageError> {
        self.check_sessions()?;
        self.inner.list_sessions_by_user(user_id).await
    }
}

#[async_trait]
impl AdminUserStore for FailingStore {
    async fn init_users(&self) -> Result<(), UserError> {
        self.check_users()
    }

    async fn get_user(&self, id: i64) -> Result<Option<AdminUser>, UserError> {
        self.check_users()?;
        self.inner.get_user(id).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<AdminUser>, UserError> {
        self.check_users()?;
        self.inner.get_user_by_email(email).await
    }

    async fn insert_user(&self, user: NewAdminUser) -> Result<AdminUser, UserError> {
        self.check_users()?;
        self.inner.insert_user(user).await
    }

    async fn update_user(&self, user: &AdminUser) -> Result<AdminUser, UserError> {
        self.check_users()?;
        self.inner.update_user(user).await
    }

    async fn delete_user(&self, id: i64) -> Result<(), UserError> {
        self.check_users()?;
        self.inner.delete_user(id).await
    }

    async fn list_users(&self) -> Result<Vec<AdminUser>, UserError> {
        self.check_users()?;
        self.inner.list_users().await
    }
}
