use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;

use crate::storage::InMemoryStore;
use crate::userdb::{
    errors::UserError,
    types::{AdminUser, NewAdminUser, normalize_email},
};

use super::store_type::AdminUserStore;

#[derive(Default)]
pub(crate) struct MemoryUserTable {
    last_id: i64,
    rows: BTreeMap<i64, AdminUser>,
}

impl MemoryUserTable {
    fn email_taken(&self, email: &str, except_id: Option<i64>) -> bool {
        self.rows
            .values()
            .any(|user| user.email == email && Some(user.id) != except_id)
    }
}

#[async_trait]
impl AdminUserStore for InMemoryStore {
    async fn init_users(&self) -> Result<(), UserError> {
        Ok(())
    }

    async fn get_user(&self, id: i64) -> Result<Option<AdminUser>, UserError> {
        Ok(self.users.read().await.rows.get(&id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<AdminUser>, UserError> {
        let email = normalize_email(email);
        Ok(self
            .users
            .read()
            .await
            .rows
            .values()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn insert_user(&self, user: NewAdminUser) -> Result<AdminUser, UserError> {
        let mut table = self.users.write().await;
        if table.email_taken(&user.email, None) {
            return Err(UserError::DuplicateEmail(user.email));
        }

        table.last_id += 1;
        let user = user.into_user(table.last_id);
        table.rows.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_user(&self, user: &AdminUser) -> Result<AdminUser, UserError> {
        let mut table = self.users.write().await;
        let email = normalize_email(&user.email);
        if table.email_taken(&email, Some(user.id)) {
            return Err(UserError::DuplicateEmail(email));
        }

        let row = table.rows.get_mut(&user.id).ok_or(UserError::NotFound)?;
        row.email = email;
        row.password_hash = user.password_hash.clone();
        row.name = user.name.clone();
        row.is_active = user.is_active;
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn delete_user(&self, id: i64) -> Result<(), UserError> {
        self.users.write().await.rows.remove(&id);
        self.sessions
            .write()
            .await
            .retain(|_, record| record.user_id != id);
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<AdminUser>, UserError> {
        Ok(self.users.read().await.rows.values().cloned().collect())
    }
}
