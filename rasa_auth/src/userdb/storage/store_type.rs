use async_trait::async_trait;

use crate::userdb::{
    errors::UserError,
    types::{AdminUser, NewAdminUser},
};

/// Persistence for admin accounts, keyed by id with a unique email.
#[async_trait]
pub trait AdminUserStore: Send + Sync {
    /// Create tables if missing and validate their schema.
    async fn init_users(&self) -> Result<(), UserError>;

    async fn get_user(&self, id: i64) -> Result<Option<AdminUser>, UserError>;

    /// Looks the email up after trimming and lower-casing it.
    async fn get_user_by_email(&self, email: &str) -> Result<Option<AdminUser>, UserError>;

    /// Fails with `UserError::DuplicateEmail` if the email is taken.
    async fn insert_user(&self, user: NewAdminUser) -> Result<AdminUser, UserError>;

    /// Overwrites email, password hash, name and active flag, bumping `updated_at`.
    /// Fails with `UserError::NotFound` for an unknown id.
    async fn update_user(&self, user: &AdminUser) -> Result<AdminUser, UserError>;

    /// Deleting a missing user is not an error. Sessions of the user go with it.
    async fn delete_user(&self, id: i64) -> Result<(), UserError>;

    async fn list_users(&self) -> Result<Vec<AdminUser>, UserError>;
}
