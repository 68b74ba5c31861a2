use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An admin account allowed to sign in to the shop back office.
#[derive(Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct AdminUser {
    /// Database-assigned identifier
    pub id: i64,
    /// Login email, stored lower-cased
    pub email: String,
    /// `<salt_hex>:<sha256_hex>` credential
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Display name
    pub name: Option<String>,
    /// Inactive admins cannot sign in and their sessions do not validate
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl std::fmt::Debug for AdminUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminUser")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("name", &self.name)
            .field("is_active", &self.is_active)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish_non_exhaustive()
    }
}

/// Fields needed to insert an admin user; the store assigns `id`.
#[derive(Clone)]
pub struct NewAdminUser {
    pub email: String,
    pub password_hash: String,
    pub name: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl NewAdminUser {
    pub fn new(email: &str, password_hash: &str, name: Option<String>) -> Self {
        Self {
            email: normalize_email(email),
            password_hash: password_hash.to_string(),
            name,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    pub(crate) fn into_user(self, id: i64) -> AdminUser {
        AdminUser {
            id,
            email: self.email,
            password_hash: self.password_hash,
            name: self.name,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.created_at,
        }
    }
}

/// Emails are matched case-insensitively by storing them trimmed and lower-cased.
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_admin_user_normalizes_email() {
        // Given an email with mixed case and whitespace
        let user = NewAdminUser::new("  Admin@Example.COM ", "salt:digest", None);

        // Then it is stored lower-cased and trimmed, active by default
        assert_eq!(user.email, "admin@example.com");
        assert!(user.is_active);
    }

    #[test]
    fn test_into_user_sets_timestamps() {
        let new_user = NewAdminUser::new("a@example.com", "salt:digest", Some("A".to_string()));
        let created_at = new_user.created_at;

        let user = new_user.into_user(5);

        assert_eq!(user.id, 5);
        assert_eq!(user.created_at, created_at);
        assert_eq!(user.updated_at, created_at);
        assert_eq!(user.name.as_deref(), Some("A"));
    }

    #[test]
    fn test_password_hash_not_serialized_or_debugged() {
        let user = NewAdminUser::new("a@example.com", "secret-salt:secret-digest", None)
            .into_user(1);

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret-digest"));
        assert!(!format!("{user:?}").contains("secret-digest"));
    }
}
