use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

use super::config::{DB_TABLE_ADMIN_SESSIONS, DB_TABLE_ADMIN_USERS};
use super::errors::StorageError;
use super::schema_validation::validate_sqlite_table_schema;
use super::types::{SessionRecord, SessionStore};

#[derive(Clone, Debug)]
pub struct SqliteStore {
    pub(crate) pool: SqlitePool,
}

impl SqliteStore {
    /// Connects to a SQLite database, creating the file if missing.
    ///
    /// In-memory URLs get a single long-lived connection so every query sees
    /// the same database.
    pub async fn connect(url: &str) -> Result<Self, StorageError> {
        let opts = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = if url.contains(":memory:") || url.contains("mode=memory") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(opts)
                .await?
        } else {
            SqlitePool::connect_lazy_with(opts)
        };

        Ok(Self { pool })
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

pub(super) async fn create_session_tables_sqlite(pool: &SqlitePool) -> Result<(), StorageError> {
    let table_name = DB_TABLE_ADMIN_SESSIONS.as_str();
    let users_table = DB_TABLE_ADMIN_USERS.as_str();

    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {table_name} (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            token TEXT NOT NULL UNIQUE,
            user_id INTEGER NOT NULL REFERENCES {users_table}(id) ON DELETE CASCADE,
            expires_at TIMESTAMP NOT NULL,
            created_at TIMESTAMP NOT NULL
        )
        "#
    ))
    .execute(pool)
    .await?;

    sqlx::query(&format!(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_{table_name}_token ON {table_name}(token)"
    ))
    .execute(pool)
    .await?;

    sqlx::query(&format!(
        "CREATE INDEX IF NOT EXISTS idx_{table_name}_expires ON {table_name}(expires_at)"
    ))
    .execute(pool)
    .await?;

    sqlx::query(&format!(
        "CREATE INDEX IF NOT EXISTS idx_{table_name}_user ON {table_name}(user_id)"
    ))
    .execute(pool)
    .await?;

    Ok(())
}

async fn validate_session_tables_sqlite(pool: &SqlitePool) -> Result<(), StorageError> {
    let expected_columns = [
        ("id", "INTEGER"),
        ("token", "TEXT"),
        ("user_id", "INTEGER"),
        ("expires_at", "TIMESTAMP"),
        ("created_at", "TIMESTAMP"),
    ];

    validate_sqlite_table_schema(
        pool,
        DB_TABLE_ADMIN_SESSIONS.as_str(),
        &expected_columns,
        StorageError::Storage,
    )
    .await
}

#[async_trait]
impl SessionStore for SqliteStore {
    async fn init_sessions(&self) -> Result<(), StorageError> {
        create_session_tables_sqlite(&self.pool).await?;
        validate_session_tables_sqlite(&self.pool).await
    }

    async fn insert_session(&self, record: &SessionRecord) -> Result<(), StorageError> {
        let table_name = DB_TABLE_ADMIN_SESSIONS.as_str();

        sqlx::query(&format!(
            r#"
            INSERT INTO {table_name} (token, user_id, expires_at, created_at)
            VALUES (?, ?, ?, ?)
            "#
        ))
        .bind(&record.token)
        .bind(record.user_id)
        .bind(record.expires_at)
        .bind(record.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_session(&self, token: &str) -> Result<Option<SessionRecord>, StorageError> {
        let table_name = DB_TABLE_ADMIN_SESSIONS.as_str();

        let record = sqlx::query_as::<_, SessionRecord>(&format!(
            r#"
            SELECT token, user_id, expires_at, created_at FROM {table_name} WHERE token = ?
            "#
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn delete_session(&self, token: &str) -> Result<(), StorageError> {
        let table_name = DB_TABLE_ADMIN_SESSIONS.as_str();

        sqlx::query(&format!("DELETE FROM {table_name} WHERE token = ?"))
            .bind(token)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete_sessions_by_user(&self, user_id: i64) -> Result<u64, StorageError> {
        let table_name = DB_TABLE_ADMIN_SESSIONS.as_str();

        let result = sqlx::query(&format!("DELETE FROM {table_name} WHERE user_id = ?"))
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn delete_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64, StorageError> {
        let table_name = DB_TABLE_ADMIN_SESSIONS.as_str();

        let result = sqlx::query(&format!("DELETE FROM {table_name} WHERE expires_at <= ?"))
            .bind(now)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn list_sessions_by_user(
        &self,
        user_id: i64,
    ) -> Result<Vec<SessionRecord>, StorageError> {
        let table_name = DB_TABLE_ADMIN_SESSIONS.as_str();

        let records = sqlx::query_as::<_, SessionRecord>(&format!(
            r#"
            SELECT token, user_id, expires_at, created_at FROM {table_name}
            WHERE user_id = ? ORDER BY created_at ASC
            "#
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::userdb::{AdminUserStore, NewAdminUser};
    use chrono::Duration;

    async fn store_with_user() -> (SqliteStore, i64) {
        let store = SqliteStore::connect("sqlite::memory:").await.unwrap();
        store.init_users().await.unwrap();
        store.init_sessions().await.unwrap();

        let user = store
            .insert_user(NewAdminUser::new(
                "admin@example.com",
                "salt:digest",
                Some("Admin".to_string()),
            ))
            .await
            .unwrap();
        (store, user.id)
    }

    fn record(token: &str, user_id: i64, expires_at: DateTime<Utc>) -> SessionRecord {
        SessionRecord {
            token: token.to_string(),
            user_id,
            expires_at,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_init_is_idempotent() {
        let (store, _) = store_with_user().await;
        assert!(store.init_sessions().await.is_ok());
    }

    #[tokio::test]
    async fn test_insert_get_delete() {
        // Given a store with one admin user
        let (store, user_id) = store_with_user().await;
        let rec = record("sqlite-token", user_id, Utc::now() + Duration::days(7));

        // When inserting a session
        store.insert_session(&rec).await.unwrap();

        // Then it can be fetched by exact token
        let fetched = store.get_session("sqlite-token").await.unwrap().unwrap();
        assert_eq!(fetched.user_id, user_id);
        assert_eq!(fetched.expires_at, rec.expires_at);
        assert!(store.get_session("sqlite-tok").await.unwrap().is_none());

        // And deleting it twice is fine
        store.delete_session("sqlite-token").await.unwrap();
        store.delete_session("sqlite-token").await.unwrap();
        assert!(store.get_session("sqlite-token").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_token_fails() {
        let (store, user_id) = store_with_user().await;
        let rec = record("dup", user_id, Utc::now() + Duration::days(1));
        store.insert_session(&rec).await.unwrap();
        assert!(store.insert_session(&rec).await.is_err());
    }

    #[tokio::test]
    async fn test_unknown_user_rejected_by_foreign_key() {
        let (store, _) = store_with_user().await;
        let rec = record("orphan", 9999, Utc::now() + Duration::days(1));
        assert!(store.insert_session(&rec).await.is_err());
    }

    #[tokio::test]
    async fn test_delete_expired_and_by_user() {
        let (store, user_id) = store_with_user().await;
        let now = Utc::now();
        store
            .insert_session(&record("expired", user_id, now - Duration::minutes(5)))
            .await
            .unwrap();
        store
            .insert_session(&record("live-1", user_id, now + Duration::days(1)))
            .await
            .unwrap();
        store
            .insert_session(&record("live-2", user_id, now + Duration::days(2)))
            .await
            .unwrap();

        assert_eq!(store.delete_expired_sessions(now).await.unwrap(), 1);
        assert_eq!(store.list_sessions_by_user(user_id).await.unwrap().len(), 2);

        assert_eq!(store.delete_sessions_by_user(user_id).await.unwrap(), 2);
        assert!(store.list_sessions_by_user(user_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_deleting_user_cascades_to_sessions() {
        let (store, user_id) = store_with_user().await;
        store
            .insert_session(&record("cascade", user_id, Utc::now() + Duration::days(1)))
            .await
            .unwrap();

        store.delete_user(user_id).await.unwrap();

        assert!(store.get_session("cascade").await.unwrap().is_none());
    }
}
