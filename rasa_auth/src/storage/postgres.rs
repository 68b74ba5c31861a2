use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::config::{DB_TABLE_ADMIN_SESSIONS, DB_TABLE_ADMIN_USERS};
use super::errors::StorageError;
use super::schema_validation::validate_postgres_table_schema;
use super::types::{SessionRecord, SessionStore};

#[derive(Clone, Debug)]
pub struct PostgresStore {
    pub(crate) pool: PgPool,
}

impl PostgresStore {
    /// Creates a lazily connecting pool; the first query opens the connection.
    pub fn connect(url: &str) -> Result<Self, StorageError> {
        let pool = PgPool::connect_lazy(url)?;
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

async fn create_session_tables_postgres(pool: &PgPool) -> Result<(), StorageError> {
    let table_name = DB_TABLE_ADMIN_SESSIONS.as_str();
    let users_table = DB_TABLE_ADMIN_USERS.as_str();

    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {table_name} (
            id BIGSERIAL PRIMARY KEY,
            token TEXT NOT NULL UNIQUE,
            user_id BIGINT NOT NULL REFERENCES {users_table}(id) ON DELETE CASCADE,
            expires_at TIMESTAMPTZ NOT NULL,
            created_at TIMESTAMPTZ NOT NULL
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

async fn validate_session_tables_postgres(pool: &PgPool) -> Result<(), StorageError> {
    let expected_columns = [
        ("id", "bigint"),
        ("token", "text"),
        ("user_id", "bigint"),
        ("expires_at", "timestamp with time zone"),
        ("created_at", "timestamp with time zone"),
    ];

    validate_postgres_table_schema(
        pool,
        DB_TABLE_ADMIN_SESSIONS.as_str(),
        &expected_columns,
        StorageError::Storage,
    )
    .await
}

#[async_trait]
impl SessionStore for PostgresStore {
    async fn init_sessions(&self) -> Result<(), StorageError> {
        create_session_tables_postgres(&self.pool).await?;
        validate_session_tables_postgres(&self.pool).await
    }

    async fn insert_session(&self, record: &SessionRecord) -> Result<(), StorageError> {
        let table_name = DB_TABLE_ADMIN_SESSIONS.as_str();

        sqlx::query(&format!(
            r#"
            INSERT INTO {table_name} (token, user_id, expires_at, created_at)
            VALUES ($1, $2, $3, $4)
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
            SELECT token, user_id, expires_at, created_at FROM {table_name} WHERE token = $1
            "#
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn delete_session(&self, token: &str) -> Result<(), StorageError> {
        let table_name = DB_TABLE_ADMIN_SESSIONS.as_str();

        sqlx::query(&format!("DELETE FROM {table_name} WHERE token = $1"))
            .bind(token)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete_sessions_by_user(&self, user_id: i64) -> Result<u64, StorageError> {
        let table_name = DB_TABLE_ADMIN_SESSIONS.as_str();

        let result = sqlx::query(&format!("DELETE FROM {table_name} WHERE user_id = $1"))
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn delete_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64, StorageError> {
        let table_name = DB_TABLE_ADMIN_SESSIONS.as_str();

        let result = sqlx::query(&format!("DELETE FROM {table_name} WHERE expires_at <= $1"))
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
            WHERE user_id = $1 ORDER BY created_at ASC
            "#
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }
}
