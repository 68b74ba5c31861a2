use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::storage::{DB_TABLE_ADMIN_USERS, PostgresStore, validate_postgres_table_schema};
use crate::userdb::{
    errors::{UserError, map_write_error},
    types::{AdminUser, NewAdminUser, normalize_email},
};

use super::store_type::AdminUserStore;

async fn create_tables_postgres(pool: &Pool<Postgres>) -> Result<(), UserError> {
    let table_name = DB_TABLE_ADMIN_USERS.as_str();

    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {table_name} (
            id BIGSERIAL PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            name TEXT,
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL
        )
        "#
    ))
    .execute(pool)
    .await?;

    Ok(())
}

async fn validate_user_tables_postgres(pool: &Pool<Postgres>) -> Result<(), UserError> {
    let expected_columns = [
        ("id", "bigint"),
        ("email", "text"),
        ("password_hash", "text"),
        ("name", "text"),
        ("is_active", "boolean"),
        ("created_at", "timestamp with time zone"),
        ("updated_at", "timestamp with time zone"),
    ];

    validate_postgres_table_schema(
        pool,
        DB_TABLE_ADMIN_USERS.as_str(),
        &expected_columns,
        UserError::Storage,
    )
    .await
}

#[async_trait]
impl AdminUserStore for PostgresStore {
    async fn init_users(&self) -> Result<(), UserError> {
        create_tables_postgres(&self.pool).await?;
        validate_user_tables_postgres(&self.pool).await
    }

    async fn get_user(&self, id: i64) -> Result<Option<AdminUser>, UserError> {
        let table_name = DB_TABLE_ADMIN_USERS.as_str();

        let user = sqlx::query_as::<_, AdminUser>(&format!(
            "SELECT * FROM {table_name} WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<AdminUser>, UserError> {
        let table_name = DB_TABLE_ADMIN_USERS.as_str();

        let user = sqlx::query_as::<_, AdminUser>(&format!(
            "SELECT * FROM {table_name} WHERE email = $1"
        ))
        .bind(normalize_email(email))
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn insert_user(&self, user: NewAdminUser) -> Result<AdminUser, UserError> {
        let table_name = DB_TABLE_ADMIN_USERS.as_str();

        sqlx::query_as::<_, AdminUser>(&format!(
            r#"
            INSERT INTO {table_name} (email, password_hash, name, is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#
        ))
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.name)
        .bind(user.is_active)
        .bind(user.created_at)
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &user.email))
    }

    async fn update_user(&self, user: &AdminUser) -> Result<AdminUser, UserError> {
        let table_name = DB_TABLE_ADMIN_USERS.as_str();
        let email = normalize_email(&user.email);

        sqlx::query_as::<_, AdminUser>(&format!(
            r#"
            UPDATE {table_name}
            SET email = $1, password_hash = $2, name = $3, is_active = $4, updated_at = $5
            WHERE id = $6
            RETURNING *
            "#
        ))
        .bind(&email)
        .bind(&user.password_hash)
        .bind(&user.name)
        .bind(user.is_active)
        .bind(chrono::Utc::now())
        .bind(user.id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &email))?
        .ok_or(UserError::NotFound)
    }

    async fn delete_user(&self, id: i64) -> Result<(), UserError> {
        let table_name = DB_TABLE_ADMIN_USERS.as_str();

        sqlx::query(&format!("DELETE FROM {table_name} WHERE id = $1"))
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<AdminUser>, UserError> {
        let table_name = DB_TABLE_ADMIN_USERS.as_str();

        let users = sqlx::query_as::<_, AdminUser>(&format!(
            "SELECT * FROM {table_name} ORDER BY id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }
}
