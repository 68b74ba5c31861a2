use async_trait::async_trait;
use sqlx::{Pool, Sqlite};

use crate::storage::{DB_TABLE_ADMIN_USERS, SqliteStore, validate_sqlite_table_schema};
use crate::userdb::{
    errors::{UserError, map_write_error},
    types::{AdminUser, NewAdminUser, normalize_email},
};

use super::store_type::AdminUserStore;

async fn create_tables_sqlite(pool: &Pool<Sqlite>) -> Result<(), UserError> {
    let table_name = DB_TABLE_ADMIN_USERS.as_str();

    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {table_name} (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            name TEXT,
            is_active BOOLEAN NOT NULL DEFAULT true,
            created_at TIMESTAMP NOT NULL,
            updated_at TIMESTAMP NOT NULL
        )
        "#
    ))
    .execute(pool)
    .await?;

    Ok(())
}

async fn validate_user_tables_sqlite(pool: &Pool<Sqlite>) -> Result<(), UserError> {
    let expected_columns = [
        ("id", "INTEGER"),
        ("email", "TEXT"),
        ("password_hash", "TEXT"),
        ("name", "TEXT"),
        ("is_active", "BOOLEAN"),
        ("created_at", "TIMESTAMP"),
        ("updated_at", "TIMESTAMP"),
    ];

    validate_sqlite_table_schema(
        pool,
        DB_TABLE_ADMIN_USERS.as_str(),
        &expected_columns,
        UserError::Storage,
    )
    .await
}

#[async_trait]
impl AdminUserStore for SqliteStore {
    async fn init_users(&self) -> Result<(), UserError> {
        create_tables_sqlite(&self.pool).await?;
        validate_user_tables_sqlite(&self.pool).await
    }

    async fn get_user(&self, id: i64) -> Result<Option<AdminUser>, UserError> {
        let table_name = DB_TABLE_ADMIN_USERS.as_str();

        let user = sqlx::query_as::<_, AdminUser>(&format!(
            "SELECT * FROM {table_name} WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<AdminUser>, UserError> {
        let table_name = DB_TABLE_ADMIN_USERS.as_str();

        let user = sqlx::query_as::<_, AdminUser>(&format!(
            "SELECT * FROM {table_name} WHERE email = ?"
        ))
        .bind(normalize_email(email))
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn insert_user(&self, user: NewAdminUser) -> Result<AdminUser, UserError> {
        let table_name = DB_TABLE_ADMIN_USERS.as_str();

        let result = sqlx::query(&format!(
            r#"
            INSERT INTO {table_name} (email, password_hash, name, is_active, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#
        ))
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.name)
        .bind(user.is_active)
        .bind(user.created_at)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &user.email))?;

        Ok(user.into_user(result.last_insert_rowid()))
    }

    async fn update_user(&self, user: &AdminUser) -> Result<AdminUser, UserError> {
        let table_name = DB_TABLE_ADMIN_USERS.as_str();
        let mut updated = user.clone();
        updated.email = normalize_email(&user.email);
        updated.updated_at = chrono::Utc::now();

        let result = sqlx::query(&format!(
            r#"
            UPDATE {table_name}
            SET email = ?, password_hash = ?, name = ?, is_active = ?, updated_at = ?
            WHERE id = ?
            "#
        ))
        .bind(&updated.email)
        .bind(&updated.password_hash)
        .bind(&updated.name)
        .bind(updated.is_active)
        .bind(updated.updated_at)
        .bind(updated.id)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &updated.email))?;

        if result.rows_affected() == 0 {
            return Err(UserError::NotFound);
        }

        Ok(updated)
    }

    async fn delete_user(&self, id: i64) -> Result<(), UserError> {
        let table_name = DB_TABLE_ADMIN_USERS.as_str();

        sqlx::query(&format!("DELETE FROM {table_name} WHERE id = ?"))
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
