use sqlx::{Pool, Postgres, Row, Sqlite};

/// Validates that a PostgreSQL table exists with the expected columns and types
pub(crate) async fn validate_postgres_table_schema<E>(
    pool: &Pool<Postgres>,
    table_name: &str,
    expected_columns: &[(&str, &str)],
    error_mapper: impl Fn(String) -> E,
) -> Result<(), E> {
    let table_exists: bool = sqlx::query_scalar(
        "SELECT EXISTS (SELECT FROM information_schema.tables WHERE table_name = $1)",
    )
    .bind(table_name)
    .fetch_one(pool)
    .await
    .map_err(|e| error_mapper(e.to_string()))?;

    if !table_exists {
        return Err(error_mapper(format!(
            "Schema validation failed: Table '{table_name}' does not exist"
        )));
    }

    let rows = sqlx::query(
        "SELECT column_name, data_type FROM information_schema.columns
         WHERE table_name = $1 ORDER BY column_name",
    )
    .bind(table_name)
    .fetch_all(pool)
    .await
    .map_err(|e| error_mapper(e.to_string()))?;

    let actual_columns: Vec<(String, String)> = rows
        .iter()
        .map(|row| {
            let name: String = row.get("column_name");
            let type_: String = row.get("data_type");
            (name, type_)
        })
        .collect();

    compare_columns(table_name, expected_columns, &actual_columns, error_mapper)
}

/// Validates that a SQLite table exists with the expected columns and declared types
pub(crate) async fn validate_sqlite_table_schema<E>(
    pool: &Pool<Sqlite>,
    table_name: &str,
    expected_columns: &[(&str, &str)],
    error_mapper: impl Fn(String) -> E,
) -> Result<(), E> {
    let rows = sqlx::query(&format!("PRAGMA table_info({table_name})"))
        .fetch_all(pool)
        .await
        .map_err(|e| error_mapper(e.to_string()))?;

    if rows.is_empty() {
        return Err(error_mapper(format!(
            "Schema validation failed: Table '{table_name}' does not exist"
        )));
    }

    let actual_columns: Vec<(String, String)> = rows
        .iter()
        .map(|row| {
            let name: String = row.get("name");
            let type_: String = row.get("type");
            (name, type_)
        })
        .collect();

    compare_columns(table_name, expected_columns, &actual_columns, error_mapper)
}

fn compare_columns<E>(
    table_name: &str,
    expected_columns: &[(&str, &str)],
    actual_columns: &[(String, String)],
    error_mapper: impl Fn(String) -> E,
) -> Result<(), E> {
    for (expected_name, expected_type) in expected_columns {
        let found = actual_columns
            .iter()
            .find(|(name, _)| name == expected_name);

        match found {
            Some((_, actual_type)) if actual_type.eq_ignore_ascii_case(expected_type) => {}
            Some((_, actual_type)) => {
                return Err(error_mapper(format!(
                    "Schema validation failed: Column '{expected_name}' has type '{actual_type}' but expected '{expected_type}'"
                )));
            }
            None => {
                return Err(error_mapper(format!(
                    "Schema validation failed: Missing column '{expected_name}'"
                )));
            }
        }
    }

    for (actual_name, _) in actual_columns {
        if !expected_columns
            .iter()
            .any(|(name, _)| *name == actual_name)
        {
            tracing::warn!(
                "Extra column '{}' found in table '{}'",
                actual_name,
                table_name
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn memory_pool() -> Pool<Sqlite> {
        SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory sqlite")
    }

    #[test]
    fn test_compare_columns_matches_case_insensitively() {
        let actual = vec![
            ("id".to_string(), "INTEGER".to_string()),
            ("token".to_string(), "TEXT".to_string()),
        ];
        let result = compare_columns("t", &[("id", "integer"), ("token", "text")], &actual, |e| e);
        assert!(result.is_ok());
    }

    #[test]
    fn test_compare_columns_type_mismatch() {
        let actual = vec![("id".to_string(), "TEXT".to_string())];
        let result = compare_columns("t", &[("id", "INTEGER")], &actual, |e| e);
        let err = result.unwrap_err();
        assert!(err.contains("Column 'id' has type 'TEXT' but expected 'INTEGER'"));
    }

    #[test]
    fn test_compare_columns_missing_column() {
        let actual = vec![("id".to_string(), "INTEGER".to_string())];
        let result = compare_columns("t", &[("id", "INTEGER"), ("token", "TEXT")], &actual, |e| e);
        assert_eq!(
            result.unwrap_err(),
            "Schema validation failed: Missing column 'token'"
        );
    }

    #[tokio::test]
    async fn test_validate_sqlite_missing_table() {
        let pool = memory_pool().await;
        let result =
            validate_sqlite_table_schema(&pool, "does_not_exist", &[("id", "INTEGER")], |e| e)
                .await;
        assert!(result.unwrap_err().contains("does not exist"));
    }

    #[tokio::test]
    async fn test_validate_sqlite_existing_table() {
        let pool = memory_pool().await;
        sqlx::query("CREATE TABLE sample (id INTEGER PRIMARY KEY, label TEXT NOT NULL)")
            .execute(&pool)
            .await
            .unwrap();

        let result = validate_sqlite_table_schema(
            &pool,
            "sample",
            &[("id", "INTEGER"), ("label", "TEXT")],
            |e| e,
        )
        .await;
        assert!(result.is_ok());
    }
}
