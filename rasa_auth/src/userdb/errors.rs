use thiserror::Error;

#[derive(Clone, Error, Debug)]
pub enum UserError {
    #[error("User not found")]
    NotFound,

    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<sqlx::Error> for UserError {
    fn from(err: sqlx::Error) -> Self {
        UserError::Storage(err.to_string())
    }
}

/// Maps a unique-constraint violation on insert or update to `DuplicateEmail`.
pub(super) fn map_write_error(err: sqlx::Error, email: &str) -> UserError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            UserError::DuplicateEmail(email.to_string())
        }
        _ => UserError::from(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_write_error_passes_through_non_unique_errors() {
        let err = map_write_error(sqlx::Error::RowNotFound, "a@example.com");
        assert!(matches!(err, UserError::Storage(_)));
    }

    #[test]
    fn test_error_display() {
        assert_eq!(UserError::NotFound.to_string(), "User not found");
        assert_eq!(
            UserError::DuplicateEmail("a@example.com".to_string()).to_string(),
            "Email already registered: a@example.com"
        );
    }

    #[test]
    fn test_error_is_sync_and_send() {
        fn assert_sync_send<T: Sync + Send>() {}
        assert_sync_send::<UserError>();
    }
}
