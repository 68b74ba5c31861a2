//! Error types for the coordination layer

use thiserror::Error;

use crate::credential::CredentialError;
use crate::session::SessionError;
use crate::storage::StorageError;
use crate::userdb::UserError;

/// Errors returned by login, logout and admin management flows
#[derive(Error, Debug)]
pub enum CoordinationError {
    /// Email or password absent from a login attempt
    #[error("Email and password are required")]
    MissingCredentials,

    /// Unknown email, inactive account or wrong password
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Rejected input outside the login flow
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Conflict error
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Resource not found with context
    #[error("Resource not found: {resource_type} {resource_id}")]
    ResourceNotFound {
        resource_type: String,
        resource_id: String,
    },

    /// Error from password hashing
    #[error("Credential error: {0}")]
    CredentialError(CredentialError),

    /// Error from the user database operations
    #[error("User error: {0}")]
    UserError(UserError),

    /// Error from Session operations
    #[error("Session error: {0}")]
    SessionError(SessionError),

    /// Error from store setup
    #[error("Storage error: {0}")]
    StorageError(StorageError),
}

impl CoordinationError {
    /// Log the error and return self
    pub fn log(self) -> Self {
        match &self {
            Self::MissingCredentials => tracing::debug!("Email and password are required"),
            Self::InvalidCredentials => tracing::info!("Invalid credentials"),
            Self::InvalidInput(msg) => tracing::debug!("Invalid input: {}", msg),
            Self::Conflict(msg) => tracing::error!("Conflict: {}", msg),
            Self::ResourceNotFound {
                resource_type,
                resource_id,
            } => tracing::error!("Resource not found: {} {}", resource_type, resource_id),
            Self::CredentialError(err) => tracing::error!("Credential error: {}", err),
            Self::UserError(err) => tracing::error!("User error: {}", err),
            Self::SessionError(err) => tracing::error!("Session error: {}", err),
            Self::StorageError(err) => tracing::error!("Storage error: {}", err),
        }
        self
    }
}

// Custom From implementations that automatically log errors

impl From<CredentialError> for CoordinationError {
    fn from(err: CredentialError) -> Self {
        let error = match err {
            CredentialError::EmptyPassword => {
                Self::InvalidInput("Password must not be empty".to_string())
            }
            other => Self::CredentialError(other),
        };
        tracing::error!("{}", error);
        error
    }
}

impl From<SessionError> for CoordinationError {
    fn from(err: SessionError) -> Self {
        let error = Self::SessionError(err);
        tracing::error!("{}", error);
        error
    }
}

impl From<UserError> for CoordinationError {
    fn from(err: UserError) -> Self {
        let error = match err {
            UserError::DuplicateEmail(email) => {
                Self::Conflict(format!("Email already registered: {email}"))
            }
            other => Self::UserError(other),
        };
        tracing::error!("{}", error);
        error
    }
}

impl From<StorageError> for CoordinationError {
    fn from(err: StorageError) -> Self {
        let error = Self::StorageError(err);
        tracing::error!("{}", error);
        error
    }
}
