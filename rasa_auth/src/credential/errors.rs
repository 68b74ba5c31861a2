use thiserror::Error;

use crate::utils::UtilError;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CredentialError {
    #[error("Password must not be empty")]
    EmptyPassword,

    #[error("Malformed stored hash: {0}")]
    MalformedHash(String),

    #[error("Crypto error: {0}")]
    Crypto(String),
}

impl From<UtilError> for CredentialError {
    fn from(err: UtilError) -> Self {
        match err {
            UtilError::Crypto(msg) => Self::Crypto(msg),
        }
    }
}
