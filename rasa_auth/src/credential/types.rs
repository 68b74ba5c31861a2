use std::fmt;
use std::str::FromStr;

use super::errors::CredentialError;

/// Length of a hex encoded SHA-256 digest.
pub(super) const DIGEST_HEX_LEN: usize = 64;

/// A parsed `<salt_hex>:<digest_hex>` password hash.
#[derive(Clone, PartialEq, Eq)]
pub struct StoredHash {
    salt: String,
    digest: String,
}

impl StoredHash {
    pub(super) fn new(salt: String, digest: String) -> Self {
        Self { salt, digest }
    }

    pub fn salt(&self) -> &str {
        &self.salt
    }

    pub fn digest(&self) -> &str {
        &self.digest
    }
}

impl FromStr for StoredHash {
    type Err = CredentialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (salt, digest) = s
            .split_once(':')
            .ok_or_else(|| CredentialError::MalformedHash("missing separator".to_string()))?;

        if salt.is_empty() {
            return Err(CredentialError::MalformedHash("empty salt".to_string()));
        }

        if digest.len() != DIGEST_HEX_LEN || !digest.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(CredentialError::MalformedHash(
                "digest is not a SHA-256 hex string".to_string(),
            ));
        }

        Ok(Self::new(salt.to_string(), digest.to_string()))
    }
}

impl fmt::Display for StoredHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.salt, self.digest)
    }
}

// Keeps the digest out of logs.
impl fmt::Debug for StoredHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredHash")
            .field("salt", &self.salt)
            .field("digest", &"<redacted>")
            .finish()
    }
}
