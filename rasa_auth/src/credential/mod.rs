//! Salted password hashing for admin credentials.
//!
//! Stored hashes use the `<salt_hex>:<sha256_hex>` format, where the digest is
//! computed over the hex salt followed by the plaintext password.

mod errors;
mod hasher;
mod types;

pub use errors::CredentialError;
pub use hasher::{hash_password, verify_password};
pub use types::StoredHash;
