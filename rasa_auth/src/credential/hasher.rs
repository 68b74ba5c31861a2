use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::utils::gen_random_hex;

use super::errors::CredentialError;
use super::types::StoredHash;

/// Number of random salt bytes. Hex encoded this gives a 32 character salt.
const SALT_LEN: usize = 16;

/// Hashes a plaintext password into the `<salt_hex>:<digest_hex>` storage format.
///
/// A fresh random salt is drawn for every call, so hashing the same password
/// twice produces two different strings that both verify.
///
/// # Errors
/// * `CredentialError::EmptyPassword` if `plaintext` is empty
/// * `CredentialError::Crypto` if the system RNG fails
pub fn hash_password(plaintext: &str) -> Result<String, CredentialError> {
    if plaintext.is_empty() {
        return Err(CredentialError::EmptyPassword);
    }

    let salt = gen_random_hex(SALT_LEN)?;
    let digest = salted_digest(&salt, plaintext);

    Ok(StoredHash::new(salt, digest).to_string())
}

/// Verifies a plaintext password against a stored `<salt_hex>:<digest_hex>` hash.
///
/// Returns `false` for an empty password or a malformed stored hash. The digest
/// comparison runs in constant time.
pub fn verify_password(plaintext: &str, stored_hash: &str) -> bool {
    if plaintext.is_empty() {
        return false;
    }

    let stored: StoredHash = match stored_hash.parse() {
        Ok(stored) => stored,
        Err(e) => {
            tracing::warn!("Refusing to verify against stored hash: {}", e);
            return false;
        }
    };

    let computed = salted_digest(stored.salt(), plaintext);
    computed.as_bytes().ct_eq(stored.digest().as_bytes()).into()
}

fn salted_digest(salt_hex: &str, plaintext: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt_hex.as_bytes());
    hasher.update(plaintext.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_hash_format() {
        // Given a password
        let stored = hash_password("correct-pw").expect("hashing should succeed");

        // Then the result is a 32 char hex salt, a colon, and a 64 char hex digest
        let (salt, digest) = stored.split_once(':').expect("separator present");
        assert_eq!(salt.len(), 32);
        assert_eq!(digest.len(), 64);
        assert!(salt.chars().all(|c| c.is_ascii_hexdigit()));
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_salted_digest_matches_known_vector() {
        // sha256("salt" || "password")
        let digest = salted_digest("salt", "password");
        assert_eq!(
            digest,
            "13601bda4ea78e55a07b98866d2be6be0744e3866f13c00c811cab608a28f322"
        );
    }

    #[test]
    fn test_verify_known_stored_hash() {
        let stored = format!("salt:{}", salted_digest("salt", "password"));
        assert!(verify_password("password", &stored));
        assert!(!verify_password("Password", &stored));
    }

    #[test]
    fn test_hash_twice_differs_but_both_verify() {
        let first = hash_password("correct-pw").unwrap();
        let second = hash_password("correct-pw").unwrap();

        assert_ne!(first, second);
        assert!(verify_password("correct-pw", &first));
        assert!(verify_password("correct-pw", &second));
    }

    #[test]
    fn test_wrong_password_fails() {
        let stored = hash_password("correct-pw").unwrap();
        assert!(!verify_password("wrong-pw", &stored));
    }

    #[test]
    fn test_empty_password() {
        assert_eq!(hash_password(""), Err(CredentialError::EmptyPassword));

        let stored = hash_password("something").unwrap();
        assert!(!verify_password("", &stored));
    }

    #[test]
    fn test_malformed_stored_hash_fails_closed() {
        assert!(!verify_password("pw", ""));
        assert!(!verify_password("pw", "no-separator-here"));
        assert!(!verify_password("pw", ":"));
        assert!(!verify_password("pw", "salt:not-a-digest"));
    }

    #[test]
    fn test_digest_comparison_is_case_sensitive() {
        let stored = hash_password("correct-pw").unwrap();
        let upper = stored.to_uppercase();
        // Salt changes too once upper-cased, so verification must fail
        assert!(!verify_password("correct-pw", &upper));
    }

    proptest! {
        #[test]
        fn prop_hash_then_verify(password in "\\PC{1,64}") {
            let stored = hash_password(&password).unwrap();
            prop_assert!(verify_password(&password, &stored));
        }

        #[test]
        fn prop_other_password_does_not_verify(
            p in "[a-zA-Z0-9]{1,32}",
            q in "[a-zA-Z0-9]{1,32}",
        ) {
            prop_assume!(p != q);
            let stored = hash_password(&p).unwrap();
            prop_assert!(!verify_password(&q, &stored));
            prop_assert_ne!(stored, hash_password(&q).unwrap());
        }
    }
}
