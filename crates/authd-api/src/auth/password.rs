//! Password policy and credential hashing
//!
//! Hashing uses bcrypt with a configurable work factor (default cost 10).
//! Each call generates a fresh random salt which is embedded in the output
//! digest, so no separate salt storage is needed. Verification recomputes
//! the hash from the embedded salt and compares in constant time.

use thiserror::Error;

/// Default bcrypt work factor
pub const DEFAULT_COST: u32 = 10;

/// Password hashing errors
#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Failed to hash password: {0}")]
    HashingFailed(String),
}

/// Validate a password against the complexity policy
///
/// A password is valid iff it is at least 8 characters and contains at
/// least one ASCII uppercase letter, one ASCII lowercase letter, and one
/// digit. The letter classes are ASCII-only; accented letters do not
/// satisfy them. There is no symbol requirement and no maximum length.
///
/// Pure check with no side effects; callers translate a `false` into a
/// user-facing message.
pub fn validate_password(password: &str) -> bool {
    password.chars().count() >= 8
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_digit())
}

/// Hash a plaintext password with bcrypt
///
/// The returned digest embeds the algorithm, cost, and salt and is safe to
/// store as-is.
pub fn hash_password(password: &str, cost: u32) -> Result<String, PasswordError> {
    bcrypt::hash(password, cost).map_err(|e| PasswordError::HashingFailed(e.to_string()))
}

/// Verify a plaintext password against a stored digest
///
/// Fails closed: a malformed digest (e.g. a corrupted column) is treated as
/// a non-match rather than an error, so a bad row can never authenticate.
pub fn verify_password(password: &str, digest: &str) -> bool {
    match bcrypt::verify(password, digest) {
        Ok(matched) => matched,
        Err(e) => {
            tracing::warn!("stored password digest could not be parsed: {e}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimum legal cost keeps the hashing tests fast.
    const TEST_COST: u32 = 4;

    #[test]
    fn test_policy_accepts_valid_password() {
        assert!(validate_password("Abcdefg1"));
        assert!(validate_password("CorrectHorse9battery"));
    }

    #[test]
    fn test_policy_rejects_weak_passwords() {
        assert!(!validate_password(""));
        assert!(!validate_password("Ab1")); // too short
        assert!(!validate_password("abcdefg1")); // no uppercase
        assert!(!validate_password("ABCDEFG1")); // no lowercase
        assert!(!validate_password("Abcdefgh")); // no digit
    }

    #[test]
    fn test_policy_letter_classes_are_ascii_only() {
        // An accented uppercase letter does not satisfy the uppercase
        // class, and likewise for lowercase.
        assert!(!validate_password("Éabcdefg1"));
        assert!(!validate_password("éABCDEFG1"));
        assert!(validate_password("Éabcdefg1X"));
    }

    #[test]
    fn test_hash_and_verify_round_trip() {
        let digest = hash_password("Abcdefg1", TEST_COST).expect("hash failed");

        assert!(verify_password("Abcdefg1", &digest));
        assert!(!verify_password("Abcdefg2", &digest));
    }

    #[test]
    fn test_same_password_produces_different_digests() {
        // Random salt: two hashes of the same input differ but both verify.
        let digest1 = hash_password("SamePassword123", TEST_COST).unwrap();
        let digest2 = hash_password("SamePassword123", TEST_COST).unwrap();

        assert_ne!(digest1, digest2);
        assert!(verify_password("SamePassword123", &digest1));
        assert!(verify_password("SamePassword123", &digest2));
    }

    #[test]
    fn test_malformed_digest_fails_closed() {
        assert!(!verify_password("Abcdefg1", "not-a-bcrypt-digest"));
        assert!(!verify_password("Abcdefg1", ""));
    }

    #[test]
    fn test_cost_is_embedded_in_digest() {
        let digest = hash_password("Abcdefg1", TEST_COST).unwrap();
        assert!(digest.starts_with("$2"));
        assert!(digest.contains("$04$"));
    }
}
