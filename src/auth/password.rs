use crate::error::AppError;

/// One-way salted password hashing on top of bcrypt. The salt is embedded in
/// the digest, so equal plaintexts produce different digests that both
/// verify.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn hash(&self, plaintext: &str) -> Result<String, AppError> {
        bcrypt::hash(plaintext, self.cost)
            .map_err(|e| AppError::Internal(format!("password hashing failed: {}", e)))
    }

    /// A malformed digest is a non-match, not an error.
    pub fn verify(&self, plaintext: &str, digest: &str) -> bool {
        bcrypt::verify(plaintext, digest).unwrap_or(false)
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // MIN_COST keeps these tests fast; production uses DEFAULT_COST.
    fn hasher() -> PasswordHasher {
        PasswordHasher::new(4)
    }

    #[test]
    fn test_hash_then_verify() {
        let hasher = hasher();
        let digest = hasher.hash("pw123456").unwrap();
        assert!(hasher.verify("pw123456", &digest));
        assert!(!hasher.verify("pw1234567", &digest));
    }

    #[test]
    fn test_same_password_different_digests() {
        let hasher = hasher();
        let first = hasher.hash("pw123456").unwrap();
        let second = hasher.hash("pw123456").unwrap();
        assert_ne!(first, second);
        assert!(hasher.verify("pw123456", &first));
        assert!(hasher.verify("pw123456", &second));
    }

    #[test]
    fn test_malformed_digest_is_non_match() {
        let hasher = hasher();
        assert!(!hasher.verify("pw123456", "not-a-bcrypt-digest"));
        assert!(!hasher.verify("pw123456", ""));
    }
}
