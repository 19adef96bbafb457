//! Password hashing (argon2id, PHC strings).

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher as _, PasswordVerifier, Version};

use crate::error::ServiceError;

/// Hashes and verifies passwords with fixed cost parameters.
///
/// Verification reads the parameters embedded in the stored hash, so hashes
/// written under older settings keep verifying after a cost change.
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
    /// Hash of a throwaway password, verified when the username is unknown.
    dummy_hash: String,
}

impl PasswordHasher {
    pub fn new(memory_kib: u32, iterations: u32) -> Result<Self, ServiceError> {
        let params = Params::new(memory_kib, iterations, 1, None)
            .map_err(|e| ServiceError::Password(format!("Invalid argon2 parameters: {}", e)))?;
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

        let mut hasher = PasswordHasher {
            argon2,
            dummy_hash: String::new(),
        };
        hasher.dummy_hash = hasher.hash("dummy-password-never-matches")?;
        Ok(hasher)
    }

    /// Hash a password for storage.
    pub fn hash(&self, password: &str) -> Result<String, ServiceError> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| ServiceError::Password(format!("Failed to hash password: {}", e)))?;

        Ok(hash.to_string())
    }

    /// Constant-time check of `password` against a stored PHC string.
    /// A malformed stored hash never verifies.
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        let parsed_hash = match PasswordHash::new(hash) {
            Ok(h) => h,
            Err(_) => return false,
        };

        self.argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }

    /// Burns the same verification work as a real check, then fails.
    pub fn verify_dummy(&self, password: &str) -> bool {
        let _ = self.verify(password, &self.dummy_hash);
        false
    }
}

impl std::fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHasher").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap() -> PasswordHasher {
        PasswordHasher::new(Params::MIN_M_COST, 1).unwrap()
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = cheap();
        let hash = hasher.hash("pw").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify("pw", &hash));
        assert!(!hasher.verify("wrong", &hash));
    }

    #[test]
    fn test_salts_differ() {
        let hasher = cheap();
        assert_ne!(hasher.hash("pw").unwrap(), hasher.hash("pw").unwrap());
    }

    #[test]
    fn test_malformed_hash_never_verifies() {
        let hasher = cheap();
        assert!(!hasher.verify("pw", "not-a-phc-string"));
        assert!(!hasher.verify_dummy("dummy-password-never-matches"));
    }

    #[test]
    fn test_invalid_params() {
        assert!(matches!(
            PasswordHasher::new(0, 1),
            Err(ServiceError::Password(_))
        ));
    }
}
