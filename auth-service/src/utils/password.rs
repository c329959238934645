use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Newtype for password to prevent accidental logging
#[derive(Debug, Clone)]
pub struct Password(String);

impl Password {
    pub fn new(password: String) -> Self {
        Self(password)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Newtype for password hash
#[derive(Debug, Clone)]
pub struct PasswordHashString(String);

impl PasswordHashString {
    pub fn new(hash: String) -> Self {
        Self(hash)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Credential hasher the account flows depend on.
///
/// The concrete algorithm is a collaborator choice, not something the
/// account logic is allowed to know about.
pub trait CredentialHasher: Send + Sync {
    fn hash(&self, password: &Password) -> Result<PasswordHashString, anyhow::Error>;
    fn verify(&self, password: &Password, hash: &PasswordHashString) -> bool;
}

/// Argon2id hasher with per-hash generated salt.
#[derive(Debug, Default, Clone)]
pub struct Argon2Hasher;

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, password: &Password) -> Result<PasswordHashString, anyhow::Error> {
        let argon2 = Argon2::default();
        let salt = SaltString::generate(&mut OsRng);

        let password_hash = argon2
            .hash_password(password.as_str().as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
            .to_string();

        Ok(PasswordHashString::new(password_hash))
    }

    fn verify(&self, password: &Password, hash: &PasswordHashString) -> bool {
        let Ok(parsed_hash) = PasswordHash::new(hash.as_str()) else {
            return false;
        };

        Argon2::default()
            .verify_password(password.as_str().as_bytes(), &parsed_hash)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password() {
        let hasher = Argon2Hasher;
        let password = Password::new("mySecurePassword123".to_string());
        let hash = hasher.hash(&password).expect("Failed to hash password");

        // Hash should not be empty
        assert!(!hash.as_str().is_empty());

        // Hash should start with $argon2
        assert!(hash.as_str().starts_with("$argon2"));
    }

    #[test]
    fn test_verify_password_correct() {
        let hasher = Argon2Hasher;
        let password = Password::new("mySecurePassword123".to_string());
        let hash = hasher.hash(&password).expect("Failed to hash password");

        assert!(hasher.verify(&password, &hash));
    }

    #[test]
    fn test_verify_password_incorrect() {
        let hasher = Argon2Hasher;
        let password = Password::new("mySecurePassword123".to_string());
        let hash = hasher.hash(&password).expect("Failed to hash password");

        let wrong_password = Password::new("wrongPassword".to_string());
        assert!(!hasher.verify(&wrong_password, &hash));
    }

    #[test]
    fn test_different_hashes_for_same_password() {
        let hasher = Argon2Hasher;
        let password = Password::new("mySecurePassword123".to_string());
        let hash1 = hasher.hash(&password).expect("Failed to hash password");
        let hash2 = hasher.hash(&password).expect("Failed to hash password");

        // Same password should produce different hashes (due to random salt)
        assert_ne!(hash1.as_str(), hash2.as_str());

        // Both should verify correctly
        assert!(hasher.verify(&password, &hash1));
        assert!(hasher.verify(&password, &hash2));
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        let hasher = Argon2Hasher;
        let password = Password::new("mySecurePassword123".to_string());
        let bogus = PasswordHashString::new("not-a-hash".to_string());

        assert!(!hasher.verify(&password, &bogus));
    }
}
