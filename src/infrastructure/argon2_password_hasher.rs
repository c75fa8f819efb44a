use argon2::{
    Argon2, PasswordHash as Argon2Hash,
    password_hash::{PasswordHasher as Argon2Hasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::domain::{
    error::DomainError,
    models::credential::HashedPassword,
    services::password_service::PasswordHasher,
};

#[derive(Clone)]
pub struct Argon2PasswordHasher;

impl Argon2PasswordHasher {
    pub fn new() -> Self {
        Self
    }
}

impl Default for Argon2PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, plain_password: &str) -> Result<HashedPassword, DomainError> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = Argon2::default()
            .hash_password(plain_password.as_bytes(), &salt)
            .map_err(|_| DomainError::InvalidCredentials)?
            .to_string();

        Ok(HashedPassword::new(hash))
    }

    fn verify(&self, plain_password: &str, hashed_password: &HashedPassword) -> Result<bool, DomainError> {
        let parsed_hash = Argon2Hash::new(hashed_password.as_str())
            .map_err(|_| DomainError::InvalidCredentials)?;

        Ok(Argon2::default()
            .verify_password(plain_password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let hasher = Argon2PasswordHasher::new();
        let hashed = hasher.hash("x").unwrap();

        assert_ne!(hashed.as_str(), "x");
        assert!(hasher.verify("x", &hashed).unwrap());
        assert!(!hasher.verify("y", &hashed).unwrap());
    }

    #[test]
    fn garbage_hash_is_invalid_credentials() {
        let hasher = Argon2PasswordHasher::new();
        let result = hasher.verify("x", &HashedPassword::new("not-a-phc-string".to_string()));
        assert!(matches!(result, Err(DomainError::InvalidCredentials)));
    }
}
