use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::error::{IdentityError, IdentityResult};
use crate::gateway::EncrypterGateway;

/// Argon2id password hashing with a random salt per hash (PHC string output)
#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2Encrypter;

impl Argon2Encrypter {
    pub fn new() -> Self {
        Self
    }
}

impl EncrypterGateway for Argon2Encrypter {
    fn encrypt(&self, raw: &str) -> IdentityResult<String> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(raw.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| IdentityError::Encryption(e.to_string()))
    }

    fn matches(&self, raw: &str, hash: &str) -> bool {
        let Ok(parsed_hash) = PasswordHash::new(hash) else {
            tracing::warn!("Stored password hash is not a PHC string");
            return false;
        };

        Argon2::default()
            .verify_password(raw.as_bytes(), &parsed_hash)
            .is_ok()
    }
}
