use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use crate::error::RecipesServiceError;

pub const NAME_MAX_LEN: usize = 150;
pub const EMAIL_MAX_LEN: usize = 254;

/// Loose address check: `local@domain`, no whitespace, at most 254 chars.
pub fn validate_email(email: &str) -> Result<(), RecipesServiceError> {
    let valid = email.chars().count() <= EMAIL_MAX_LEN
        && !email.chars().any(char::is_whitespace)
        && email
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty());
    if valid {
        Ok(())
    } else {
        Err(RecipesServiceError::InvalidEmail)
    }
}

/// First or last name: non-blank, at most 150 chars.
pub fn validate_name(field: &'static str, value: &str) -> Result<(), RecipesServiceError> {
    if value.trim().is_empty() || value.chars().count() > NAME_MAX_LEN {
        return Err(RecipesServiceError::InvalidName(field));
    }
    Ok(())
}

/// Argon2id hash in PHC string format.
pub fn hash_password(password: &str) -> Result<String, RecipesServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("hash password: {e}"))?;
    Ok(hash.to_string())
}

pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, RecipesServiceError> {
    let parsed =
        PasswordHash::new(password_hash).map_err(|e| anyhow::anyhow!("parse password hash: {e}"))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
