//! Credential validation and hashing.
//!
//! Passwords are hashed with argon2id. The stored string is the PHC format produced by
//! [`argon2::password_hash::PasswordHasher`], so parameters and salt travel with the hash.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use regex::Regex;

use crate::traits::AuthApiError;

/// Minimum password length, matching the registration rules of the original storefront.
pub const MIN_PASSWORD_LENGTH: usize = 8;

pub fn validate_email(email: &str) -> Result<(), AuthApiError> {
    let re = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    if re.is_match(email) {
        Ok(())
    } else {
        Err(AuthApiError::InvalidEmail)
    }
}

pub fn validate_password(password: &str) -> Result<(), AuthApiError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthApiError::PasswordTooShort);
    }
    Ok(())
}

pub fn hash_password(password: &str) -> Result<String, AuthApiError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthApiError::PasswordHash(e.to_string()))?;
    Ok(hash.to_string())
}

/// Checks a password against a stored PHC hash. A mismatch reads the same as an unknown account.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<(), AuthApiError> {
    let parsed = PasswordHash::new(stored_hash).map_err(|e| AuthApiError::PasswordHash(e.to_string()))?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| AuthApiError::InvalidCredentials)
}
