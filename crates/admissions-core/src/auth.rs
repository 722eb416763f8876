//! Password hashing and verification.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2, PasswordHash, PasswordVerifier,
};
use thiserror::Error;

use crate::models::{Doctor, Patient};
use crate::{AdmissionsError, AdmissionsResult};

/// Message returned for every failed login, whatever the cause.
pub const WRONG_CREDENTIALS: &str = "Wrong credentials";

/// Message returned when a password change names the wrong current password.
pub const INCORRECT_ORIGINAL_PASSWORD: &str = "Incorrect original password";

/// Records that may carry a stored password hash.
pub trait Credentials {
    fn stored_hash(&self) -> Option<&str>;
}

impl Credentials for Patient {
    fn stored_hash(&self) -> Option<&str> {
        self.password_hash.as_deref()
    }
}

impl Credentials for Doctor {
    fn stored_hash(&self) -> Option<&str> {
        self.password_hash.as_deref()
    }
}

#[derive(Error, Debug)]
#[error("Failed to hash password: {0}")]
pub struct HashError(String);

/// Hash a plaintext password into an Argon2 PHC string.
pub fn hash_password(password: &str) -> Result<String, HashError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| HashError(e.to_string()))
}

/// Check a plaintext password against a stored hash.
///
/// A stored value that is not a valid PHC string never matches.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

/// True when `password` matches the record's stored hash.
pub fn password_matches<T: Credentials>(record: &T, password: &str) -> bool {
    record
        .stored_hash()
        .is_some_and(|hash| verify_password(password, hash))
}

/// Accept a login candidate whose stored hash matches `password`.
///
/// A missing candidate and a wrong password fail with the same error. Runs
/// without touching the database, so callers can release it first.
pub fn authenticate<T: Credentials>(candidate: Option<T>, password: &str) -> AdmissionsResult<T> {
    match candidate {
        Some(record) if password_matches(&record, password) => Ok(record),
        _ => Err(AdmissionsError::Unauthorized(WRONG_CREDENTIALS.into())),
    }
}
