//! Credential hashing
//!
//! Passwords are stored as Argon2id PHC strings. Records written by older
//! versions carry the plaintext password instead; [`verify_credential`]
//! accepts those and reports that the record should be upgraded.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use crate::database::CredentialRecord;
use crate::error::{TutorError, Result};

/// Outcome of checking a password against a credential record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    /// Password does not match
    Rejected,
    /// Matches a stored hash
    Accepted,
    /// Matches a legacy plaintext record, which should be rehashed
    AcceptedLegacy,
}

impl Verification {
    pub fn is_accepted(&self) -> bool {
        !matches!(self, Verification::Rejected)
    }
}

/// Hash a password with Argon2 and a random salt
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| TutorError::StorageError(format!("Password hashing failed: {}", e)))?;
    Ok(hash.to_string())
}

/// Check a password against a PHC hash string
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| TutorError::StorageError(format!("Stored password hash is invalid: {}", e)))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Check a password against a credential record
pub fn verify_credential(record: &CredentialRecord, password: &str) -> Result<Verification> {
    if let Some(hash) = &record.password_hash {
        return Ok(if verify_password(password, hash)? {
            Verification::Accepted
        } else {
            Verification::Rejected
        });
    }
    match &record.password {
        Some(plain) if plain == password => Ok(Verification::AcceptedLegacy),
        _ => Ok(Verification::Rejected),
    }
}
