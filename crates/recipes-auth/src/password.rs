//! Password hashing and verification.
//!
//! Passwords are stored as Argon2id hashes only; the plaintext never
//! leaves the sign-in request.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use crate::error::AuthError;
use crate::AuthResult;

/// Hashes a plaintext password with Argon2id and a fresh random salt.
///
/// # Errors
///
/// Returns an `Internal` error if hashing fails.
pub fn hash_password(password: &str) -> AuthResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::internal(format!("password hashing failed: {e}")))
}

/// Verifies a plaintext password against a stored Argon2 hash.
///
/// Returns `Ok(false)` on mismatch; an error is reserved for a hash
/// that cannot be parsed at all.
///
/// # Errors
///
/// Returns an `Internal` error if the stored hash is malformed.
pub fn verify_password(password: &str, hash: &str) -> AuthResult<bool> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AuthError::internal(format!("malformed password hash: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
