//! Password hashing and verification using bcrypt

use crate::error::{ApiError, Result};

/// Hash a password with a randomized salt and the given work factor.
/// Returns the hash string suitable for storage in the credential store.
pub fn hash_password(password: &str, cost: u32) -> Result<String> {
    bcrypt::hash(password, cost).map_err(|e| ApiError::Internal(format!("bcrypt hash failed: {e}")))
}

/// Verify a plaintext password against a stored hash.
///
/// The digest comparison inside bcrypt is constant-time. A malformed hash
/// string verifies as `false` rather than erroring, so a corrupt credential
/// row behaves exactly like a wrong password.
pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}
