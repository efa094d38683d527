//! Password digests.
//!
//! Passwords are stored as bcrypt hashes. Hashing and verification run on
//! the blocking pool so the cost factor never stalls the runtime.

use bcrypt::BcryptError;

#[cfg(not(test))]
const COST: u32 = bcrypt::DEFAULT_COST;
#[cfg(test)]
// bcrypt keeps its MIN_COST (4) private; use the same value directly.
const COST: u32 = 4;

pub async fn hash_password(password: &str) -> Result<String, BcryptError> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || bcrypt::hash(password, COST))
        .await
        .map_err(|e| BcryptError::Io(e.into()))?
}

/// Checks a plaintext password against a stored hash.
///
/// A stored value that is not a bcrypt hash never verifies.
pub async fn verify_password(password: &str, hash: &str) -> Result<bool, BcryptError> {
    let password = password.to_string();
    let hash = hash.to_string();
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash).unwrap_or(false))
        .await
        .map_err(|e| BcryptError::Io(e.into()))
}
