//! Argon2id password hashing.
//!
//! Hashing runs on the blocking pool so request tasks are not stalled by the
//! key derivation.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use serde_json::json;

use crate::error::AppError;

const SALT_LENGTH_BYTES: usize = 16;

/// Produces a PHC-formatted Argon2id hash.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if salt generation or hashing fails.
pub fn hash_password_blocking(password: &str) -> Result<String, AppError> {
    let mut salt_bytes = [0u8; SALT_LENGTH_BYTES];
    getrandom::fill(&mut salt_bytes).map_err(|e| {
        AppError::internal("Failed to generate salt", json!({ "reason": e.to_string() }))
    })?;

    let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| {
        AppError::internal("Failed to encode salt", json!({ "reason": e.to_string() }))
    })?;

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            AppError::internal("Failed to hash password", json!({ "reason": e.to_string() }))
        })
}

/// Checks a password against a stored hash. Malformed hashes never match.
pub fn verify_password_blocking(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

pub async fn hash_password(password: String) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || hash_password_blocking(&password))
        .await
        .map_err(|e| {
            AppError::internal("Password hashing task failed", json!({ "reason": e.to_string() }))
        })?
}

pub async fn verify_password(password: String, hash: String) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || verify_password_blocking(&password, &hash))
        .await
        .map_err(|e| {
            AppError::internal(
                "Password verification task failed",
                json!({ "reason": e.to_string() }),
            )
        })
}
