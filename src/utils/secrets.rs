//! Random secrets and keyed hashing.
//!
//! Verification and reset tokens come from `getrandom` encoded as URL-safe
//! base64; OTPs are uniformly drawn six-digit numbers. Secrets that must be
//! looked up later are stored as HMAC-SHA256 digests keyed by the server
//! signing secret.

use base64::Engine as _;
use hmac::{Hmac, Mac};
use rand::Rng;
use serde_json::json;
use sha2::Sha256;

use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

/// Random bytes behind a 64-character token.
const TOKEN_LENGTH_BYTES: usize = 48;

/// Number of digits in a phone verification code.
pub const OTP_LENGTH: usize = 6;

/// Generates a 64-character URL-safe random token.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if the system random number generator fails.
pub fn generate_token() -> Result<String, AppError> {
    let mut buffer = [0u8; TOKEN_LENGTH_BYTES];

    getrandom::fill(&mut buffer).map_err(|e| {
        AppError::internal(
            "Failed to generate random token",
            json!({ "reason": e.to_string() }),
        )
    })?;

    Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buffer))
}

/// Generates a zero-padded six-digit one-time passcode.
pub fn generate_otp() -> String {
    let code: u32 = rand::rng().random_range(0..1_000_000);
    format!("{code:0width$}", width = OTP_LENGTH)
}

/// Hashes a token with HMAC-SHA256 keyed by `secret`.
///
/// Returns a 64-character lowercase hex-encoded MAC.
pub fn hash_token(secret: &str, token: &str) -> String {
    hex::encode(mac_for(secret, token).finalize().into_bytes())
}

/// Compares a token with a stored [`hash_token`] digest in constant time.
pub fn verify_token(secret: &str, token: &str, expected_hex: &str) -> bool {
    let Ok(expected) = hex::decode(expected_hex) else {
        return false;
    };
    mac_for(secret, token).verify_slice(&expected).is_ok()
}

fn mac_for(secret: &str, token: &str) -> HmacSha256 {
    let mut mac = <HmacSha256 as Mac>::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts any key length");
    mac.update(token.as_bytes());
    mac
}
