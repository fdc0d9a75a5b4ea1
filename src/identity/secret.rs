//! Salted one-way hashing of local account secrets (Argon2id, PHC strings).

use std::sync::OnceLock;

use anyhow::{anyhow, Result};
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

/// Hashes `secret` with a fresh random salt.
pub fn hash_secret(secret: &str) -> Result<String> {
    let salt_bytes: [u8; 16] = rand::random();
    let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| anyhow!(e.to_string()))?;
    let phc = Argon2::default()
        .hash_password(secret.as_bytes(), &salt)
        .map_err(|e| anyhow!(e.to_string()))?
        .to_string();
    Ok(phc)
}

/// Checks `secret` against a stored PHC string.
///
/// A malformed stored hash never verifies.
pub fn verify_secret(stored_hash: &str, secret: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(secret.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

/// Hash verified when there is no stored one, so an unknown id costs the
/// same Argon2 work as a known one.
fn decoy_hash() -> &'static str {
    static DECOY: OnceLock<String> = OnceLock::new();
    DECOY.get_or_init(|| hash_secret("decoy").unwrap_or_default())
}

/// Like [`verify_secret`], but a missing hash still pays for one
/// verification and then fails.
pub fn verify_secret_or_decoy(stored_hash: Option<&str>, secret: &str) -> bool {
    match stored_hash {
        Some(stored) => verify_secret(stored, secret),
        None => {
            let _ = verify_secret(decoy_hash(), secret);
            false
        }
    }
}
