use sha2::{Digest, Sha256};

use crate::identity::user::UserId;

/// Avatar service keyed by a hash of the account id.
pub const AVATAR_BASE_URL: &str = "https://www.gravatar.com/avatar/";

/// Deterministic avatar reference for a locally registered account.
///
/// The id is trimmed and lowercased, hashed with SHA-256 and used as the
/// lookup key; accounts unknown to the service get a generated identicon.
pub fn avatar_url_for(id: &UserId) -> String {
    let digest = Sha256::digest(id.as_str().trim().to_lowercase().as_bytes());
    format!("{AVATAR_BASE_URL}{digest:x}?d=identicon")
}
