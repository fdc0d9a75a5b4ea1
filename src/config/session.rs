//! # Session Configuration
//!
//! Cookie and lifetime settings for the server-side session.
//!
//! The configuration reads from environment variables:
//! - `SESSION_SECRET`: base string used to derive the 64-byte cookie signing
//!   key (if missing, a random key is generated and sessions do not survive a
//!   restart)
//! - `SESSION_COOKIE_NAME`: cookie name (default: `sid`)
//! - `SESSION_TTL_SECS`: inactivity lifetime of a session (default: `60`)
//! - `SESSION_COOKIE_SECURE`: enables the `Secure` cookie flag (default: `false`)
//!
//! # Examples
//! ```rust
//! use session_identity::config::session::SessionConfig;
//!
//! let cfg = SessionConfig::from_env_with(|_| None);
//! assert_eq!(cfg.cookie_name, "sid");
//! assert_eq!(cfg.ttl.as_secs(), 60);
//! ```

use std::env as std_env;
use std::time::Duration;

use rand::RngCore;
use sha2::{Digest, Sha512};

use crate::config::env::{read_flag_from, read_string_from, read_u64_from};

/// Default cookie name carrying the session identifier.
pub const DEFAULT_COOKIE_NAME: &str = "sid";

/// Default session lifetime in seconds.
pub const DEFAULT_TTL_SECS: u64 = 60;

/// Configuration for the session cookie and session store.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Key material for signing the session cookie.
    pub secret: [u8; 64],
    pub cookie_name: String,
    /// Lifetime counted from the last request that touched the session.
    pub ttl: Duration,
    pub cookie_secure: bool,
    /// `true` when the secret came from `SESSION_SECRET` rather than being random.
    pub secret_from_env: bool,
}

impl std::fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConfig")
            .field("secret", &"<redacted>")
            .field("cookie_name", &self.cookie_name)
            .field("ttl", &self.ttl)
            .field("cookie_secure", &self.cookie_secure)
            .field("secret_from_env", &self.secret_from_env)
            .finish()
    }
}

impl SessionConfig {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_env_with(|k| std_env::var(k).ok())
    }

    /// Loads configuration using a custom key provider (for testing/mocking).
    pub fn from_env_with<F>(get: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let (secret, secret_from_env) = match read_string_from(&get, "SESSION_SECRET") {
            Some(s) => (derive_secret_from_string(&s), true),
            None => (random_secret(), false),
        };

        let ttl_secs = read_u64_from(&get, "SESSION_TTL_SECS", DEFAULT_TTL_SECS).max(1);

        Self {
            secret,
            cookie_name: read_string_from(&get, "SESSION_COOKIE_NAME")
                .unwrap_or_else(|| DEFAULT_COOKIE_NAME.to_string()),
            ttl: Duration::from_secs(ttl_secs),
            cookie_secure: read_flag_from(&get, "SESSION_COOKIE_SECURE", false),
            secret_from_env,
        }
    }
}

/// Derives a deterministic 64-byte signing key from a string.
pub fn derive_secret_from_string(s: &str) -> [u8; 64] {
    let digest = Sha512::digest(s.as_bytes());
    let mut key = [0u8; 64];
    key.copy_from_slice(&digest);
    key
}

/// Generates a new random 64-byte signing key.
pub fn random_secret() -> [u8; 64] {
    let mut key = [0u8; 64];
    rand::rng().fill_bytes(&mut key);
    key
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn from_env_with_uses_defaults_when_missing() {
        let cfg = SessionConfig::from_env_with(|_| None);

        assert_eq!(cfg.cookie_name, DEFAULT_COOKIE_NAME);
        assert_eq!(cfg.ttl, Duration::from_secs(DEFAULT_TTL_SECS));
        assert!(!cfg.cookie_secure);
        assert!(!cfg.secret_from_env);
    }

    #[test]
    fn from_env_with_respects_secret_and_flags() {
        let mut fake = HashMap::<String, String>::new();
        fake.insert("SESSION_SECRET".into(), "speedgolf".into());
        fake.insert("SESSION_COOKIE_NAME".into(), "app.sid".into());
        fake.insert("SESSION_TTL_SECS".into(), "3600".into());
        fake.insert("SESSION_COOKIE_SECURE".into(), "yes".into());

        let cfg = SessionConfig::from_env_with(|k| fake.get(k).cloned());

        assert_eq!(cfg.secret, derive_secret_from_string("speedgolf"));
        assert!(cfg.secret_from_env);
        assert_eq!(cfg.cookie_name, "app.sid");
        assert_eq!(cfg.ttl, Duration::from_secs(3600));
        assert!(cfg.cookie_secure);
    }

    #[test]
    fn zero_ttl_is_clamped_to_one_second() {
        let cfg = SessionConfig::from_env_with(|k| {
            (k == "SESSION_TTL_SECS").then(|| "0".to_string())
        });
        assert_eq!(cfg.ttl, Duration::from_secs(1));
    }

    #[test]
    fn random_secrets_vary_across_loads() {
        let a = SessionConfig::from_env_with(|_| None);
        let b = SessionConfig::from_env_with(|_| None);
        assert_ne!(a.secret, b.secret);
    }

    #[test]
    fn derive_secret_is_stable() {
        assert_eq!(derive_secret_from_string("abc"), derive_secret_from_string("abc"));
        assert_ne!(derive_secret_from_string("abc"), derive_secret_from_string("xyz"));
    }

    #[test]
    fn debug_output_redacts_secret() {
        let cfg = SessionConfig::from_env_with(|_| Some("value".into()));
        let dbg = format!("{cfg:?}");
        assert!(dbg.contains("<redacted>"));
    }
}
