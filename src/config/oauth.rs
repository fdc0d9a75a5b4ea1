//! # OAuth Provider Configuration
//!
//! Reads the GitHub OAuth application credentials. Federated login is only
//! enabled when all three variables are present:
//!
//! - `GITHUB_CLIENT_ID`
//! - `GITHUB_CLIENT_SECRET`
//! - `GITHUB_CALLBACK_URL` (e.g. `http://localhost:4001/auth/github/callback`)

use crate::config::env::read_string_from;

/// Credentials of a registered OAuth application.
#[derive(Clone, PartialEq, Eq)]
pub struct OAuthProviderConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

impl std::fmt::Debug for OAuthProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthProviderConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("redirect_uri", &self.redirect_uri)
            .finish()
    }
}

impl OAuthProviderConfig {
    /// Loads the GitHub application through `get`.
    ///
    /// Returns `None` if any variable is missing or blank.
    pub fn github_from_env_with<F>(get: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Some(Self {
            client_id: read_string_from(&get, "GITHUB_CLIENT_ID")?,
            client_secret: read_string_from(&get, "GITHUB_CLIENT_SECRET")?,
            redirect_uri: read_string_from(&get, "GITHUB_CALLBACK_URL")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn full_env() -> HashMap<String, String> {
        HashMap::from([
            ("GITHUB_CLIENT_ID".to_string(), "client".to_string()),
            ("GITHUB_CLIENT_SECRET".to_string(), "shh".to_string()),
            (
                "GITHUB_CALLBACK_URL".to_string(),
                "http://localhost:4001/auth/github/callback".to_string(),
            ),
        ])
    }

    #[test]
    fn enabled_when_all_variables_present() {
        let env = full_env();
        let cfg = OAuthProviderConfig::github_from_env_with(|k| env.get(k).cloned())
            .expect("github config");

        assert_eq!(cfg.client_id, "client");
        assert_eq!(cfg.client_secret, "shh");
        assert!(cfg.redirect_uri.ends_with("/auth/github/callback"));
    }

    #[test]
    fn disabled_when_any_variable_missing() {
        for missing in ["GITHUB_CLIENT_ID", "GITHUB_CLIENT_SECRET", "GITHUB_CALLBACK_URL"] {
            let mut env = full_env();
            env.remove(missing);
            let cfg = OAuthProviderConfig::github_from_env_with(|k| env.get(k).cloned());
            assert!(cfg.is_none(), "expected None without {missing}");
        }
    }

    #[test]
    fn debug_output_hides_client_secret() {
        let env = full_env();
        let cfg = OAuthProviderConfig::github_from_env_with(|k| env.get(k).cloned()).unwrap();
        assert!(!format!("{cfg:?}").contains("shh"));
    }
}
