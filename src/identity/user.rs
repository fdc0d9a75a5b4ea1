//! Canonical user identity and the persisted user record.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Strategy suffix of locally registered accounts.
pub const LOCAL_STRATEGY: &str = "local";

/// Longest accepted canonical id, matching the `users.id` column.
pub const MAX_ID_LEN: usize = 255;

/// Canonical user identifier, `<username>@<strategy>`.
///
/// This is the only key users are stored and looked up by. It is derived
/// deterministically from (username, strategy) and never changes.
///
/// # Example
/// ```
/// use session_identity::identity::UserId;
///
/// assert_eq!(UserId::federated("octocat", "github").as_str(), "octocat@github");
/// assert_eq!(UserId::local("alice").as_str(), "alice@local");
/// assert_eq!(UserId::local("alice@local").as_str(), "alice@local");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Id for a user authenticated by an external provider.
    pub fn federated(username: &str, provider: &str) -> Self {
        Self(format!("{username}@{provider}"))
    }

    /// Id for a locally registered account. Input that already carries the
    /// `@local` suffix is taken as is.
    pub fn local(input: &str) -> Self {
        let suffix = format!("@{LOCAL_STRATEGY}");
        if input.ends_with(&suffix) {
            Self(input.to_string())
        } else {
            Self(format!("{input}{suffix}"))
        }
    }

    /// Wraps an id read back from storage or a session token.
    pub fn from_stored(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The part before the last `@`.
    pub fn username(&self) -> &str {
        self.0.rsplit_once('@').map_or(self.0.as_str(), |(user, _)| user)
    }

    /// The part after the last `@`.
    pub fn strategy(&self) -> &str {
        self.0.rsplit_once('@').map_or("", |(_, strategy)| strategy)
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How a user proves who they are.
///
/// The string form is the provider name for federated users
/// (`"github"`) and `"local"` otherwise.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum AuthStrategy {
    Federated(String),
    Local,
}

impl AuthStrategy {
    pub fn as_str(&self) -> &str {
        match self {
            AuthStrategy::Federated(provider) => provider,
            AuthStrategy::Local => LOCAL_STRATEGY,
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, AuthStrategy::Local)
    }
}

impl fmt::Display for AuthStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" => Err("auth strategy must not be empty".to_string()),
            LOCAL_STRATEGY => Ok(AuthStrategy::Local),
            provider => Ok(AuthStrategy::Federated(provider.to_string())),
        }
    }
}

impl From<AuthStrategy> for String {
    fn from(strategy: AuthStrategy) -> Self {
        strategy.as_str().to_string()
    }
}

impl TryFrom<String> for AuthStrategy {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A persisted user.
///
/// The JSON form is what the session probe returns to the client; the
/// password hash is never serialized.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: UserId,
    pub display_name: String,
    pub auth_strategy: AuthStrategy,
    pub profile_image_url: String,
    /// Argon2 PHC string; local accounts only.
    #[serde(skip_serializing, default)]
    pub password_hash: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_ids_are_suffixed_once() {
        assert_eq!(UserId::local("bob").as_str(), "bob@local");
        assert_eq!(UserId::local("bob@local").as_str(), "bob@local");
        assert_eq!(
            UserId::local("bob@example.com").as_str(),
            "bob@example.com@local"
        );
    }

    #[test]
    fn username_and_strategy_split_on_last_at() {
        let id = UserId::local("bob@example.com");
        assert_eq!(id.username(), "bob@example.com");
        assert_eq!(id.strategy(), "local");

        let id = UserId::federated("octocat", "github");
        assert_eq!(id.username(), "octocat");
        assert_eq!(id.strategy(), "github");

        let bare = UserId::from_stored("nobody");
        assert_eq!(bare.username(), "nobody");
        assert_eq!(bare.strategy(), "");
    }

    #[test]
    fn strategy_parses_from_strings() {
        assert_eq!("local".parse::<AuthStrategy>(), Ok(AuthStrategy::Local));
        assert_eq!(
            "github".parse::<AuthStrategy>(),
            Ok(AuthStrategy::Federated("github".into()))
        );
        assert!("  ".parse::<AuthStrategy>().is_err());
    }

    #[test]
    fn record_json_is_camel_case_without_password() {
        let record = UserRecord {
            id: UserId::local("alice"),
            display_name: "alice".into(),
            auth_strategy: AuthStrategy::Local,
            profile_image_url: "https://example.com/a.png".into(),
            password_hash: Some("$argon2id$secret".into()),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], "alice@local");
        assert_eq!(json["displayName"], "alice");
        assert_eq!(json["authStrategy"], "local");
        assert_eq!(json["profileImageUrl"], "https://example.com/a.png");
        assert!(json.get("passwordHash").is_none());
        assert!(!json.to_string().contains("argon2"));
    }

    #[test]
    fn record_deserializes_strategy_from_provider_name() {
        let record: UserRecord = serde_json::from_str(
            r#"{"id":"octocat@github","displayName":"octocat","authStrategy":"github","profileImageUrl":"https://x/y.png"}"#,
        )
        .unwrap();

        assert_eq!(record.auth_strategy, AuthStrategy::Federated("github".into()));
        assert_eq!(record.password_hash, None);
    }
}
