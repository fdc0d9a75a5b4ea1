use std::fmt;

use serde::{Deserialize, Serialize};

use crate::identity::UserId;

/// What the server-side session stores for a logged-in user: the canonical
/// user id and nothing else.
///
/// The persisted [`UserRecord`](crate::identity::UserRecord) stays the
/// single source of truth and is re-read on every request.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(UserId);

impl SessionToken {
    pub fn new(id: UserId) -> Self {
        Self(id)
    }

    pub fn user_id(&self) -> &UserId {
        &self.0
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_the_bare_id() {
        let token = SessionToken::new(UserId::local("alice"));

        assert_eq!(serde_json::to_string(&token).unwrap(), r#""alice@local""#);
        let back: SessionToken = serde_json::from_str(r#""alice@local""#).unwrap();
        assert_eq!(back, token);
    }
}
