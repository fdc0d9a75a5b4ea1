use crate::error::AuthError;
use crate::identity::UserRecord;

/// Authentication state of one browser session.
///
/// ```text
/// Anonymous --login--> Authenticated --logout | stale token | expiry--> Anonymous
/// ```
///
/// There is no terminal state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Anonymous,
    Authenticated(UserRecord),
}

impl SessionState {
    /// Folds the result of decoding a session token into a state.
    ///
    /// A stale token is not an error for the request; the session just
    /// becomes anonymous. Other failures propagate.
    pub fn from_decoded(decoded: Result<UserRecord, AuthError>) -> Result<Self, AuthError> {
        match decoded {
            Ok(user) => Ok(SessionState::Authenticated(user)),
            Err(AuthError::StaleSession) => Ok(SessionState::Anonymous),
            Err(e) => Err(e),
        }
    }

    pub fn user(&self) -> Option<&UserRecord> {
        match self {
            SessionState::Authenticated(user) => Some(user),
            SessionState::Anonymous => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::{AuthStrategy, UserId};

    fn bob() -> UserRecord {
        UserRecord {
            id: UserId::local("bob"),
            display_name: "bob".into(),
            auth_strategy: AuthStrategy::Local,
            profile_image_url: "https://example.com/b.png".into(),
            password_hash: None,
        }
    }

    #[test]
    fn defaults_to_anonymous() {
        let state = SessionState::default();
        assert!(!state.is_authenticated());
        assert_eq!(state.user(), None);
    }

    #[test]
    fn stale_token_becomes_anonymous() {
        assert_eq!(
            SessionState::from_decoded(Err(AuthError::StaleSession)),
            Ok(SessionState::Anonymous)
        );
    }

    #[test]
    fn decoded_user_authenticates_and_other_errors_propagate() {
        let state = SessionState::from_decoded(Ok(bob())).unwrap();
        assert_eq!(state.user(), Some(&bob()));

        let err = SessionState::from_decoded(Err(AuthError::StoreUnavailable("down".into())));
        assert!(matches!(err, Err(AuthError::StoreUnavailable(_))));
    }
}
