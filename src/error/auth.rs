use thiserror::Error;

use crate::store::StoreError;

/// Errors produced by the session-identity lifecycle.
///
/// Every variant is scoped to a single request; none is fatal to the
/// process.
///
/// # Example
/// ```
/// use session_identity::error::AuthError;
///
/// let err = AuthError::DuplicateAccount("alice@local".into());
/// assert_eq!(err.to_string(), "an account with id alice@local already exists");
/// assert!(!err.is_transient());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Unknown id or wrong secret. The reason is for logs, not for clients.
    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("an account with id {0} already exists")]
    DuplicateAccount(String),

    /// The session token names a user that no longer exists.
    #[error("session refers to a user that no longer exists")]
    StaleSession,

    /// Timeout or connection failure; safe to retry.
    #[error("user store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The federated identity provider failed or returned garbage.
    #[error("identity provider error: {0}")]
    Provider(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Returns `true` for failures the caller may retry unchanged.
    pub fn is_transient(&self) -> bool {
        matches!(self, AuthError::StoreUnavailable(_))
    }
}

/// Session storage failures are retryable; a value that does not
/// (de)serialize is a bug.
impl From<tower_sessions::session::Error> for AuthError {
    fn from(err: tower_sessions::session::Error) -> Self {
        match err {
            tower_sessions::session::Error::Store(e) => {
                AuthError::StoreUnavailable(format!("session store: {e}"))
            }
            other => AuthError::Internal(format!("session: {other}")),
        }
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::AlreadyExists(id) => AuthError::DuplicateAccount(id),
            StoreError::Timeout(_) | StoreError::Unavailable(_) => {
                AuthError::StoreUnavailable(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn store_errors_map_to_auth_errors() {
        assert_eq!(
            AuthError::from(StoreError::AlreadyExists("bob@local".into())),
            AuthError::DuplicateAccount("bob@local".into())
        );

        let timeout = AuthError::from(StoreError::Timeout(Duration::from_millis(5)));
        assert!(matches!(timeout, AuthError::StoreUnavailable(_)));
        assert!(timeout.is_transient());

        let down = AuthError::from(StoreError::Unavailable("connection refused".into()));
        assert!(down.to_string().contains("connection refused"));
    }

    #[test]
    fn session_store_failures_are_transient() {
        let err = AuthError::from(tower_sessions::session::Error::Store(
            tower_sessions::session_store::Error::Backend("connection refused".into()),
        ));
        assert!(err.is_transient());
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn only_store_unavailability_is_transient() {
        assert!(!AuthError::StaleSession.is_transient());
        assert!(!AuthError::InvalidCredentials("x".into()).is_transient());
        assert!(!AuthError::Provider("x".into()).is_transient());
    }
}
