//! Inputs and outputs of an authentication attempt.

use crate::error::AuthError;
use crate::identity::user::{AuthStrategy, UserId, UserRecord, LOCAL_STRATEGY, MAX_ID_LEN};

/// Profile returned by a federated identity provider after the code
/// exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FederatedProfile {
    pub username: String,
    /// Provider name, e.g. `"github"`. Becomes the id's strategy suffix.
    pub provider: String,
    /// Photo URLs, most preferred first.
    pub photos: Vec<String>,
}

impl FederatedProfile {
    /// Checks that the profile can be turned into a user record.
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.username.trim().is_empty() {
            return Err(AuthError::InvalidRequest("profile has no username".into()));
        }
        if self.provider.trim().is_empty() {
            return Err(AuthError::InvalidRequest("profile has no provider".into()));
        }
        if self.provider == LOCAL_STRATEGY {
            return Err(AuthError::InvalidRequest(format!(
                "provider name `{LOCAL_STRATEGY}` is reserved"
            )));
        }
        if self.user_id().as_str().len() > MAX_ID_LEN {
            return Err(AuthError::InvalidRequest(format!(
                "id must be at most {MAX_ID_LEN} bytes"
            )));
        }
        if self.photos.iter().all(|p| p.trim().is_empty()) {
            return Err(AuthError::InvalidRequest("profile has no photo".into()));
        }
        Ok(())
    }

    pub fn user_id(&self) -> UserId {
        UserId::federated(&self.username, &self.provider)
    }

    /// Builds the record persisted on first sight of this profile.
    ///
    /// Callers must [`validate`](Self::validate) first.
    pub fn to_record(&self) -> UserRecord {
        UserRecord {
            id: self.user_id(),
            display_name: self.username.clone(),
            auth_strategy: AuthStrategy::Federated(self.provider.clone()),
            profile_image_url: self
                .photos
                .iter()
                .find(|p| !p.trim().is_empty())
                .cloned()
                .unwrap_or_default(),
            password_hash: None,
        }
    }
}

/// What a client presents to authenticate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Credentials {
    Federated(FederatedProfile),
    Local { id: String, secret: String },
}

/// Result of a well-formed authentication attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthOutcome {
    Authenticated(UserRecord),
    Rejected(String),
}

impl AuthOutcome {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthOutcome::Authenticated(_))
    }

    /// Folds a rejection into [`AuthError::InvalidCredentials`].
    pub fn into_result(self) -> Result<UserRecord, AuthError> {
        match self {
            AuthOutcome::Authenticated(record) => Ok(record),
            AuthOutcome::Rejected(reason) => Err(AuthError::InvalidCredentials(reason)),
        }
    }
}
