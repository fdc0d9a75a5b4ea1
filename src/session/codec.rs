//! # Session Codec
//!
//! `encode` reduces a user to its id; `decode` re-reads the record from the
//! [`UserStore`] on every request. A token whose user is gone decodes to
//! [`AuthError::StaleSession`] and the caller drops back to anonymous.

use std::sync::Arc;
use std::time::Duration;

use crate::error::AuthError;
use crate::identity::UserRecord;
use crate::session::token::SessionToken;
use crate::store::{with_timeout, UserStore};

#[derive(Clone)]
pub struct SessionCodec {
    store: Arc<dyn UserStore>,
    timeout: Duration,
}

impl SessionCodec {
    pub fn new(store: Arc<dyn UserStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    pub fn encode(&self, user: &UserRecord) -> SessionToken {
        SessionToken::new(user.id.clone())
    }

    pub async fn decode(&self, token: &SessionToken) -> Result<UserRecord, AuthError> {
        let found = with_timeout(self.timeout, self.store.find_by_id(token.user_id())).await?;
        found.ok_or_else(|| {
            tracing::info!(user_id = %token, "session token refers to a missing user");
            AuthError::StaleSession
        })
    }
}
