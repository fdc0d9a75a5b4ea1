//! # Request Session Context
//!
//! The browser session itself is managed by `tower-sessions`: a signed
//! cookie carries the session id, the record lives in a server-side store
//! and expires after the configured TTL of inactivity. The layer is built
//! in [`build_router`](crate::web::build_router).
//!
//! [`SessionContext`] is the per-request view handlers work with. It keeps
//! two entries in the session:
//!
//! - [`TOKEN_KEY`]: the id-only [`SessionToken`] of the logged-in user
//! - [`OAUTH_STATE_KEY`]: the pending OAuth `state`, single use
//!
//! The token is decoded only when a handler asks for
//! [`SessionContext::state`]; logging out never consults the user store.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tower_sessions::Session;

use crate::error::AuthError;
use crate::identity::UserRecord;
use crate::session::{SessionCodec, SessionState, SessionToken};
use crate::web::state::AppState;

pub const TOKEN_KEY: &str = "user";
pub const OAUTH_STATE_KEY: &str = "oauth_state";

pub struct SessionContext {
    session: Session,
    codec: SessionCodec,
}

impl FromRequestParts<AppState> for SessionContext {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, app: &AppState) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, app)
            .await
            .map_err(|(_, msg)| AuthError::Internal(msg.to_string()))?;

        Ok(Self {
            session,
            codec: app.codec.clone(),
        })
    }
}

impl SessionContext {
    /// The stored token, without looking the user up.
    pub async fn token(&self) -> Result<Option<SessionToken>, AuthError> {
        Ok(self.session.get(TOKEN_KEY).await?)
    }

    /// Decodes the session. A token whose user is gone is dropped and the
    /// session continues as anonymous.
    pub async fn state(&self) -> Result<SessionState, AuthError> {
        let Some(token) = self.token().await? else {
            return Ok(SessionState::Anonymous);
        };

        let state = SessionState::from_decoded(self.codec.decode(&token).await)?;
        if !state.is_authenticated() {
            tracing::info!(user_id = %token, "dropping stale session token");
            self.session.remove::<SessionToken>(TOKEN_KEY).await?;
        }
        Ok(state)
    }

    /// Stores the id-only token for `user`. The session id is kept as is.
    pub async fn login(&self, user: UserRecord) -> Result<SessionState, AuthError> {
        self.session.insert(TOKEN_KEY, self.codec.encode(&user)).await?;
        Ok(SessionState::Authenticated(user))
    }

    /// Forgets everything held for this browser and clears the cookie.
    pub async fn logout(&self) -> Result<(), AuthError> {
        Ok(self.session.flush().await?)
    }

    pub async fn begin_oauth(&self, state: String) -> Result<(), AuthError> {
        Ok(self.session.insert(OAUTH_STATE_KEY, state).await?)
    }

    /// Returns the pending OAuth `state` and removes it.
    pub async fn take_oauth_state(&self) -> Result<Option<String>, AuthError> {
        Ok(self.session.remove(OAUTH_STATE_KEY).await?)
    }
}
