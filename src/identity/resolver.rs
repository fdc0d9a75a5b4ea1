//! # Identity Resolver
//!
//! Turns an authentication event into a persisted [`UserRecord`].
//!
//! - Federated: derive `username@provider`, look it up, and insert on first
//!   sight. Concurrent first logins converge on one record: the loser of
//!   the insert race re-reads the winner's row.
//! - Local: look up `id@local` and verify the secret against the stored
//!   hash.
//! - Registration: create a local account with a hashed secret and a
//!   generated avatar reference.
//!
//! Every store call is bounded by the configured timeout; an elapsed limit
//! surfaces as [`AuthError::StoreUnavailable`].

use std::sync::Arc;
use std::time::Duration;

use crate::error::AuthError;
use crate::identity::avatar::avatar_url_for;
use crate::identity::profile::{AuthOutcome, Credentials, FederatedProfile};
use crate::identity::secret::{hash_secret, verify_secret_or_decoy};
use crate::identity::user::{AuthStrategy, UserId, UserRecord, MAX_ID_LEN};
use crate::store::{with_timeout, StoreError, UserStore};

#[derive(Clone)]
pub struct IdentityResolver {
    store: Arc<dyn UserStore>,
    timeout: Duration,
}

impl IdentityResolver {
    pub fn new(store: Arc<dyn UserStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    /// Dispatches on the credential kind.
    ///
    /// Federated profiles are trusted once the provider has vouched for
    /// them, so that path always yields [`AuthOutcome::Authenticated`].
    pub async fn resolve(&self, credentials: Credentials) -> Result<AuthOutcome, AuthError> {
        match credentials {
            Credentials::Federated(profile) => self
                .resolve_federated(&profile)
                .await
                .map(AuthOutcome::Authenticated),
            Credentials::Local { id, secret } => self.resolve_local(&id, &secret).await,
        }
    }

    /// Finds or creates the record for a provider profile.
    pub async fn resolve_federated(
        &self,
        profile: &FederatedProfile,
    ) -> Result<UserRecord, AuthError> {
        profile.validate()?;
        let id = profile.user_id();

        if let Some(existing) = self.find(&id).await? {
            tracing::debug!(user_id = %id, "federated user already known");
            return Ok(existing);
        }

        match self.insert(profile.to_record()).await {
            Ok(created) => {
                tracing::info!(user_id = %id, provider = %profile.provider, "first federated login, user created");
                Ok(created)
            }
            Err(StoreError::AlreadyExists(_)) => {
                tracing::debug!(user_id = %id, "lost first-login race, reading winner");
                self.find(&id).await?.ok_or_else(|| {
                    AuthError::Internal(format!("{id} reported as existing but not found"))
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Checks a local id and secret.
    ///
    /// The rejection reason tells "no such id" apart from "wrong secret";
    /// the HTTP layer collapses both into one message. Both paths run one
    /// Argon2 verification.
    pub async fn resolve_local(&self, id: &str, secret: &str) -> Result<AuthOutcome, AuthError> {
        let id = parse_local_id(id)?;

        let Some(record) = self.find(&id).await? else {
            verify_blocking(None, secret.to_string()).await?;
            tracing::warn!(user_id = %id, "local login rejected: unknown id");
            return Ok(AuthOutcome::Rejected(format!("no account with id {id}")));
        };

        let matches = verify_blocking(record.password_hash.clone(), secret.to_string()).await?;

        if matches {
            tracing::debug!(user_id = %id, "local login accepted");
            Ok(AuthOutcome::Authenticated(record))
        } else {
            tracing::warn!(user_id = %id, "local login rejected: incorrect password");
            Ok(AuthOutcome::Rejected("incorrect password".to_string()))
        }
    }

    /// Registers a local account.
    pub async fn create(&self, id: &str, secret: &str) -> Result<UserRecord, AuthError> {
        let id = parse_local_id(id)?;
        if secret.is_empty() {
            return Err(AuthError::InvalidRequest("password must not be empty".into()));
        }

        let exists = with_timeout(self.timeout, self.store.exists(&id)).await?;
        if exists {
            tracing::warn!(user_id = %id, "registration rejected: id taken");
            return Err(AuthError::DuplicateAccount(id.into_string()));
        }

        let password_hash = hash_blocking(secret.to_string()).await?;
        let record = UserRecord {
            display_name: id.username().to_string(),
            auth_strategy: AuthStrategy::Local,
            profile_image_url: avatar_url_for(&id),
            password_hash: Some(password_hash),
            id,
        };

        let created = self.insert(record).await?;
        tracing::info!(user_id = %created.id, "local account created");
        Ok(created)
    }

    async fn find(&self, id: &UserId) -> Result<Option<UserRecord>, AuthError> {
        Ok(with_timeout(self.timeout, self.store.find_by_id(id)).await?)
    }

    async fn insert(&self, record: UserRecord) -> Result<UserRecord, StoreError> {
        with_timeout(self.timeout, self.store.insert_if_absent(record)).await
    }
}

fn parse_local_id(input: &str) -> Result<UserId, AuthError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AuthError::InvalidRequest("id must not be empty".into()));
    }
    let id = UserId::local(trimmed);
    if id.as_str().len() > MAX_ID_LEN {
        return Err(AuthError::InvalidRequest(format!(
            "id must be at most {MAX_ID_LEN} bytes"
        )));
    }
    Ok(id)
}

async fn hash_blocking(secret: String) -> Result<String, AuthError> {
    tokio::task::spawn_blocking(move || hash_secret(&secret))
        .await
        .map_err(|e| AuthError::Internal(format!("hashing task failed: {e}")))?
        .map_err(|e| AuthError::Internal(format!("{e:#}")))
}

async fn verify_blocking(stored: Option<String>, secret: String) -> Result<bool, AuthError> {
    tokio::task::spawn_blocking(move || verify_secret_or_decoy(stored.as_deref(), &secret))
        .await
        .map_err(|e| AuthError::Internal(format!("verification task failed: {e}")))
}
