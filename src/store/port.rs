//! # User Store Port
//!
//! The persistence abstraction the identity resolver and session codec
//! depend on. Implementations must make [`UserStore::insert_if_absent`]
//! atomic per id: under concurrent first logins for the same id exactly
//! one insert wins and every other caller gets
//! [`StoreError::AlreadyExists`].

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::identity::{UserId, UserRecord};

/// Failures reported by a [`UserStore`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A record with this id is already persisted.
    #[error("record {0} already exists")]
    AlreadyExists(String),

    #[error("store call timed out after {0:?}")]
    Timeout(Duration),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Persistence of [`UserRecord`]s keyed by canonical [`UserId`].
///
/// No update or delete is required by the identity lifecycle.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserRecord>, StoreError>;

    /// Persists `record` unless its id is taken, returning the stored record.
    async fn insert_if_absent(&self, record: UserRecord) -> Result<UserRecord, StoreError>;

    async fn exists(&self, id: &UserId) -> Result<bool, StoreError>;
}

/// Bounds a store call; an elapsed limit becomes [`StoreError::Timeout`].
pub async fn with_timeout<T, F>(limit: Duration, fut: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| StoreError::Timeout(limit))?
}
