//! # MySQL User Store
//!
//! [`UserStore`] over the synchronous [`Db`] port. Calls run on the
//! blocking thread pool so they never stall the async runtime.
//!
//! Expected table (creating it is left to the deployment):
//!
//! ```sql
//! CREATE TABLE users (
//!     id                VARCHAR(255) NOT NULL PRIMARY KEY,
//!     display_name      VARCHAR(255) NOT NULL,
//!     auth_strategy     VARCHAR(64)  NOT NULL,
//!     profile_image_url TEXT         NOT NULL,
//!     password_hash     VARCHAR(255) NULL
//! );
//! ```
//!
//! The primary key on `id` provides at-most-one-insert semantics: a plain
//! `INSERT` of a taken id fails with a duplicate-key error, which becomes
//! [`StoreError::AlreadyExists`]. Every other write failure, including an
//! overlong value under strict SQL mode, is [`StoreError::Unavailable`].

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;

use crate::db::port::{is_duplicate_key, Db, Row};
use crate::identity::{AuthStrategy, UserId, UserRecord};
use crate::params;
use crate::store::port::{StoreError, UserStore};

const SELECT_BY_ID: &str = "SELECT id, display_name, auth_strategy, profile_image_url, password_hash \
     FROM users WHERE id = ?";

const INSERT: &str = "INSERT INTO users \
     (id, display_name, auth_strategy, profile_image_url, password_hash) \
     VALUES (?, ?, ?, ?, ?)";

const EXISTS_BY_ID: &str = "SELECT 1 AS present FROM users WHERE id = ? LIMIT 1";

/// [`UserStore`] backed by a `users` table.
#[derive(Clone)]
pub struct MySqlUserStore {
    db: Arc<dyn Db>,
}

impl MySqlUserStore {
    pub fn new(db: Arc<dyn Db>) -> Self {
        Self { db }
    }

    async fn run<T, F>(&self, op: &'static str, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&dyn Db) -> anyhow::Result<T> + Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || f(db.as_ref()))
            .await
            .map_err(|e| StoreError::Unavailable(format!("{op} task failed: {e}")))?
            .map_err(|e| {
                tracing::warn!(op, error = %format!("{e:#}"), "user store call failed");
                StoreError::Unavailable(format!("{op}: {e:#}"))
            })
    }
}

fn record_from_row(row: &Row) -> anyhow::Result<UserRecord> {
    let strategy = row.get_string("auth_strategy")?;
    Ok(UserRecord {
        id: UserId::from_stored(row.get_string("id")?),
        display_name: row.get_string("display_name")?,
        auth_strategy: strategy
            .parse::<AuthStrategy>()
            .map_err(anyhow::Error::msg)
            .context("column `auth_strategy` is invalid")?,
        profile_image_url: row.get_string("profile_image_url")?,
        password_hash: row.get_string_opt("password_hash")?,
    })
}

#[async_trait]
impl UserStore for MySqlUserStore {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserRecord>, StoreError> {
        let id = id.as_str().to_string();
        self.run("find_by_id", move |db| {
            db.fetch_one(SELECT_BY_ID, &params![&id])?
                .as_ref()
                .map(record_from_row)
                .transpose()
        })
        .await
    }

    async fn insert_if_absent(&self, record: UserRecord) -> Result<UserRecord, StoreError> {
        let inserted = self
            .run("insert_if_absent", {
                let record = record.clone();
                move |db| {
                    let strategy = record.auth_strategy.to_string();
                    let written = db.exec(
                        INSERT,
                        &params![
                            record.id.as_str(),
                            &record.display_name,
                            &strategy,
                            &record.profile_image_url,
                            record.password_hash.as_deref(),
                        ],
                    );
                    match written {
                        Ok(_) => Ok(true),
                        Err(e) if is_duplicate_key(&e) => Ok(false),
                        Err(e) => Err(e),
                    }
                }
            })
            .await?;

        if !inserted {
            return Err(StoreError::AlreadyExists(record.id.into_string()));
        }
        Ok(record)
    }

    async fn exists(&self, id: &UserId) -> Result<bool, StoreError> {
        let id = id.as_str().to_string();
        self.run("exists", move |db| {
            Ok(db.fetch_one(EXISTS_BY_ID, &params![&id])?.is_some())
        })
        .await
    }
}
