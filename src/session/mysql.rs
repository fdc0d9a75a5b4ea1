//! # MySQL Session Store
//!
//! [`SessionStore`] for `tower-sessions` over the synchronous [`Db`] port,
//! used when a database is configured. Without one the server falls back
//! to the in-process `MemoryStore`.
//!
//! Expected table:
//!
//! ```sql
//! CREATE TABLE sessions (
//!     id          VARCHAR(64) NOT NULL PRIMARY KEY,
//!     data        TEXT        NOT NULL,
//!     expiry_date BIGINT      NOT NULL,
//!     INDEX sessions_expiry (expiry_date)
//! );
//! ```
//!
//! `data` is the session's key/value map as JSON and `expiry_date` a Unix
//! timestamp. Expired rows never load; [`ExpiredDeletion::delete_expired`]
//! removes them and is run periodically by the server.

use std::fmt;
use std::sync::Arc;

use ::time::OffsetDateTime;
use async_trait::async_trait;
use tower_sessions::session::{Id, Record};
use tower_sessions::session_store::{self, ExpiredDeletion, SessionStore};

use crate::db::port::{is_duplicate_key, Db};
use crate::params;
use crate::time::Clock;

const INSERT: &str = "INSERT INTO sessions (id, data, expiry_date) VALUES (?, ?, ?)";

const UPSERT: &str = "INSERT INTO sessions (id, data, expiry_date) VALUES (?, ?, ?) \
     ON DUPLICATE KEY UPDATE data = VALUES(data), expiry_date = VALUES(expiry_date)";

const SELECT_LIVE: &str = "SELECT data, expiry_date FROM sessions WHERE id = ? AND expiry_date > ?";

const DELETE_BY_ID: &str = "DELETE FROM sessions WHERE id = ?";

const DELETE_EXPIRED: &str = "DELETE FROM sessions WHERE expiry_date <= ?";

#[derive(Clone)]
pub struct MySqlSessionStore {
    db: Arc<dyn Db>,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for MySqlSessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MySqlSessionStore").finish_non_exhaustive()
    }
}

impl MySqlSessionStore {
    pub fn new(db: Arc<dyn Db>, clock: Arc<dyn Clock>) -> Self {
        Self { db, clock }
    }

    fn now(&self) -> i64 {
        self.clock.now().timestamp()
    }

    async fn run<T, F>(&self, op: &'static str, f: F) -> session_store::Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&dyn Db) -> anyhow::Result<T> + Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || f(db.as_ref()))
            .await
            .map_err(|e| session_store::Error::Backend(format!("{op} task failed: {e}")))?
            .map_err(|e| {
                tracing::warn!(op, error = %format!("{e:#}"), "session store call failed");
                session_store::Error::Backend(format!("{op}: {e:#}"))
            })
    }
}

fn encode_data(record: &Record) -> session_store::Result<String> {
    serde_json::to_string(&record.data).map_err(|e| session_store::Error::Encode(e.to_string()))
}

#[async_trait]
impl SessionStore for MySqlSessionStore {
    /// Inserts a new row, drawing a fresh id while the current one is taken.
    async fn create(&self, record: &mut Record) -> session_store::Result<()> {
        let data = encode_data(record)?;
        let expiry = record.expiry_date.unix_timestamp();
        let first = record.id;

        record.id = self
            .run("create", move |db| {
                let mut id = first;
                loop {
                    let key = id.to_string();
                    match db.exec(INSERT, &params![&key, &data, expiry]) {
                        Ok(_) => return Ok(id),
                        Err(e) if is_duplicate_key(&e) => id = Id::default(),
                        Err(e) => return Err(e),
                    }
                }
            })
            .await?;
        Ok(())
    }

    async fn save(&self, record: &Record) -> session_store::Result<()> {
        let key = record.id.to_string();
        let data = encode_data(record)?;
        let expiry = record.expiry_date.unix_timestamp();

        self.run("save", move |db| db.exec(UPSERT, &params![&key, &data, expiry]))
            .await?;
        Ok(())
    }

    async fn load(&self, id: &Id) -> session_store::Result<Option<Record>> {
        let key = id.to_string();
        let now = self.now();
        let row = self
            .run("load", move |db| db.fetch_one(SELECT_LIVE, &params![&key, now]))
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let decode = |e: String| session_store::Error::Decode(e);
        let data = row.get_string("data").map_err(|e| decode(e.to_string()))?;
        let expiry = row.get_i64("expiry_date").map_err(|e| decode(e.to_string()))?;

        Ok(Some(Record {
            id: *id,
            data: serde_json::from_str(&data).map_err(|e| decode(e.to_string()))?,
            expiry_date: OffsetDateTime::from_unix_timestamp(expiry)
                .map_err(|e| decode(e.to_string()))?,
        }))
    }

    async fn delete(&self, id: &Id) -> session_store::Result<()> {
        let key = id.to_string();
        self.run("delete", move |db| db.exec(DELETE_BY_ID, &params![&key]))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl ExpiredDeletion for MySqlSessionStore {
    async fn delete_expired(&self) -> session_store::Result<()> {
        let now = self.now();
        let dropped = self
            .run("delete_expired", move |db| db.exec(DELETE_EXPIRED, &params![now]))
            .await?;
        if dropped > 0 {
            tracing::debug!(dropped, "expired sessions deleted");
        }
        Ok(())
    }
}
