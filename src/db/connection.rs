//! # MySQL Connection Pool Factory
//!
//! Builds a [`mysql::Pool`] from [`DbConfig`] for the composition root.
//! Nothing is cached globally; the caller owns the pool's lifecycle.

use crate::config::db::{create_pool, DbConfig, DbPool};

/// Creates a new MySQL connection pool using the given configuration.
///
/// # Errors
/// Fails when `DATABASE_URL` is missing or invalid, or when the pool
/// cannot be created. The error carries that context for startup logs.
///
/// # Example
/// ```rust,no_run
/// use session_identity::config::db::DbConfig;
/// use session_identity::db::connection::get_pool;
///
/// let cfg = DbConfig::from_env();
/// let pool = get_pool(&cfg)?;
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn get_pool(cfg: &DbConfig) -> anyhow::Result<DbPool> {
    use anyhow::Context;

    create_pool(cfg).context("failed to initialize MySQL connection pool")
}
