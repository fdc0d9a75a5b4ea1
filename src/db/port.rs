//! # Database Port (Synchronous)
//!
//! Abstract database interface (`Db`) and the value types passed across it.
//! The MySQL user and session stores are written against this port, so they
//! can be tested with an in-process fake instead of a live server.
//!
//! - [`Param`]: SQL parameters.
//! - [`Value`] / [`Row`]: owned data returned by queries.
//! - [`Db`]: minimal operations (`fetch_one`, `exec`).
//! - [`DuplicateKey`]: the one write failure callers branch on.
//!
//! # Example
//! ```rust,ignore
//! use session_identity::db::port::{is_duplicate_key, Db, Param};
//! use session_identity::params;
//!
//! let ps = params!["octocat@github", "octocat", None::<&str>];
//! match db.exec("INSERT INTO users VALUES (?, ?, ?)", &ps) {
//!     Err(e) if is_duplicate_key(&e) => { /* id taken */ }
//!     other => { other?; }
//! }
//! ```
use std::collections::HashMap;

use anyhow::{bail, Result};
use thiserror::Error;

/// SQL parameter types passed to a query.
///
/// - `Str(&str)` holds a borrowed string reference.
/// - `Null` represents an SQL NULL.
#[derive(Debug, Clone, PartialEq)]
pub enum Param<'a> {
    I64(i64),
    Str(&'a str),
    Null,
}

/// Generic owned database value used for row mapping.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    I64(i64),
    Str(String),
    Null,
}

/// A single database row (column name → value map).
#[derive(Debug, Clone, Default)]
pub struct Row {
    cols: HashMap<String, Value>,
}

/// A write collided with an existing primary or unique key.
///
/// [`Db::exec`] returns it unwrapped so callers can test for it with
/// [`is_duplicate_key`].
#[derive(Debug, Error)]
#[error("duplicate key: {0}")]
pub struct DuplicateKey(pub String);

pub fn is_duplicate_key(err: &anyhow::Error) -> bool {
    err.downcast_ref::<DuplicateKey>().is_some()
}

impl From<i64> for Param<'_> {
    fn from(x: i64) -> Self {
        Param::I64(x)
    }
}

impl<'a> From<&'a str> for Param<'a> {
    fn from(x: &'a str) -> Self {
        Param::Str(x)
    }
}

impl<'a> From<&'a String> for Param<'a> {
    fn from(x: &'a String) -> Self {
        Param::Str(x.as_str())
    }
}

impl<'a> From<Option<&'a str>> for Param<'a> {
    fn from(x: Option<&'a str>) -> Self {
        match x {
            Some(s) => Param::Str(s),
            None => Param::Null,
        }
    }
}

/// Builds a `Vec<Param>` for SQL queries.
///
/// # Example
/// ```rust
/// use session_identity::db::port::Param;
/// use session_identity::params;
///
/// let hash: Option<&str> = None;
/// let ps = params!["alice@local", 1_700_000_000i64, hash];
/// assert!(matches!(ps[0], Param::Str("alice@local")));
/// assert!(matches!(ps[1], Param::I64(1_700_000_000)));
/// assert!(matches!(ps[2], Param::Null));
/// ```
#[macro_export]
macro_rules! params {
    ($($x:expr),* $(,)?) => {{
        let mut v = Vec::<$crate::db::port::Param>::new();
        $( v.push($crate::db::port::Param::from($x)); )*
        v
    }};
}

impl Row {
    /// Inserts a new column (used by DB adapters and test fakes).
    pub fn insert(&mut self, key: impl Into<String>, val: Value) {
        self.cols.insert(key.into(), val);
    }

    pub fn get_i64(&self, key: &str) -> Result<i64> {
        match self.cols.get(key) {
            Some(Value::I64(v)) => Ok(*v),
            _ => bail!("column `{key}` is not I64"),
        }
    }

    /// Returns a `String` (only for `Value::Str`).
    pub fn get_string(&self, key: &str) -> Result<String> {
        match self.cols.get(key) {
            Some(Value::Str(s)) => Ok(s.clone()),
            _ => bail!("column `{key}` is not String"),
        }
    }

    /// Returns an optional `String` (`NULL` → `None`).
    pub fn get_string_opt(&self, key: &str) -> Result<Option<String>> {
        match self.cols.get(key) {
            Some(Value::Str(s)) => Ok(Some(s.clone())),
            Some(Value::Null) => Ok(None),
            Some(_) => bail!("column `{key}` is not String/NULL"),
            None => bail!("column `{key}` not found"),
        }
    }
}

/// Database abstraction (synchronous).
///
/// Async callers run these methods on the blocking thread pool.
pub trait Db: Send + Sync + 'static {
    fn fetch_one(&self, sql: &str, params: &[Param]) -> Result<Option<Row>>;

    /// Execute a write operation (`INSERT`, `UPDATE`, `DELETE`).
    ///
    /// Returns affected row count, or [`DuplicateKey`] when an insert hits
    /// an existing key.
    fn exec(&self, sql: &str, params: &[Param]) -> Result<u64>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn params_macro_and_from_impls_work() {
        let hash: Option<&str> = None;
        let owned = String::from("owned");
        let v = params![-5i64, "abc", hash, &owned];

        assert!(matches!(v[0], Param::I64(-5)));
        assert!(matches!(v[1], Param::Str("abc")));
        assert!(matches!(v[2], Param::Null));
        assert!(matches!(v[3], Param::Str("owned")));
    }

    #[test]
    fn row_getters_happy_paths() {
        let mut r = Row::default();
        r.insert("expiry", Value::I64(7));
        r.insert("str", Value::Str("hello".into()));
        r.insert("opt_str", Value::Null);

        assert_eq!(r.get_i64("expiry").unwrap(), 7);
        assert_eq!(r.get_string("str").unwrap(), "hello");
        assert_eq!(r.get_string_opt("opt_str").unwrap(), None);
        assert_eq!(r.get_string_opt("str").unwrap().as_deref(), Some("hello"));
    }

    #[test]
    fn row_getters_type_mismatch_errors() {
        let mut r = Row::default();
        r.insert("x", Value::Str("abc".into()));

        let e = r.get_i64("x").unwrap_err().to_string();
        assert!(e.contains("is not I64"));

        let e = r.get_string_opt("missing").unwrap_err().to_string();
        assert!(e.contains("not found"));
    }

    #[test]
    fn duplicate_key_is_recognised_only_for_its_own_type() {
        let dup = anyhow::Error::new(DuplicateKey("users.PRIMARY".into()));
        assert!(is_duplicate_key(&dup));

        let other = anyhow::anyhow!("connection refused");
        assert!(!is_duplicate_key(&other));

        let wrapped: Result<()> = Err(DuplicateKey("x".into())).context("insert failed");
        assert!(is_duplicate_key(&wrapped.unwrap_err()));
    }
}
