//! # MySQL Database Adapter
//!
//! An implementation of the [`Db`] port using the [`mysql`] driver crate.
//!
//! ## Responsibilities
//! - Convert generic [`Param`] values into [`mysql::Value`]
//! - Convert [`mysql::Row`] into a generic [`Row`]
//! - Implement `fetch_one` and `exec` using `mysql::Pool`
//! - Report duplicate-key writes (`ER_DUP_ENTRY`) as [`DuplicateKey`]
//!
//! Statements and parameters are logged at `trace` level under the `sql`
//! target (`RUST_LOG=sql=trace`). Failures are logged at `warn`.
//!
//! ## Testing Policy
//! Unit tests cover the pure conversion functions only. Query execution
//! needs a live server and is left to deployment smoke tests.

use std::sync::Arc;

use anyhow::{Context, Result};
use mysql::{prelude::*, Error as MyError, Params, Pool, Value as My};

use crate::db::port::{Db, DuplicateKey, Param, Row as GRow, Value};

/// Server error code for a duplicate primary or unique key.
const ER_DUP_ENTRY: u16 = 1062;

fn mysql_err_summary(e: &MyError) -> String {
    match e {
        MyError::MySqlError(me) => format!(
            "code={}, state={}, message={}",
            me.code, me.state, me.message
        ),
        MyError::DriverError(de) => format!("driver={de:?}"),
        MyError::UrlError(ue) => format!("url={ue:?}"),
        MyError::IoError(ioe) => format!("io={ioe}"),
        MyError::CodecError(ce) => format!("codec={ce:?}"),
        MyError::FromValueError(fve) => format!("from_value={fve:?}"),
        MyError::FromRowError(fre) => format!("from_row={fre:?}"),
        // TLS variants only exist with some driver features.
        #[allow(unreachable_patterns)]
        other => other.to_string(),
    }
}

/// Splits duplicate-key failures from everything else a write can hit.
fn classify_write_error(e: MyError) -> anyhow::Error {
    match e {
        MyError::MySqlError(me) if me.code == ER_DUP_ENTRY => {
            tracing::debug!(target: "sql", message = %me.message, "duplicate key");
            anyhow::Error::new(DuplicateKey(me.message))
        }
        other => {
            tracing::warn!(error = %mysql_err_summary(&other), "exec_drop failed");
            anyhow::Error::new(other).context("exec_drop failed")
        }
    }
}

fn trace_statement(op: &str, sql: &str, params: &[Param]) {
    tracing::trace!(target: "sql", op, sql, ?params, "executing statement");
}

/// MySQL implementation of the [`Db`] port.
///
/// Errors are propagated as [`anyhow::Error`].
#[derive(Clone)]
pub struct MySqlDb {
    pool: Arc<Pool>,
}

impl MySqlDb {
    /// Creates a new adapter instance using the provided connection pool.
    pub fn new(pool: Arc<Pool>) -> Self {
        Self { pool }
    }

    /// Converts a single [`Param`] into a [`mysql::Value`].
    ///
    /// `Str` is sent as `Bytes`; `Null` as `NULL`.
    fn to_mysql_value(p: &Param) -> My {
        match p {
            Param::I64(x) => My::Int(*x),
            Param::Str(s) => My::Bytes(s.as_bytes().to_vec()),
            Param::Null => My::NULL,
        }
    }

    /// Converts a slice of [`Param`] into positional [`Params`].
    fn to_mysql_params(params_in: &[Param]) -> Params {
        if params_in.is_empty() {
            return Params::Empty;
        }
        Params::Positional(params_in.iter().map(Self::to_mysql_value).collect())
    }

    /// Converts a raw driver value into a generic [`Value`].
    ///
    /// Unsigned values beyond `i64`, floats and temporal values are
    /// rendered as text; neither table has such columns.
    fn from_mysql_value(v: My) -> Value {
        match v {
            My::NULL => Value::Null,
            My::Int(i) => Value::I64(i),
            My::UInt(u) => i64::try_from(u).map_or_else(|_| Value::Str(u.to_string()), Value::I64),
            My::Bytes(b) => match String::from_utf8(b) {
                Ok(s) => Value::Str(s),
                Err(e) => Value::Str(String::from_utf8_lossy(e.as_bytes()).into_owned()),
            },
            My::Float(f) => Value::Str(f.to_string()),
            My::Double(f) => Value::Str(f.to_string()),
            other @ (My::Date(..) | My::Time(..)) => Value::Str(other.as_sql(true)),
        }
    }

    fn row_from_mysql(mut r: mysql::Row) -> GRow {
        let names: Vec<String> = r
            .columns_ref()
            .iter()
            .map(|c| c.name_str().to_string())
            .collect();

        let mut out = GRow::default();
        for (idx, name) in names.into_iter().enumerate() {
            let v = r
                .take_opt::<My, _>(idx)
                .unwrap_or(Ok(My::NULL))
                .unwrap_or(My::NULL);
            out.insert(name, Self::from_mysql_value(v));
        }
        out
    }

    fn conn(&self) -> Result<mysql::PooledConn> {
        self.pool.get_conn().context("get_conn failed")
    }
}

impl Db for MySqlDb {
    fn fetch_one(&self, sql: &str, params_in: &[Param]) -> Result<Option<GRow>> {
        trace_statement("fetch_one", sql, params_in);
        let mut conn = self.conn()?;

        let row = conn
            .exec_first::<mysql::Row, _, _>(sql, Self::to_mysql_params(params_in))
            .inspect_err(|e| tracing::warn!(error = %mysql_err_summary(e), "exec_first failed"))
            .context("exec_first failed")?;

        Ok(row.map(Self::row_from_mysql))
    }

    fn exec(&self, sql: &str, params_in: &[Param]) -> Result<u64> {
        trace_statement("exec", sql, params_in);
        let mut conn = self.conn()?;

        conn.exec_drop(sql, Self::to_mysql_params(params_in))
            .map_err(classify_write_error)?;

        let n = conn.affected_rows();
        tracing::trace!(target: "sql", affected_rows = n, "exec done");
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_mysql_value_maps_params() {
        assert_eq!(MySqlDb::to_mysql_value(&Param::I64(-7)), My::Int(-7));
        assert_eq!(
            MySqlDb::to_mysql_value(&Param::Str("abc")),
            My::Bytes(b"abc".to_vec())
        );
        assert_eq!(MySqlDb::to_mysql_value(&Param::Null), My::NULL);
    }

    #[test]
    fn to_mysql_params_is_positional_and_ordered() {
        let ps = [Param::I64(1), Param::Str("x"), Param::Null];

        match MySqlDb::to_mysql_params(&ps) {
            Params::Positional(v) => {
                assert_eq!(v, vec![My::Int(1), My::Bytes(b"x".to_vec()), My::NULL]);
            }
            other => panic!("expected Params::Positional, got {other:?}"),
        }
    }

    #[test]
    fn empty_params_map_to_params_empty() {
        assert!(matches!(MySqlDb::to_mysql_params(&[]), Params::Empty));
    }

    #[test]
    fn from_mysql_value_decodes_text_and_integers() {
        assert_eq!(
            MySqlDb::from_mysql_value(My::Bytes(b"alice@local".to_vec())),
            Value::Str("alice@local".into())
        );
        assert_eq!(MySqlDb::from_mysql_value(My::NULL), Value::Null);
        assert_eq!(MySqlDb::from_mysql_value(My::Int(-3)), Value::I64(-3));
        assert_eq!(MySqlDb::from_mysql_value(My::UInt(1)), Value::I64(1));
        assert_eq!(
            MySqlDb::from_mysql_value(My::UInt(u64::MAX)),
            Value::Str(u64::MAX.to_string())
        );
    }

    #[test]
    fn duplicate_entry_becomes_duplicate_key() {
        let dup = MyError::MySqlError(mysql::MySqlError {
            state: "23000".into(),
            message: "Duplicate entry 'octocat@github' for key 'PRIMARY'".into(),
            code: ER_DUP_ENTRY,
        });
        assert!(crate::db::port::is_duplicate_key(&classify_write_error(dup)));

        let too_long = MyError::MySqlError(mysql::MySqlError {
            state: "22001".into(),
            message: "Data too long for column 'id'".into(),
            code: 1406,
        });
        let err = classify_write_error(too_long);
        assert!(!crate::db::port::is_duplicate_key(&err));
        assert!(format!("{err:#}").contains("Data too long"));
    }
}
