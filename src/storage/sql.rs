//! SQL building blocks shared by the storage queries.
//!
//! Values always travel as bound parameters. The only text ever interpolated
//! into a statement is:
//! - integers (LIMIT, OFFSET, job batch size),
//! - tokens of closed enums (order column, direction, comparison operator),
//! - a timezone name that resolved against the IANA database.

use std::fmt;

use chrono_tz::Tz;
use tracing::warn;

use super::Db;
use crate::model::EntryStatus;

/// SQL dialect of the configured backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Postgres,
    Sqlite,
}

impl Dialect {
    /// Dialect of the backend selected at compile time.
    #[cfg(feature = "postgres")]
    pub const CURRENT: Dialect = Dialect::Postgres;
    /// Dialect of the backend selected at compile time.
    #[cfg(all(feature = "sqlite", not(feature = "postgres")))]
    pub const CURRENT: Dialect = Dialect::Sqlite;

    /// Projection of `e.published_at` for a reader in `timezone`.
    ///
    /// SQLite has no `AT TIME ZONE`; the UTC value is projected and converted
    /// while hydrating the row.
    pub fn published_at_projection(&self, timezone: Tz) -> String {
        match self {
            Dialect::Postgres => format!("e.published_at at time zone '{}'", timezone.name()),
            Dialect::Sqlite => "e.published_at".to_string(),
        }
    }
}

/// Resolve a user timezone name, falling back to UTC for unknown names.
pub fn resolve_timezone(name: &str) -> Tz {
    match name.parse::<Tz>() {
        Ok(tz) => tz,
        Err(_) => {
            warn!("Unknown timezone {:?}, falling back to UTC", name);
            Tz::UTC
        }
    }
}

/// A bound query parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryArg {
    Int(i64),
    Text(String),
}

impl fmt::Display for QueryArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryArg::Int(v) => write!(f, "{v}"),
            QueryArg::Text(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<i64> for QueryArg {
    fn from(v: i64) -> Self {
        QueryArg::Int(v)
    }
}

impl From<i32> for QueryArg {
    fn from(v: i32) -> Self {
        QueryArg::Int(i64::from(v))
    }
}

impl From<&str> for QueryArg {
    fn from(s: &str) -> Self {
        QueryArg::Text(s.to_string())
    }
}

impl From<String> for QueryArg {
    fn from(s: String) -> Self {
        QueryArg::Text(s)
    }
}

impl From<EntryStatus> for QueryArg {
    fn from(status: EntryStatus) -> Self {
        QueryArg::Text(status.as_str().to_string())
    }
}

/// Comparison operator of an extension condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::NotEq => "<>",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// SQL text with its positional arguments, `$1` binding `args[0]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub sql: String,
    pub args: Vec<QueryArg>,
}

impl Statement {
    pub fn new(sql: impl Into<String>, args: Vec<QueryArg>) -> Self {
        Self {
            sql: sql.into(),
            args,
        }
    }
}

/// Build an executable query with every argument bound in order.
pub(crate) fn build_query(
    statement: &Statement,
) -> sqlx::query::Query<'_, Db, <Db as sqlx::Database>::Arguments<'_>> {
    let mut query = sqlx::query(&statement.sql);
    for arg in &statement.args {
        query = match arg {
            QueryArg::Int(v) => query.bind(*v),
            QueryArg::Text(s) => query.bind(s.as_str()),
        };
    }
    query
}
