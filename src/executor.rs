//! Statement execution seam.
//!
//! Provides the `SqlExecutor` trait that abstracts the MySQL transport. The
//! crate never talks to a socket itself: tables build a [`Statement`] and hand
//! it to whatever executor the application supplies (a pooled driver
//! connection, a test double, ...).

use crate::error::QueryError;
use crate::value::{Datum, Row};
use std::fmt;
use std::time::Instant;

#[cfg(feature = "metrics")]
use crate::metrics::METRICS;
#[cfg(feature = "tracing")]
use crate::metrics::tracing_helpers;

/// Transport error type
#[derive(Debug)]
pub enum ExecError {
    /// Error raised by the underlying driver
    Driver(Box<dyn std::error::Error + Send + Sync>),
    /// The server rejected the statement
    Query(String),
    /// Other execution errors
    Other(String),
}

impl fmt::Display for ExecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecError::Driver(e) => write!(f, "Driver error: {e}"),
            ExecError::Query(s) => write!(f, "Query error: {s}"),
            ExecError::Other(s) => write!(f, "Execution error: {s}"),
        }
    }
}

impl std::error::Error for ExecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExecError::Driver(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

/// A statement ready for execution: SQL text with `?` placeholders plus the
/// values bound to them, in order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Datum>,
}

impl Statement {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    pub fn with_params(sql: impl Into<String>, params: Vec<Datum>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    /// Bound values in sea-query's value model, for drivers built on it
    pub fn values(&self) -> sea_query::Values {
        sea_query::Values(self.params.iter().map(sea_query::Value::from).collect())
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

/// Column metadata reported by the transport alongside result rows
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldInfo {
    pub name: String,
    pub column_type: Option<String>,
}

impl FieldInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column_type: None,
        }
    }
}

/// Raw result of one statement
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryResult {
    /// Result rows (empty for statements that return none)
    pub rows: Vec<Row>,
    /// Field metadata for `rows`
    pub fields: Vec<FieldInfo>,
    /// Rows affected by INSERT/UPDATE/DELETE
    pub affected_rows: u64,
    /// Auto-increment id generated by an INSERT, if any
    pub last_insert_id: Option<u64>,
}

impl QueryResult {
    pub fn from_rows(rows: Vec<Row>) -> Self {
        Self {
            rows,
            ..Default::default()
        }
    }

    pub fn affected(affected_rows: u64) -> Self {
        Self {
            affected_rows,
            ..Default::default()
        }
    }
}

/// Trait for executing statements against a MySQL-dialect server
///
/// Implementations multiplex statements over their own connections; the
/// crate issues one call per logical operation and waits for it.
///
/// # Examples
///
/// ```no_run
/// use schemaquery::{ExecError, QueryResult, SqlExecutor, Statement};
///
/// struct Noop;
///
/// impl SqlExecutor for Noop {
///     fn execute(&self, _statement: &Statement) -> Result<QueryResult, ExecError> {
///         Ok(QueryResult::default())
///     }
/// }
/// ```
pub trait SqlExecutor {
    /// Execute a statement and return its rows and field metadata
    ///
    /// # Errors
    ///
    /// Returns `ExecError` if the transport or the server rejects the statement.
    fn execute(&self, statement: &Statement) -> Result<QueryResult, ExecError>;
}

impl<E: SqlExecutor + ?Sized> SqlExecutor for &E {
    fn execute(&self, statement: &Statement) -> Result<QueryResult, ExecError> {
        (**self).execute(statement)
    }
}

impl<E: SqlExecutor + ?Sized> SqlExecutor for std::sync::Arc<E> {
    fn execute(&self, statement: &Statement) -> Result<QueryResult, ExecError> {
        (**self).execute(statement)
    }
}

/// Run a statement through `executor`, logging and re-raising failures.
///
/// When `verbose` is set the statement and its parameters are logged before
/// execution. A failing statement is logged at error level together with its
/// parameters and the transport error is returned unchanged.
pub(crate) fn perform<E: SqlExecutor + ?Sized>(
    executor: &E,
    statement: &Statement,
    verbose: bool,
) -> Result<QueryResult, QueryError> {
    #[cfg(feature = "tracing")]
    let _span = tracing_helpers::statement_span(&statement.sql).entered();

    if verbose {
        log::info!("{} {:?}", statement.sql, statement.params);
    }

    let start = Instant::now();
    let result = executor.execute(statement);
    let duration = start.elapsed();

    #[cfg(feature = "metrics")]
    METRICS.record_statement(duration, result.is_ok());

    result.map_err(|e| {
        log::error!(
            "{} {:?} failed after {:?}: {}",
            statement.sql,
            statement.params,
            duration,
            e
        );
        QueryError::Transport(e)
    })
}
