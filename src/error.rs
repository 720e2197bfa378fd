//! Error types for query construction and execution.
//!
//! [`QueryError`] is returned by every fallible operation in the crate. Errors
//! raised by the transport are carried unmodified inside
//! [`QueryError::Transport`].

use crate::executor::ExecError;
use std::fmt;

/// Errors produced while building, marshalling or executing statements
#[derive(Debug)]
pub enum QueryError {
    /// Malformed filter shape, zero filters, or an operator/operand mismatch
    InvalidPredicate(String),
    /// Statement cannot be generated (e.g. empty projection list)
    InvalidQuery(String),
    /// A value could not be serialized for a JSON column
    Serialization(String),
    /// A stored value could not be decoded (malformed JSON or datetime text)
    Deserialization(String),
    /// Two columns with the same name were declared for one table
    DuplicateColumn(String),
    /// Error raised by the statement executor, passed through unchanged
    Transport(ExecError),
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::InvalidPredicate(msg) => write!(f, "Invalid predicate: {msg}"),
            QueryError::InvalidQuery(msg) => write!(f, "Invalid query: {msg}"),
            QueryError::Serialization(msg) => write!(f, "Serialization error: {msg}"),
            QueryError::Deserialization(msg) => write!(f, "Deserialization error: {msg}"),
            QueryError::DuplicateColumn(name) => {
                write!(f, "Column '{name}' is declared more than once")
            }
            QueryError::Transport(e) => write!(f, "Transport error: {e}"),
        }
    }
}

impl std::error::Error for QueryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            QueryError::Transport(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ExecError> for QueryError {
    fn from(err: ExecError) -> Self {
        QueryError::Transport(err)
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, QueryError>;
