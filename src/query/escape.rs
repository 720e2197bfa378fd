//! Identifier and literal escaping.
//!
//! Predicates are compiled to SQL text rather than placeholders, so every
//! operand goes through an [`Escaper`]. [`MysqlEscaper`] quotes identifiers
//! with backticks and renders literals with sea-query's MySQL backend.

use crate::value::Datum;
use sea_query::{MysqlQueryBuilder, QueryBuilder};

/// Produces injection-safe identifier and literal text
pub trait Escaper {
    /// Quote a (possibly `schema.table`-qualified) identifier
    fn escape_identifier(&self, name: &str) -> String;

    /// Render a value as a SQL literal (quoted where needed)
    fn escape_value(&self, value: &Datum) -> String;
}

/// Escaper for the MySQL dialect
#[derive(Debug, Clone, Copy, Default)]
pub struct MysqlEscaper;

impl Escaper for MysqlEscaper {
    fn escape_identifier(&self, name: &str) -> String {
        name.split('.')
            .map(|part| format!("`{}`", part.replace('`', "``")))
            .collect::<Vec<_>>()
            .join(".")
    }

    fn escape_value(&self, value: &Datum) -> String {
        MysqlQueryBuilder.value_to_string(&sea_query::Value::from(value))
    }
}

/// Escape the LIKE metacharacters in `value` so it matches literally
pub(crate) fn escape_like(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
