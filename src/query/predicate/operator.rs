//! Comparison operators understood by the predicate compiler.

use std::fmt;

/// Operator of a single `field <op> value` predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Equals,
    NotEquals,
    GreaterThan,
    LessThan,
    GreaterThanOrEqual,
    LessThanOrEqual,
    /// Caller-supplied LIKE pattern
    Like,
    StartsWith,
    EndsWith,
    In,
    IsNull,
    IsNotNull,
}

impl Operator {
    pub const ALL: [Operator; 12] = [
        Operator::Equals,
        Operator::NotEquals,
        Operator::GreaterThan,
        Operator::LessThan,
        Operator::GreaterThanOrEqual,
        Operator::LessThanOrEqual,
        Operator::Like,
        Operator::StartsWith,
        Operator::EndsWith,
        Operator::In,
        Operator::IsNull,
        Operator::IsNotNull,
    ];

    /// Key naming this operator in object-shaped filters (`{"age": {"gt": 18}}`)
    pub fn key(self) -> &'static str {
        match self {
            Operator::Equals => "eq",
            Operator::NotEquals => "neq",
            Operator::GreaterThan => "gt",
            Operator::LessThan => "lt",
            Operator::GreaterThanOrEqual => "gte",
            Operator::LessThanOrEqual => "lte",
            Operator::Like => "like",
            Operator::StartsWith => "sw",
            Operator::EndsWith => "ew",
            Operator::In => "in",
            Operator::IsNull => "null",
            Operator::IsNotNull => "nnull",
        }
    }

    /// Exact lookup of an operator key
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.key() == key)
    }

    /// SQL comparison token for the binary operators
    pub(crate) fn comparison(self) -> Option<&'static str> {
        match self {
            Operator::Equals => Some("="),
            Operator::NotEquals => Some("<>"),
            Operator::GreaterThan => Some(">"),
            Operator::LessThan => Some("<"),
            Operator::GreaterThanOrEqual => Some(">="),
            Operator::LessThanOrEqual => Some("<="),
            _ => None,
        }
    }

    /// Operators that ignore their operand
    pub fn is_unary(self) -> bool {
        matches!(self, Operator::IsNull | Operator::IsNotNull)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
