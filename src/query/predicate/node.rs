//! Leaf predicates: `field <operator> operand`.

use super::operator::Operator;
use crate::error::{QueryError, Result};
use crate::query::escape::{escape_like, Escaper};
use crate::value::Datum;

/// Right-hand side of a predicate
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Scalar(Datum),
    List(Vec<Datum>),
}

macro_rules! scalar_operand {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Operand {
                fn from(value: $ty) -> Self {
                    Operand::Scalar(value.into())
                }
            }
        )*
    };
}

scalar_operand!(Datum, bool, i32, i64, u32, f64, &str, String);

impl From<Vec<Datum>> for Operand {
    fn from(values: Vec<Datum>) -> Self {
        Operand::List(values)
    }
}

/// A single comparison against one field
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub field: String,
    pub operator: Operator,
    pub operand: Operand,
}

impl Predicate {
    pub fn new(field: impl Into<String>, operator: Operator, operand: impl Into<Operand>) -> Self {
        Self {
            field: field.into(),
            operator,
            operand: operand.into(),
        }
    }

    pub fn equals(field: impl Into<String>, value: impl Into<Datum>) -> Self {
        Self::new(field, Operator::Equals, Operand::Scalar(value.into()))
    }

    pub fn in_set<I, T>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Datum>,
    {
        let list = values.into_iter().map(Into::into).collect();
        Self::new(field, Operator::In, Operand::List(list))
    }

    /// Compile to an escaped SQL fragment.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::InvalidPredicate` when the operand shape does not
    /// fit the operator: a list for a scalar operator, a scalar or empty list
    /// for `In`, or a null LIKE operand.
    pub fn compile(&self, esc: &dyn Escaper) -> Result<String> {
        let field = esc.escape_identifier(&self.field);

        if self.operator.is_unary() {
            let test = if self.operator == Operator::IsNull { "IS NULL" } else { "IS NOT NULL" };
            return Ok(format!("{field} {test}"));
        }

        if let Some(token) = self.operator.comparison() {
            let value = self.scalar()?;
            // `= NULL` never matches; compare nulls with IS [NOT] NULL
            return Ok(match (self.operator, value) {
                (Operator::Equals, Datum::Null) => format!("{field} IS NULL"),
                (Operator::NotEquals, Datum::Null) => format!("{field} IS NOT NULL"),
                _ => format!("{field} {token} {}", esc.escape_value(value)),
            });
        }

        match self.operator {
            Operator::Like => {
                let pattern = self.like_text()?;
                Ok(format!("{field} LIKE {}", esc.escape_value(&Datum::Text(pattern))))
            }
            Operator::StartsWith => {
                let pattern = format!("{}%", escape_like(&self.like_text()?));
                Ok(format!("{field} LIKE {}", esc.escape_value(&Datum::Text(pattern))))
            }
            Operator::EndsWith => {
                let pattern = format!("%{}", escape_like(&self.like_text()?));
                Ok(format!("{field} LIKE {}", esc.escape_value(&Datum::Text(pattern))))
            }
            Operator::In => match &self.operand {
                Operand::List(values) if !values.is_empty() => {
                    let rendered = values
                        .iter()
                        .map(|v| self.finite(v).map(|v| esc.escape_value(v)))
                        .collect::<Result<Vec<_>>>()?;
                    Ok(format!("{field} IN ({})", rendered.join(",")))
                }
                Operand::List(_) => Err(self.invalid("an empty list")),
                Operand::Scalar(_) => Err(self.invalid("a scalar; expected a list")),
            },
            // Null tests and comparisons were handled above
            _ => Err(self.invalid("an unsupported operand")),
        }
    }

    fn scalar(&self) -> Result<&Datum> {
        match &self.operand {
            Operand::Scalar(value) => self.finite(value),
            Operand::List(_) => Err(self.invalid("a list; expected a single value")),
        }
    }

    /// SQL has no literal for NaN or infinity
    fn finite<'a>(&self, value: &'a Datum) -> Result<&'a Datum> {
        match value {
            Datum::Float(f) if !f.is_finite() => Err(self.invalid("a non-finite number")),
            _ => Ok(value),
        }
    }

    fn like_text(&self) -> Result<String> {
        match self.scalar()? {
            Datum::Text(s) => Ok(s.clone()),
            Datum::Int(i) => Ok(i.to_string()),
            Datum::Float(f) => Ok(f.to_string()),
            Datum::Bool(b) => Ok(b.to_string()),
            _ => Err(self.invalid("a value that is not text")),
        }
    }

    fn invalid(&self, what: &str) -> QueryError {
        QueryError::InvalidPredicate(format!(
            "operator '{}' on field '{}' was given {what}",
            self.operator, self.field
        ))
    }
}
