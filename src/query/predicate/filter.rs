//! Filter input and its normalization into a [`PredicateGroup`].
//!
//! A [`Filter`] is one OR-branch: an ordered list of `(field, Condition)`
//! pairs that are ANDed together. The shape of each value is resolved once,
//! when the filter is built:
//!
//! - `Condition::Equals(v)`: `field = v`
//! - `Condition::InSet(vs)`: `field IN (vs)`
//! - `Condition::Op(op, v)`: any other operator
//!
//! JSON input (`{"age": {"gt": 18}, "role": ["admin", "owner"], "active": true}`)
//! is resolved with the same rules: arrays become `InSet`, single-key objects
//! name an operator, everything else is `Equals`.

use super::group::{PredicateGroup, PredicateNode};
use super::node::{Operand, Predicate};
use super::operator::Operator;
use crate::error::{QueryError, Result};
use crate::value::Datum;

/// Resolved right-hand side of one filter entry
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Equals(Datum),
    InSet(Vec<Datum>),
    Op(Operator, Operand),
}

impl Condition {
    fn into_predicate(self, field: String) -> Predicate {
        match self {
            Condition::Equals(value) => Predicate::new(field, Operator::Equals, Operand::Scalar(value)),
            Condition::InSet(values) => Predicate::new(field, Operator::In, Operand::List(values)),
            Condition::Op(operator, operand) => Predicate::new(field, operator, operand),
        }
    }

    /// Resolve a JSON value by shape
    fn from_json(field: &str, value: serde_json::Value) -> Result<Self> {
        match value {
            serde_json::Value::Array(items) => {
                Ok(Condition::InSet(items.into_iter().map(Datum::from).collect()))
            }
            serde_json::Value::Object(map) => {
                let found = map.len();
                let mut entries = map.into_iter();
                let (Some((key, operand)), None) = (entries.next(), entries.next()) else {
                    return Err(QueryError::InvalidPredicate(format!(
                        "filter on '{field}' must have exactly one operator key, found {found}"
                    )));
                };
                let operator = Operator::from_key(&key).ok_or_else(|| {
                    QueryError::InvalidPredicate(format!(
                        "unknown operator '{key}' in filter on '{field}'"
                    ))
                })?;
                let operand = match operand {
                    serde_json::Value::Array(items) => {
                        Operand::List(items.into_iter().map(Datum::from).collect())
                    }
                    scalar => Operand::Scalar(Datum::from(scalar)),
                };
                Ok(Condition::Op(operator, operand))
            }
            scalar => Ok(Condition::Equals(Datum::from(scalar))),
        }
    }
}

/// One AND-branch of filter input
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Filter {
    entries: Vec<(String, Condition)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn condition(mut self, field: impl Into<String>, condition: Condition) -> Self {
        self.entries.push((field.into(), condition));
        self
    }

    pub fn eq(self, field: impl Into<String>, value: impl Into<Datum>) -> Self {
        self.condition(field, Condition::Equals(value.into()))
    }

    pub fn is_in<I, T>(self, field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Datum>,
    {
        self.condition(field, Condition::InSet(values.into_iter().map(Into::into).collect()))
    }

    pub fn op(self, field: impl Into<String>, operator: Operator, value: impl Into<Datum>) -> Self {
        self.condition(field, Condition::Op(operator, Operand::Scalar(value.into())))
    }

    pub fn is_null(self, field: impl Into<String>) -> Self {
        self.condition(field, Condition::Op(Operator::IsNull, Operand::Scalar(Datum::Null)))
    }

    pub fn is_not_null(self, field: impl Into<String>) -> Self {
        self.condition(field, Condition::Op(Operator::IsNotNull, Operand::Scalar(Datum::Null)))
    }

    pub fn entries(&self) -> &[(String, Condition)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn into_branch(self) -> Vec<PredicateNode> {
        self.entries
            .into_iter()
            .map(|(field, condition)| PredicateNode::Leaf(condition.into_predicate(field)))
            .collect()
    }
}

impl TryFrom<serde_json::Value> for Filter {
    type Error = QueryError;

    fn try_from(value: serde_json::Value) -> Result<Self> {
        let serde_json::Value::Object(map) = value else {
            return Err(QueryError::InvalidPredicate(format!(
                "a filter must be a JSON object, got {value}"
            )));
        };
        let mut filter = Filter::new();
        for (field, value) in map {
            let condition = Condition::from_json(&field, value)?;
            filter = filter.condition(field, condition);
        }
        Ok(filter)
    }
}

impl PredicateGroup {
    /// Normalize filters into a group: each filter is one OR-branch.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::InvalidPredicate` when no filters are given or a
    /// filter has no entries.
    pub fn from_filters<I>(filters: I) -> Result<Self>
    where
        I: IntoIterator<Item = Filter>,
    {
        let branches: Vec<_> = filters.into_iter().map(Filter::into_branch).collect();
        if branches.is_empty() {
            return Err(QueryError::InvalidPredicate(
                "at least one filter is required".to_string(),
            ));
        }
        PredicateGroup::new(branches)
    }

    /// Normalize JSON filter objects into a group
    ///
    /// ```rust
    /// use schemaquery::PredicateGroup;
    /// use serde_json::json;
    ///
    /// let group = PredicateGroup::from_json([json!({ "a": 1, "b": [1, 2] })]).unwrap();
    /// assert_eq!(group.to_sql().unwrap(), "(`a` = 1 AND `b` IN (1,2))");
    /// ```
    pub fn from_json<I>(filters: I) -> Result<Self>
    where
        I: IntoIterator<Item = serde_json::Value>,
    {
        let filters = filters
            .into_iter()
            .map(Filter::try_from)
            .collect::<Result<Vec<_>>>()?;
        Self::from_filters(filters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn leaf(node: &PredicateNode) -> &Predicate {
        match node {
            PredicateNode::Leaf(p) => p,
            PredicateNode::Group(_) => panic!("expected a leaf"),
        }
    }

    #[test]
    fn test_one_object_is_one_branch() {
        let group = PredicateGroup::from_json([json!({ "a": 1, "b": [1, 2] })]).unwrap();
        assert_eq!(group.branches().len(), 1);
        let branch = &group.branches()[0];
        assert_eq!(branch.len(), 2);
        assert_eq!(leaf(&branch[0]).operator, Operator::Equals);
        assert_eq!(leaf(&branch[1]).operator, Operator::In);
        assert_eq!(
            leaf(&branch[1]).operand,
            Operand::List(vec![Datum::Int(1), Datum::Int(2)])
        );
    }

    #[test]
    fn test_each_object_is_an_or_branch() {
        let group = PredicateGroup::from_json([json!({ "a": 1 }), json!({ "b": 2 })]).unwrap();
        assert_eq!(group.branches().len(), 2);
        assert!(group.branches().iter().all(|b| b.len() == 1));
        assert_eq!(group.to_sql().unwrap(), "`a` = 1 OR `b` = 2");
    }

    #[test]
    fn test_zero_filters_fail() {
        let err = PredicateGroup::from_filters(Vec::<Filter>::new()).unwrap_err();
        assert!(matches!(err, QueryError::InvalidPredicate(_)));
        let err = PredicateGroup::from_json(Vec::<serde_json::Value>::new()).unwrap_err();
        assert!(matches!(err, QueryError::InvalidPredicate(_)));
    }

    #[test]
    fn test_operator_object() {
        let group = PredicateGroup::from_json([json!({ "age": { "gte": 18 }, "deleted": { "null": true } })])
            .unwrap();
        assert_eq!(group.to_sql().unwrap(), "(`age` >= 18 AND `deleted` IS NULL)");
    }

    #[test]
    fn test_operator_object_shape_errors() {
        for bad in [
            json!({ "age": {} }),
            json!({ "age": { "gt": 1, "lt": 5 } }),
            json!({ "age": { "between": [1, 5] } }),
        ] {
            let err = PredicateGroup::from_json([bad.clone()]).unwrap_err();
            assert!(matches!(err, QueryError::InvalidPredicate(_)), "{bad}");
        }
    }

    #[test]
    fn test_empty_filter_object_fails() {
        let err = PredicateGroup::from_json([json!({})]).unwrap_err();
        assert!(matches!(err, QueryError::InvalidPredicate(_)));
    }

    #[test]
    fn test_non_object_filter_fails() {
        let err = Filter::try_from(json!([1, 2])).unwrap_err();
        assert!(matches!(err, QueryError::InvalidPredicate(_)));
    }

    #[test]
    fn test_typed_builder_matches_json() {
        let typed = PredicateGroup::from_filters([Filter::new()
            .eq("name", "Ada")
            .is_in("role", ["admin", "owner"])
            .op("age", Operator::LessThan, 40)])
        .unwrap();
        let from_json = PredicateGroup::from_json([json!({
            "name": "Ada",
            "role": ["admin", "owner"],
            "age": { "lt": 40 }
        })])
        .unwrap();
        // serde_json orders object keys, so compare the clauses as a set
        fn clauses(sql: String) -> Vec<String> {
            let inner = sql.strip_prefix('(').and_then(|s| s.strip_suffix(')')).unwrap();
            let mut parts: Vec<String> = inner.split(" AND ").map(String::from).collect();
            parts.sort();
            parts
        }
        assert_eq!(clauses(typed.to_sql().unwrap()), clauses(from_json.to_sql().unwrap()));
    }

    #[test]
    fn test_null_value_is_equals() {
        let group = PredicateGroup::from_json([json!({ "a": null })]).unwrap();
        let node = leaf(&group.branches()[0][0]);
        assert_eq!(node.operator, Operator::Equals);
        assert_eq!(group.to_sql().unwrap(), "`a` IS NULL");
    }
}
