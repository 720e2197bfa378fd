//! Two-level boolean expression trees: AND-branches combined with OR.

use super::node::Predicate;
use crate::error::{QueryError, Result};
use crate::query::escape::{Escaper, MysqlEscaper};

/// Element of an AND-branch
#[derive(Debug, Clone, PartialEq)]
pub enum PredicateNode {
    Leaf(Predicate),
    Group(PredicateGroup),
}

impl PredicateNode {
    fn compile(&self, esc: &dyn Escaper) -> Result<String> {
        match self {
            PredicateNode::Leaf(predicate) => predicate.compile(esc),
            // An OR inside an AND-branch must keep its own grouping
            PredicateNode::Group(group) if group.branches.len() > 1 => {
                Ok(format!("({})", group.compile(esc)?))
            }
            PredicateNode::Group(group) => group.compile(esc),
        }
    }
}

impl From<Predicate> for PredicateNode {
    fn from(predicate: Predicate) -> Self {
        PredicateNode::Leaf(predicate)
    }
}

impl From<PredicateGroup> for PredicateNode {
    fn from(group: PredicateGroup) -> Self {
        PredicateNode::Group(group)
    }
}

/// OR-combination of AND-branches
///
/// ```rust
/// use schemaquery::{Predicate, PredicateGroup};
///
/// let group = PredicateGroup::new(vec![
///     vec![Predicate::equals("a", 1).into(), Predicate::equals("b", 2).into()],
///     vec![Predicate::equals("c", 3).into()],
/// ])
/// .unwrap();
/// assert_eq!(group.to_sql().unwrap(), "(`a` = 1 AND `b` = 2) OR `c` = 3");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PredicateGroup {
    branches: Vec<Vec<PredicateNode>>,
}

impl PredicateGroup {
    /// Build a group from its OR-branches.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::InvalidPredicate` for zero branches or an empty branch.
    pub fn new(branches: Vec<Vec<PredicateNode>>) -> Result<Self> {
        if branches.is_empty() {
            return Err(QueryError::InvalidPredicate(
                "a predicate group needs at least one branch".to_string(),
            ));
        }
        if let Some(idx) = branches.iter().position(Vec::is_empty) {
            return Err(QueryError::InvalidPredicate(format!(
                "branch {idx} of the predicate group has no conditions"
            )));
        }
        Ok(Self { branches })
    }

    /// Group matching a single predicate
    pub fn single(predicate: Predicate) -> Self {
        Self {
            branches: vec![vec![PredicateNode::Leaf(predicate)]],
        }
    }

    pub fn branches(&self) -> &[Vec<PredicateNode>] {
        &self.branches
    }

    /// Compile to a WHERE-clause expression.
    ///
    /// Branches are joined with ` OR `; a branch with several nodes is wrapped
    /// in parentheses with its nodes joined by ` AND `, a single-node branch
    /// is emitted bare.
    pub fn compile(&self, esc: &dyn Escaper) -> Result<String> {
        let mut branches = Vec::with_capacity(self.branches.len());
        for branch in &self.branches {
            let nodes = branch
                .iter()
                .map(|node| node.compile(esc))
                .collect::<Result<Vec<_>>>()?;
            if nodes.len() > 1 {
                branches.push(format!("({})", nodes.join(" AND ")));
            } else {
                branches.extend(nodes);
            }
        }
        Ok(branches.join(" OR "))
    }

    /// Compile with the MySQL escaper
    pub fn to_sql(&self) -> Result<String> {
        self.compile(&MysqlEscaper)
    }
}
