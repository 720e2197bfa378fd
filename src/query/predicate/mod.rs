//! Predicate trees compiled to escaped WHERE-clause SQL.

mod filter;
mod group;
mod node;
mod operator;

pub use filter::{Condition, Filter};
pub use group::{PredicateGroup, PredicateNode};
pub use node::{Operand, Predicate};
pub use operator::Operator;
