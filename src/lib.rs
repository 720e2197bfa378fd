//! # schemaquery
//!
//! Schema-aware query construction for MySQL-dialect databases.
//!
//! Tables are declared as ordered sets of typed [`Column`]s. The crate
//! converts values between application and wire form, compiles structured
//! filters into escaped WHERE clauses, and generates the DDL and DML for each
//! table. Statements are handed to an application-supplied [`SqlExecutor`];
//! connection pooling and transport are out of scope.
//!
//! ```rust
//! use schemaquery::{Database, ExecError, PredicateGroup, QueryConfig, QueryResult, Row, SelectOptions, SqlExecutor, Statement};
//! use serde_json::json;
//!
//! struct Noop;
//!
//! impl SqlExecutor for Noop {
//!     fn execute(&self, _statement: &Statement) -> Result<QueryResult, ExecError> {
//!         Ok(QueryResult::default())
//!     }
//! }
//!
//! let db = Database::new(Noop, QueryConfig::default());
//! let users = db
//!     .table("users", vec![
//!         db.column("id", "int", Default::default()),
//!         db.column("name", "string", Default::default()),
//!     ])
//!     .unwrap();
//!
//! let filter = PredicateGroup::from_json([json!({ "name": { "sw": "Ad" } })]).unwrap();
//! let stmt = users.select_statement(Some(&filter), &SelectOptions::new()).unwrap();
//! assert_eq!(stmt.sql, "SELECT * FROM `users` WHERE `name` LIKE 'Ad%'");
//! ```

pub mod config;
pub mod database;
pub mod error;
pub mod executor;
pub mod metrics;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod query;
pub mod value;

pub use config::QueryConfig;
pub use database::{Database, TableSchema};
pub use error::{QueryError, Result};
pub use executor::{ExecError, FieldInfo, QueryResult, SqlExecutor, Statement};
pub use query::{
    current_stamp, AlterTableOptions, Column, ColumnConfig, ColumnSpec, Condition, CreateTableOptions,
    DataType, Engine, Escaper, Filter, MysqlEscaper, Operand, Operator, OrderBy, Predicate,
    PredicateGroup, PredicateNode, Records, SelectOptions, SelectOutput, Table, TableOptions,
};
pub use value::{Datum, Row};
