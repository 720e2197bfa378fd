//! Database handle: shared executor plus database-wide table defaults.
//!
//! [`Database`] is the entry point most applications use. It owns the
//! executor every table shares and applies the `create_tables` /
//! `alter_tables` defaults from [`QueryConfig`] to the tables it creates.
//!
//! ```rust
//! use schemaquery::{Database, ExecError, QueryConfig, QueryResult, SqlExecutor, Statement};
//!
//! struct Noop;
//!
//! impl SqlExecutor for Noop {
//!     fn execute(&self, _statement: &Statement) -> Result<QueryResult, ExecError> {
//!         Ok(QueryResult::default())
//!     }
//! }
//!
//! let db = Database::new(Noop, QueryConfig { create_tables: true, ..Default::default() });
//! let table = db
//!     .table("tags", vec![db.column("label", "string", Default::default())])
//!     .unwrap();
//! assert!(table.creates_table());
//! ```

use crate::config::QueryConfig;
use crate::error::Result;
use crate::executor::{perform, QueryResult, SqlExecutor, Statement};
use crate::query::column::{Column, ColumnConfig, ColumnSpec, DataType};
use crate::query::predicate::{Filter, Operand, Operator, Predicate, PredicateGroup, PredicateNode};
use crate::query::table::{current_stamp, Table, TableOptions};
use serde::Deserialize;
use std::sync::Arc;

/// Declarative table definition, loadable from TOML or JSON
///
/// ```toml
/// name = "users"
///
/// [[columns]]
/// name = "id"
/// data_type = "int"
/// config = { primary_key = true, auto_increment = true }
///
/// [[columns]]
/// name = "created"
/// data_type = "createdStamp"
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TableSchema {
    pub name: String,
    #[serde(default)]
    pub columns: Vec<ColumnSpec>,
    #[serde(default)]
    pub options: TableOptions,
}

pub struct Database<E: SqlExecutor + ?Sized> {
    executor: Arc<E>,
    config: QueryConfig,
}

impl<E: SqlExecutor> Database<E> {
    pub fn new(executor: E, config: QueryConfig) -> Self {
        Self::from_shared(Arc::new(executor), config)
    }
}

impl<E: SqlExecutor + ?Sized> Database<E> {
    /// Build over an executor that is already shared elsewhere
    pub fn from_shared(executor: Arc<E>, config: QueryConfig) -> Self {
        Self { executor, config }
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    pub fn executor(&self) -> &Arc<E> {
        &self.executor
    }

    /// Current Unix epoch seconds
    pub fn stamp(&self) -> i64 {
        current_stamp()
    }

    pub fn column(&self, name: &str, data_type: impl Into<DataType>, config: ColumnConfig) -> Column {
        Column::new(name, data_type, config)
    }

    /// Create a table with the database-wide DDL defaults
    pub fn table(&self, name: &str, columns: Vec<Column>) -> Result<Table<E>> {
        self.table_with_options(name, columns, TableOptions::default())
    }

    /// Create a table; flags set in `options` override the database defaults
    pub fn table_with_options(
        &self,
        name: &str,
        columns: Vec<Column>,
        options: TableOptions,
    ) -> Result<Table<E>> {
        let options = options.inherit(self.config.create_tables, self.config.alter_tables);
        Ok(Table::new(Arc::clone(&self.executor), name, columns, options)?.verbose(self.config.verbose))
    }

    /// Create a table from a declarative schema
    pub fn load_table(&self, schema: TableSchema) -> Result<Table<E>> {
        let columns = schema.columns.into_iter().map(Column::from).collect();
        self.table_with_options(&schema.name, columns, schema.options)
    }

    /// Single-predicate filter
    pub fn predicate(&self, field: &str, operator: Operator, operand: impl Into<Operand>) -> PredicateGroup {
        PredicateGroup::single(Predicate::new(field, operator, operand))
    }

    /// Normalize filters into one group, each filter an OR-branch
    pub fn filter<I>(&self, filters: I) -> Result<PredicateGroup>
    where
        I: IntoIterator<Item = Filter>,
    {
        PredicateGroup::from_filters(filters)
    }

    /// OR together existing groups, each becoming one branch
    pub fn any_of<I>(&self, groups: I) -> Result<PredicateGroup>
    where
        I: IntoIterator<Item = PredicateGroup>,
    {
        PredicateGroup::new(
            groups
                .into_iter()
                .map(|group| vec![PredicateNode::Group(group)])
                .collect(),
        )
    }

    /// Run a hand-written statement through the shared executor
    pub fn execute(&self, statement: &Statement) -> Result<QueryResult> {
        perform(self.executor.as_ref(), statement, self.config.verbose)
    }
}
