//! Query construction for MySQL-dialect tables.
//!
//! # Architecture
//!
//! - **Column**: declared types, constraints and the value codec (`column`)
//! - **Escape**: identifier and literal escaping (`escape`)
//! - **Predicate**: filter normalization and WHERE-clause compilation (`predicate`)
//! - **Table**: DDL/DML statement generation and execution (`table`)

pub mod column;
pub mod escape;
pub mod predicate;
pub mod table;

pub use column::{Column, ColumnConfig, ColumnSpec, DataType};
pub use escape::{Escaper, MysqlEscaper};
pub use predicate::{Condition, Filter, Operand, Operator, Predicate, PredicateGroup, PredicateNode};
pub use table::{
    current_stamp, AlterTableOptions, CreateTableOptions, Engine, OrderBy, Records, SelectOptions,
    SelectOutput, Table, TableOptions,
};
