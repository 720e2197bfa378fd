//! Tables: DDL and DML generation over a column set.

pub mod definition;
mod table;

pub use definition::{AlterTableOptions, CreateTableOptions, Engine, OrderBy, SelectOptions, TableOptions};
pub use table::{current_stamp, Records, SelectOutput, Table};
