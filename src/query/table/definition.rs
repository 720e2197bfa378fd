//! Table-level options: DDL behaviour on init and SELECT shaping.

use crate::query::escape::Escaper;
use serde::Deserialize;
use std::fmt;

/// Storage engine named in `CREATE TABLE ... ENGINE=`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum Engine {
    #[default]
    InnoDB,
    MyISAM,
    Aria,
    Memory,
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Engine::InnoDB => "InnoDB",
            Engine::MyISAM => "MyISAM",
            Engine::Aria => "Aria",
            Engine::Memory => "Memory",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct CreateTableOptions {
    pub engine: Engine,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AlterTableOptions {
    /// Issue `ADD COLUMN IF NOT EXISTS` for every column
    #[serde(alias = "addColumns")]
    pub add_columns: bool,
    /// Issue `MODIFY COLUMN IF EXISTS` for every column
    #[serde(alias = "modifyColumns")]
    pub modify_columns: bool,
}

impl Default for AlterTableOptions {
    fn default() -> Self {
        Self {
            add_columns: true,
            modify_columns: true,
        }
    }
}

/// DDL options for one table
///
/// `create_table` and `alter_table` left as `None` inherit the database-wide
/// setting when the table is created through a [`Database`](crate::Database),
/// and are off otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct TableOptions {
    #[serde(alias = "createTable")]
    pub create_table: Option<bool>,
    #[serde(alias = "createTableOptions")]
    pub create_table_options: CreateTableOptions,
    #[serde(alias = "alterTable")]
    pub alter_table: Option<bool>,
    #[serde(alias = "alterTableOptions")]
    pub alter_table_options: AlterTableOptions,
}

impl TableOptions {
    pub fn create(mut self, enabled: bool) -> Self {
        self.create_table = Some(enabled);
        self
    }

    pub fn alter(mut self, enabled: bool) -> Self {
        self.alter_table = Some(enabled);
        self
    }

    pub fn engine(mut self, engine: Engine) -> Self {
        self.create_table_options.engine = engine;
        self
    }

    /// Fill unset flags from database-wide defaults
    pub(crate) fn inherit(mut self, create_table: bool, alter_table: bool) -> Self {
        self.create_table.get_or_insert(create_table);
        self.alter_table.get_or_insert(alter_table);
        self
    }
}

/// `ORDER BY` clause: fields with per-field direction
///
/// A direction list shorter than the field list extends its last entry to the
/// remaining fields; no directions at all means ascending.
///
/// ```rust
/// use schemaquery::OrderBy;
///
/// let order = OrderBy::fields(["last", "first"]).descending([true]);
/// assert!(order.direction_of(1));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OrderBy {
    fields: Vec<String>,
    descending: Vec<bool>,
}

impl OrderBy {
    pub fn asc(field: impl Into<String>) -> Self {
        Self::fields([field])
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self::fields([field]).descending([true])
    }

    pub fn fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            descending: Vec::new(),
        }
    }

    pub fn descending(mut self, flags: impl IntoIterator<Item = bool>) -> Self {
        self.descending = flags.into_iter().collect();
        self
    }

    /// Append a field with its own direction
    pub fn then(mut self, field: impl Into<String>, descending: bool) -> Self {
        // pin the directions of the fields already present
        let pinned: Vec<bool> = (0..self.fields.len()).map(|i| self.direction_of(i)).collect();
        self.descending = pinned;
        self.fields.push(field.into());
        self.descending.push(descending);
        self
    }

    /// Whether the field at `idx` sorts descending
    pub fn direction_of(&self, idx: usize) -> bool {
        self.descending
            .get(idx)
            .or(self.descending.last())
            .copied()
            .unwrap_or(false)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub(crate) fn compile(&self, esc: &dyn Escaper) -> String {
        self.fields
            .iter()
            .enumerate()
            .map(|(i, field)| {
                let dir = if self.direction_of(i) { "DESC" } else { "ASC" };
                format!("{} {dir}", esc.escape_identifier(field))
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Options for [`Table::select`](crate::Table::select)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectOptions {
    /// Columns to return; `None` selects `*`
    pub props: Option<Vec<String>>,
    pub order_by: Option<OrderBy>,
    pub limit: Option<u64>,
}

impl SelectOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn props<I, S>(mut self, props: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.props = Some(props.into_iter().map(Into::into).collect());
        self
    }

    pub fn order_by(mut self, order: OrderBy) -> Self {
        self.order_by = Some(order);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// The requested prop when exactly one explicit (non-`*`) prop was given
    pub(crate) fn single_prop(&self) -> Option<&str> {
        match self.props.as_deref() {
            Some([only]) if only != "*" => Some(only.as_str()),
            _ => None,
        }
    }
}
