//! Schema-driven statement generation and execution for one table.

use super::definition::{AlterTableOptions, Engine, SelectOptions, TableOptions};
use crate::error::{QueryError, Result};
use crate::executor::{perform, FieldInfo, QueryResult, SqlExecutor, Statement};
use crate::query::column::{Column, DataType};
use crate::query::escape::{Escaper, MysqlEscaper};
use crate::query::predicate::PredicateGroup;
use crate::value::{Datum, Row};
use std::collections::HashSet;
use std::sync::Arc;

/// Current Unix epoch seconds, the value written to stamp columns
pub fn current_stamp() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Records returned by [`Table::select`]
#[derive(Debug, Clone, PartialEq)]
pub enum Records {
    /// One decoded row per result row
    Rows(Vec<Row>),
    /// The single requested prop, decoded, one value per result row
    Values(Vec<Datum>),
}

impl Records {
    pub fn len(&self) -> usize {
        match self {
            Records::Rows(rows) => rows.len(),
            Records::Values(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_rows(self) -> Option<Vec<Row>> {
        match self {
            Records::Rows(rows) => Some(rows),
            Records::Values(_) => None,
        }
    }

    pub fn into_values(self) -> Option<Vec<Datum>> {
        match self {
            Records::Values(values) => Some(values),
            Records::Rows(_) => None,
        }
    }
}

/// Decoded result of a SELECT
#[derive(Debug, Clone, PartialEq)]
pub struct SelectOutput {
    pub records: Records,
    pub fields: Vec<FieldInfo>,
}

#[derive(Clone, Copy)]
enum StampRole {
    Created,
    Updated,
}

/// A table: an ordered, name-unique set of columns bound to an executor.
///
/// Every operation is split into a pure `*_statement` builder and an
/// executing method, so generated SQL can be inspected without a server.
///
/// ```rust
/// use schemaquery::{Column, ColumnConfig, ExecError, QueryResult, Row, SqlExecutor, Statement, Table, TableOptions};
/// use std::sync::Arc;
///
/// struct Noop;
///
/// impl SqlExecutor for Noop {
///     fn execute(&self, _statement: &Statement) -> Result<QueryResult, ExecError> {
///         Ok(QueryResult::default())
///     }
/// }
///
/// let table = Table::new(
///     Arc::new(Noop),
///     "users",
///     vec![
///         Column::new("id", "int", ColumnConfig { primary_key: true, ..Default::default() }),
///         Column::simple("name", "string"),
///     ],
///     TableOptions::default(),
/// )
/// .unwrap();
///
/// let stmt = table.insert_statement(Row::new().with("name", "Ada").with("age", 36)).unwrap();
/// assert_eq!(stmt.sql, "INSERT INTO `users` SET `name` = ?");
/// ```
#[derive(Debug)]
pub struct Table<E: SqlExecutor + ?Sized> {
    executor: Arc<E>,
    name: String,
    columns: Vec<Column>,
    create_table: bool,
    engine: Engine,
    alter_table: bool,
    alter_options: AlterTableOptions,
    verbose: bool,
    initialized: bool,
}

impl<E: SqlExecutor + ?Sized> Table<E> {
    /// Create a table over `columns`.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::DuplicateColumn` if two columns share a name.
    pub fn new(
        executor: Arc<E>,
        name: impl Into<String>,
        columns: Vec<Column>,
        options: TableOptions,
    ) -> Result<Self> {
        let mut seen = HashSet::new();
        if let Some(dup) = columns.iter().find(|c| !seen.insert(c.name())) {
            return Err(QueryError::DuplicateColumn(dup.name().to_string()));
        }

        Ok(Self {
            executor,
            name: name.into(),
            columns,
            create_table: options.create_table.unwrap_or(false),
            engine: options.create_table_options.engine,
            alter_table: options.alter_table.unwrap_or(false),
            alter_options: options.alter_table_options,
            verbose: false,
            initialized: false,
        })
    }

    /// Log every statement and its parameters before execution
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    pub fn creates_table(&self) -> bool {
        self.create_table
    }

    pub fn alters_table(&self) -> bool {
        self.alter_table
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Run the configured DDL once.
    ///
    /// Issues `CREATE TABLE IF NOT EXISTS` when table creation is enabled,
    /// then the per-column ALTER statements when altering is enabled. Every
    /// ALTER statement is attempted even if an earlier one fails; the first
    /// failure is returned afterwards and the table stays uninitialized.
    /// Subsequent calls after a successful init do nothing.
    pub fn init(&mut self) -> Result<()> {
        if self.initialized {
            return Ok(());
        }
        log::info!(
            "Initializing table {} (create: {}, alter: {})",
            self.name,
            self.create_table,
            self.alter_table
        );

        if self.create_table {
            let statement = self.create_table_statement()?;
            self.perform(&statement)?;
        }

        if self.alter_table {
            let mut first_error = None;
            for statement in self.alter_table_statements() {
                if let Err(e) = self.perform(&statement) {
                    log::warn!("ALTER on table {} failed: {}", self.name, e);
                    first_error.get_or_insert(e);
                }
            }
            if let Some(e) = first_error {
                return Err(e);
            }
        }

        self.initialized = true;
        log::debug!("Table {} initialized", self.name);
        Ok(())
    }

    /// Insert one row.
    ///
    /// A `createdStamp` column is set to the current epoch second unless a
    /// truthy value was supplied (always, with `always_set_created_stamp`).
    /// Fields that are not columns of this table are dropped.
    pub fn insert(&self, row: Row) -> Result<QueryResult> {
        let statement = self.insert_statement(row)?;
        self.perform(&statement)
    }

    /// Select rows matching `predicate` (all rows for `None`).
    ///
    /// Fields that match a column are decoded. When exactly one explicit prop
    /// is requested the result is [`Records::Values`].
    pub fn select(
        &self,
        predicate: Option<&PredicateGroup>,
        options: &SelectOptions,
    ) -> Result<SelectOutput> {
        let statement = self.select_statement(predicate, options)?;
        let result = self.perform(&statement)?;

        let records = match options.single_prop() {
            Some(prop) => Records::Values(
                result
                    .rows
                    .into_iter()
                    .map(|mut row| {
                        let value = row.remove(prop).unwrap_or_default();
                        self.decode_field(prop, value)
                    })
                    .collect::<Result<_>>()?,
            ),
            None => Records::Rows(
                result
                    .rows
                    .into_iter()
                    .map(|row| self.decode_row(row))
                    .collect::<Result<_>>()?,
            ),
        };

        Ok(SelectOutput {
            records,
            fields: result.fields,
        })
    }

    /// Update rows matching `predicate` (all rows for `None`).
    ///
    /// An `updatedStamp` column is refreshed like insert's created stamp.
    /// Unknown fields and fields of immutable columns are dropped.
    pub fn update(&self, row: Row, predicate: Option<&PredicateGroup>) -> Result<QueryResult> {
        let statement = self.update_statement(row, predicate)?;
        self.perform(&statement)
    }

    /// Delete rows matching `predicate`. `None` deletes every row.
    pub fn delete(&self, predicate: Option<&PredicateGroup>) -> Result<QueryResult> {
        let statement = self.delete_statement(predicate)?;
        self.perform(&statement)
    }

    /// `CREATE TABLE IF NOT EXISTS` for this table
    ///
    /// # Errors
    ///
    /// Returns `QueryError::InvalidQuery` when the table has no columns.
    pub fn create_table_statement(&self) -> Result<Statement> {
        if self.columns.is_empty() {
            return Err(QueryError::InvalidQuery(format!(
                "table {} has no columns to create",
                self.name
            )));
        }

        let esc = MysqlEscaper;
        let mut parts: Vec<String> = self
            .columns
            .iter()
            .map(|col| column_definition(&esc, col))
            .collect();

        for col in &self.columns {
            let name = esc.escape_identifier(col.name());
            if col.is_primary_key() {
                parts.push(format!("PRIMARY KEY ({name})"));
            }
            if col.has_index() {
                parts.push(format!("INDEX ({name})"));
            }
            if col.is_unique() {
                parts.push(format!("UNIQUE ({name})"));
            }
        }

        Ok(Statement::new(format!(
            "CREATE TABLE IF NOT EXISTS {} ({}) ENGINE={}",
            esc.escape_identifier(&self.name),
            parts.join(", "),
            self.engine
        )))
    }

    /// Per-column ALTER statements: the ADD pass, then the MODIFY pass
    pub fn alter_table_statements(&self) -> Vec<Statement> {
        let esc = MysqlEscaper;
        let table = esc.escape_identifier(&self.name);
        let mut statements = Vec::new();

        if self.alter_options.add_columns {
            statements.extend(self.columns.iter().map(|col| {
                Statement::new(format!(
                    "ALTER TABLE {table} ADD COLUMN IF NOT EXISTS {}",
                    column_definition(&esc, col)
                ))
            }));
        }
        if self.alter_options.modify_columns {
            statements.extend(self.columns.iter().map(|col| {
                Statement::new(format!(
                    "ALTER TABLE {table} MODIFY COLUMN IF EXISTS {}",
                    column_definition(&esc, col)
                ))
            }));
        }
        statements
    }

    /// Build the INSERT for `row`.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::InvalidQuery` when no field of `row` is a column
    /// of this table, and encode errors from the column codecs.
    pub fn insert_statement(&self, mut row: Row) -> Result<Statement> {
        self.populate_stamp(&mut row, StampRole::Created);
        let payload = self.encode_payload(row, false)?;
        if payload.is_empty() {
            return Err(QueryError::InvalidQuery(format!(
                "insert into {} has no known columns",
                self.name
            )));
        }

        let esc = MysqlEscaper;
        let (assignments, params) = bind_row(&esc, payload);
        Ok(Statement::with_params(
            format!("INSERT INTO {} SET {assignments}", esc.escape_identifier(&self.name)),
            params,
        ))
    }

    /// Build the SELECT.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::InvalidQuery` for an explicit empty prop list and
    /// `QueryError::InvalidPredicate` if the predicate does not compile.
    pub fn select_statement(
        &self,
        predicate: Option<&PredicateGroup>,
        options: &SelectOptions,
    ) -> Result<Statement> {
        let esc = MysqlEscaper;
        let projection = match options.props.as_deref() {
            None => "*".to_string(),
            Some([]) => {
                return Err(QueryError::InvalidQuery(
                    "select needs at least one prop; pass \"*\" to return all columns".to_string(),
                ))
            }
            Some(props) => props
                .iter()
                .map(|p| {
                    if p == "*" {
                        p.clone()
                    } else {
                        esc.escape_identifier(p)
                    }
                })
                .collect::<Vec<_>>()
                .join(","),
        };

        let mut sql = format!("SELECT {projection} FROM {}", esc.escape_identifier(&self.name));
        push_where(&mut sql, &esc, predicate)?;
        if let Some(order) = options.order_by.as_ref().filter(|o| !o.is_empty()) {
            sql.push_str(" ORDER BY ");
            sql.push_str(&order.compile(&esc));
        }
        if let Some(limit) = options.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }
        Ok(Statement::new(sql))
    }

    /// Build the UPDATE for `row`.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::InvalidQuery` when nothing updatable remains after
    /// dropping unknown and immutable fields.
    pub fn update_statement(&self, mut row: Row, predicate: Option<&PredicateGroup>) -> Result<Statement> {
        self.populate_stamp(&mut row, StampRole::Updated);
        let payload = self.encode_payload(row, true)?;
        if payload.is_empty() {
            return Err(QueryError::InvalidQuery(format!(
                "update of {} has no mutable known columns",
                self.name
            )));
        }

        let esc = MysqlEscaper;
        let (assignments, params) = bind_row(&esc, payload);
        let mut sql = format!("UPDATE {} SET {assignments}", esc.escape_identifier(&self.name));
        push_where(&mut sql, &esc, predicate)?;
        Ok(Statement::with_params(sql, params))
    }

    pub fn delete_statement(&self, predicate: Option<&PredicateGroup>) -> Result<Statement> {
        let esc = MysqlEscaper;
        let mut sql = format!("DELETE FROM {}", esc.escape_identifier(&self.name));
        push_where(&mut sql, &esc, predicate)?;
        Ok(Statement::new(sql))
    }

    fn perform(&self, statement: &Statement) -> Result<QueryResult> {
        perform(self.executor.as_ref(), statement, self.verbose)
    }

    fn populate_stamp(&self, row: &mut Row, role: StampRole) {
        let column = self.columns.iter().find(|c| match role {
            StampRole::Created => *c.data_type() == DataType::CreatedStamp,
            StampRole::Updated => *c.data_type() == DataType::UpdatedStamp,
        });
        let Some(column) = column else {
            return;
        };

        let always = match role {
            StampRole::Created => column.always_set_created_stamp(),
            StampRole::Updated => column.always_set_updated_stamp(),
        };
        let supplied = row.get(column.name()).is_some_and(Datum::is_truthy);
        if always || !supplied {
            row.insert(column.name(), current_stamp());
        }
    }

    fn encode_payload(&self, row: Row, mutable_only: bool) -> Result<Row> {
        let mut payload = Row::new();
        for (field, value) in row {
            let Some(column) = self.column(&field) else {
                log::trace!("Dropping unknown field {} for table {}", field, self.name);
                continue;
            };
            if mutable_only && !column.is_mutable() {
                continue;
            }
            payload.insert(field, column.encode(value)?);
        }
        Ok(payload)
    }

    fn decode_field(&self, field: &str, value: Datum) -> Result<Datum> {
        match self.column(field) {
            Some(column) => column.decode(value),
            None => Ok(value),
        }
    }

    fn decode_row(&self, row: Row) -> Result<Row> {
        row.into_iter()
            .map(|(field, value)| {
                let decoded = self.decode_field(&field, value)?;
                Ok((field, decoded))
            })
            .collect()
    }
}

/// `` `name` type [UNSIGNED] [NOT NULL] [AUTO_INCREMENT] ``
fn column_definition(esc: &dyn Escaper, column: &Column) -> String {
    let mut def = format!("{} {}", esc.escape_identifier(column.name()), column.physical_type());
    if column.is_unsigned() {
        def.push_str(" UNSIGNED");
    }
    if !column.is_nullable() {
        def.push_str(" NOT NULL");
    }
    if column.is_auto_increment() {
        def.push_str(" AUTO_INCREMENT");
    }
    def
}

fn bind_row(esc: &dyn Escaper, payload: Row) -> (String, Vec<Datum>) {
    let mut assignments = Vec::with_capacity(payload.len());
    let mut params = Vec::with_capacity(payload.len());
    for (field, value) in payload {
        assignments.push(format!("{} = ?", esc.escape_identifier(&field)));
        params.push(value);
    }
    (assignments.join(", "), params)
}

fn push_where(sql: &mut String, esc: &dyn Escaper, predicate: Option<&PredicateGroup>) -> Result<()> {
    if let Some(group) = predicate {
        sql.push_str(" WHERE ");
        sql.push_str(&group.compile(esc)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::ExecError;
    use crate::mock::MockExecutor;
    use crate::query::column::ColumnConfig;
    use crate::query::predicate::{Filter, Predicate};
    use crate::query::table::OrderBy;
    use serde_json::json;

    fn users(mock: &Arc<MockExecutor>, options: TableOptions) -> Table<MockExecutor> {
        Table::new(
            Arc::clone(mock),
            "users",
            vec![
                Column::new(
                    "id",
                    "int",
                    ColumnConfig {
                        primary_key: true,
                        auto_increment: true,
                        unsigned: true,
                        ..Default::default()
                    },
                ),
                Column::new(
                    "email",
                    "string",
                    ColumnConfig {
                        unique: true,
                        index: true,
                        ..Default::default()
                    },
                ),
                Column::new(
                    "nickname",
                    "string",
                    ColumnConfig {
                        nullable: true,
                        ..Default::default()
                    },
                ),
                Column::simple("active", "boolean"),
                Column::new(
                    "profile",
                    "json",
                    ColumnConfig {
                        nullable: true,
                        ..Default::default()
                    },
                ),
                Column::simple("created", "createdStamp"),
                Column::simple("updated", "updatedStamp"),
            ],
            options,
        )
        .unwrap()
    }

    fn table() -> (Arc<MockExecutor>, Table<MockExecutor>) {
        let mock = Arc::new(MockExecutor::new());
        let table = users(&mock, TableOptions::default());
        (mock, table)
    }

    fn param<'a>(stmt: &'a Statement, field: &str) -> &'a Datum {
        let idx = stmt
            .sql
            .split(" SET ")
            .nth(1)
            .and_then(|set| {
                set.split(" WHERE ")
                    .next()
                    .map(|s| s.split(", ").position(|a| a == format!("`{field}` = ?")))
            })
            .flatten()
            .unwrap_or_else(|| panic!("{field} not bound in {}", stmt.sql));
        &stmt.params[idx]
    }

    #[test]
    fn test_duplicate_columns_rejected() {
        let err = Table::new(
            Arc::new(MockExecutor::new()),
            "t",
            vec![Column::simple("a", "int"), Column::simple("a", "string")],
            TableOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, QueryError::DuplicateColumn(name) if name == "a"));
    }

    #[test]
    fn test_create_table_statement() {
        let (_, table) = table();
        let stmt = table.create_table_statement().unwrap();
        assert_eq!(
            stmt.sql,
            "CREATE TABLE IF NOT EXISTS `users` (\
             `id` int UNSIGNED NOT NULL AUTO_INCREMENT, \
             `email` varchar(119) NOT NULL, \
             `nickname` varchar(255), \
             `active` tinyint(1) NOT NULL, \
             `profile` text, \
             `created` int(11) NOT NULL, \
             `updated` int(11) NOT NULL, \
             PRIMARY KEY (`id`), INDEX (`email`), UNIQUE (`email`)) ENGINE=InnoDB"
        );
        assert!(stmt.params.is_empty());
    }

    #[test]
    fn test_create_table_uses_engine_option() {
        let mock = Arc::new(MockExecutor::new());
        let table = users(&mock, TableOptions::default().engine(Engine::Aria));
        assert!(table.create_table_statement().unwrap().sql.ends_with("ENGINE=Aria"));
    }

    #[test]
    fn test_alter_statements_add_then_modify() {
        let (_, table) = table();
        let sql: Vec<String> = table.alter_table_statements().into_iter().map(|s| s.sql).collect();
        assert_eq!(sql.len(), 14);
        assert_eq!(
            sql[0],
            "ALTER TABLE `users` ADD COLUMN IF NOT EXISTS `id` int UNSIGNED NOT NULL AUTO_INCREMENT"
        );
        assert_eq!(sql[7], "ALTER TABLE `users` MODIFY COLUMN IF EXISTS `id` int UNSIGNED NOT NULL AUTO_INCREMENT");
        assert!(sql[..7].iter().all(|s| s.contains("ADD COLUMN")));
        assert!(sql[7..].iter().all(|s| s.contains("MODIFY COLUMN")));
    }

    #[test]
    fn test_init_runs_configured_ddl_once() {
        let mock = Arc::new(MockExecutor::new());
        let mut table = users(&mock, TableOptions::default().create(true).alter(true));
        table.init().unwrap();
        table.init().unwrap();

        let sql = mock.executed_sql();
        assert_eq!(sql.len(), 1 + 14);
        assert!(sql[0].starts_with("CREATE TABLE IF NOT EXISTS"));
        assert!(table.is_initialized());
    }

    #[test]
    fn test_init_without_ddl_issues_nothing() {
        let (mock, mut table) = table();
        table.init().unwrap();
        assert!(mock.executed_sql().is_empty());
        assert!(table.is_initialized());
    }

    #[test]
    fn test_init_attempts_every_alter_and_returns_first_error() {
        let mock = Arc::new(MockExecutor::new());
        let mut table = users(&mock, TableOptions::default().alter(true));
        mock.push_result(QueryResult::default());
        mock.push_error(ExecError::Query("first".to_string()));
        mock.push_error(ExecError::Query("second".to_string()));

        let err = table.init().unwrap_err();
        assert!(matches!(err, QueryError::Transport(ExecError::Query(ref m)) if m == "first"));
        assert_eq!(mock.executed_sql().len(), 14);
        assert!(!table.is_initialized());
    }

    #[test]
    fn test_create_failure_stops_init() {
        let mock = Arc::new(MockExecutor::new());
        let mut table = users(&mock, TableOptions::default().create(true).alter(true));
        mock.push_error(ExecError::Other("no access".to_string()));

        assert!(table.init().is_err());
        assert_eq!(mock.executed_sql().len(), 1);
    }

    #[test]
    fn test_insert_sets_created_stamp() {
        let (_, table) = table();
        let before = current_stamp();
        let stmt = table.insert_statement(Row::new().with("email", "a@b.c")).unwrap();
        let after = current_stamp();

        assert_eq!(stmt.sql, "INSERT INTO `users` SET `email` = ?, `created` = ?");
        match param(&stmt, "created") {
            Datum::Int(stamp) => assert!((before..=after).contains(stamp)),
            other => panic!("unexpected stamp {other:?}"),
        }
    }

    #[test]
    fn test_insert_keeps_supplied_created_stamp() {
        let (_, table) = table();
        let stmt = table.insert_statement(Row::new().with("created", 1000)).unwrap();
        assert_eq!(param(&stmt, "created"), &Datum::Int(1000));

        // a falsy stamp counts as not supplied
        let stmt = table.insert_statement(Row::new().with("created", 0)).unwrap();
        assert_ne!(param(&stmt, "created"), &Datum::Int(0));
    }

    #[test]
    fn test_insert_always_set_created_stamp_overwrites() {
        let mock = Arc::new(MockExecutor::new());
        let table = Table::new(
            mock,
            "events",
            vec![Column::new(
                "created",
                "createdStamp",
                ColumnConfig {
                    always_set_created_stamp: true,
                    ..Default::default()
                },
            )],
            TableOptions::default(),
        )
        .unwrap();
        let stmt = table.insert_statement(Row::new().with("created", 1000)).unwrap();
        assert_ne!(stmt.params[0], Datum::Int(1000));
    }

    #[test]
    fn test_insert_drops_unknown_fields_and_encodes() {
        let (_, table) = table();
        let row = Row::try_from(json!({
            "email": "a@b.c",
            "active": 1,
            "profile": { "theme": "dark" },
            "not_a_column": "ignored"
        }))
        .unwrap();
        let stmt = table.insert_statement(row).unwrap();

        assert!(!stmt.sql.contains("not_a_column"));
        assert_eq!(param(&stmt, "active"), &Datum::Int(1));
        assert_eq!(param(&stmt, "profile"), &Datum::Text("{\"theme\":\"dark\"}".to_string()));
    }

    #[test]
    fn test_insert_with_only_unknown_fields_fails() {
        let mock = Arc::new(MockExecutor::new());
        let table = Table::new(
            Arc::clone(&mock),
            "plain",
            vec![Column::simple("a", "int")],
            TableOptions::default(),
        )
        .unwrap();
        let err = table.insert(Row::new().with("b", 1)).unwrap_err();
        assert!(matches!(err, QueryError::InvalidQuery(_)));
        assert!(mock.executed_sql().is_empty());
    }

    #[test]
    fn test_insert_executes_and_returns_result() {
        let (mock, table) = table();
        mock.push_result(QueryResult {
            affected_rows: 1,
            last_insert_id: Some(42),
            ..Default::default()
        });
        let result = table.insert(Row::new().with("email", "a@b.c")).unwrap();
        assert_eq!(result.last_insert_id, Some(42));
        assert_eq!(mock.executed()[0].params[0], Datum::from("a@b.c"));
    }

    #[test]
    fn test_update_never_binds_primary_key() {
        let (_, table) = table();
        let stmt = table
            .update_statement(
                Row::new().with("id", 9).with("email", "new@b.c"),
                Some(&PredicateGroup::single(Predicate::equals("id", 9))),
            )
            .unwrap();
        assert_eq!(
            stmt.sql,
            "UPDATE `users` SET `email` = ?, `updated` = ? WHERE `id` = 9"
        );
        assert_eq!(stmt.params.len(), 2);
    }

    #[test]
    fn test_update_immutable_column_dropped_silently() {
        let mock = Arc::new(MockExecutor::new());
        let table = Table::new(
            mock,
            "t",
            vec![
                Column::new(
                    "code",
                    "string",
                    ColumnConfig {
                        mutable: false,
                        ..Default::default()
                    },
                ),
                Column::simple("label", "string"),
            ],
            TableOptions::default(),
        )
        .unwrap();
        let stmt = table
            .update_statement(Row::new().with("code", "X").with("label", "y"), None)
            .unwrap();
        assert_eq!(stmt.sql, "UPDATE `t` SET `label` = ?");

        let err = table.update_statement(Row::new().with("code", "X"), None).unwrap_err();
        assert!(matches!(err, QueryError::InvalidQuery(_)));
    }

    #[test]
    fn test_update_drops_unknown_fields() {
        let (_, table) = table();
        let row = Row::try_from(json!({ "nickname": "ada", "not_a_column": "ignored" })).unwrap();
        let stmt = table.update_statement(row, None).unwrap();

        assert!(!stmt.sql.contains("not_a_column"));
        assert_eq!(stmt.sql, "UPDATE `users` SET `nickname` = ?, `updated` = ?");
        assert_eq!(stmt.params.len(), 2);
        assert!(!stmt.params.contains(&Datum::from("ignored")));
        assert_eq!(param(&stmt, "nickname"), &Datum::from("ada"));
    }

    #[test]
    fn test_update_stamp_rules() {
        let (_, table) = table();
        let stmt = table.update_statement(Row::new().with("updated", 5), None).unwrap();
        assert_eq!(param(&stmt, "updated"), &Datum::Int(5));

        let stmt = table.update_statement(Row::new().with("nickname", "n"), None).unwrap();
        assert!(matches!(param(&stmt, "updated"), Datum::Int(s) if *s > 5));
    }

    #[test]
    fn test_select_statement_shapes() {
        let (_, table) = table();
        let all = table.select_statement(None, &SelectOptions::new()).unwrap();
        assert_eq!(all.sql, "SELECT * FROM `users`");

        let star = table.select_statement(None, &SelectOptions::new().props(["*"])).unwrap();
        assert_eq!(star.sql, "SELECT * FROM `users`");

        let filter = PredicateGroup::from_filters([Filter::new().eq("email", "a@b.c")]).unwrap();
        let stmt = table
            .select_statement(
                Some(&filter),
                &SelectOptions::new()
                    .props(["id", "email"])
                    .order_by(OrderBy::desc("created"))
                    .limit(10),
            )
            .unwrap();
        assert_eq!(
            stmt.sql,
            "SELECT `id`,`email` FROM `users` WHERE `email` = 'a@b.c' ORDER BY `created` DESC LIMIT 10"
        );
    }

    #[test]
    fn test_select_empty_props_fails() {
        let (mock, table) = table();
        let err = table
            .select(None, &SelectOptions::new().props(Vec::<String>::new()))
            .unwrap_err();
        assert!(matches!(err, QueryError::InvalidQuery(_)));
        assert!(mock.executed_sql().is_empty());
    }

    #[test]
    fn test_select_on_empty_table() {
        let (_, table) = table();
        let out = table.select(None, &SelectOptions::new().props(["*"])).unwrap();
        assert!(out.records.is_empty());
        assert_eq!(out.records, Records::Rows(vec![]));
    }

    #[test]
    fn test_select_decodes_known_fields() {
        let (mock, table) = table();
        mock.push_rows(vec![Row::new()
            .with("id", 1)
            .with("active", 1)
            .with("profile", "{\"theme\":\"dark\"}")
            .with("extra", "raw")]);

        let out = table.select(None, &SelectOptions::new()).unwrap();
        let rows = out.records.into_rows().unwrap();
        assert_eq!(rows[0].get("active"), Some(&Datum::Bool(true)));
        assert_eq!(rows[0].get("profile"), Some(&Datum::Json(json!({ "theme": "dark" }))));
        assert_eq!(rows[0].get("extra"), Some(&Datum::from("raw")));
    }

    #[test]
    fn test_select_single_prop_unwraps_values() {
        let (mock, table) = table();
        mock.push_rows(vec![
            Row::new().with("active", 0),
            Row::new().with("active", 1),
        ]);
        let out = table.select(None, &SelectOptions::new().props(["active"])).unwrap();
        assert_eq!(
            out.records,
            Records::Values(vec![Datum::Bool(false), Datum::Bool(true)])
        );
    }

    #[test]
    fn test_select_decode_error_surfaces() {
        let (mock, table) = table();
        mock.push_rows(vec![Row::new().with("profile", "{not json")]);
        let err = table.select(None, &SelectOptions::new()).unwrap_err();
        assert!(matches!(err, QueryError::Deserialization(_)));
    }

    #[test]
    fn test_delete_without_predicate_matches_all() {
        let (mock, table) = table();
        table.delete(None).unwrap();
        let filter = PredicateGroup::from_json([json!({ "id": [1, 2] })]).unwrap();
        table.delete(Some(&filter)).unwrap();
        assert_eq!(
            mock.executed_sql(),
            vec![
                "DELETE FROM `users`".to_string(),
                "DELETE FROM `users` WHERE `id` IN (1,2)".to_string(),
            ]
        );
    }

    #[test]
    fn test_transport_error_passes_through() {
        let (mock, table) = table();
        mock.push_error(ExecError::Query("deadlock".to_string()));
        let err = table.delete(None).unwrap_err();
        assert!(matches!(err, QueryError::Transport(ExecError::Query(ref m)) if m == "deadlock"));
    }
}
