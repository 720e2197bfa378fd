//! End-to-end table lifecycle against a recording executor.
//!
//! The executor records each statement and answers from a queue, standing in
//! for a MySQL connection the way an application-supplied transport would.

use chrono::{TimeZone, Utc};
use schemaquery::{
    ColumnConfig, Database, Datum, ExecError, Filter, Operator, OrderBy, PredicateGroup,
    QueryConfig, QueryError, QueryResult, Records, Row, SelectOptions, SqlExecutor, Statement,
    TableSchema,
};
use serde_json::json;
use std::collections::VecDeque;
use std::sync::Mutex;

#[derive(Default)]
struct Recorder {
    statements: Mutex<Vec<Statement>>,
    responses: Mutex<VecDeque<Result<QueryResult, ExecError>>>,
}

impl Recorder {
    fn respond(&self, response: Result<QueryResult, ExecError>) {
        self.responses.lock().unwrap().push_back(response);
    }

    fn statements(&self) -> Vec<Statement> {
        self.statements.lock().unwrap().clone()
    }
}

impl SqlExecutor for Recorder {
    fn execute(&self, statement: &Statement) -> Result<QueryResult, ExecError> {
        self.statements.lock().unwrap().push(statement.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(QueryResult::default()))
    }
}

fn schema() -> TableSchema {
    serde_json::from_value(json!({
        "name": "articles",
        "columns": [
            { "name": "id", "data_type": "int(11)", "config": { "primary_key": true, "auto_increment": true, "unsigned": true } },
            { "name": "slug", "data_type": "string", "config": { "unique": true } },
            { "name": "published", "data_type": "boolean", "config": { "default_value": false } },
            { "name": "meta", "data_type": "json", "config": { "nullable": true } },
            { "name": "publish_at", "data_type": "datetime", "config": { "nullable": true } },
            { "name": "created", "data_type": "createdStamp" },
            { "name": "updated", "data_type": "updatedStamp" }
        ],
        "options": { "alter_table": false }
    }))
    .unwrap()
}

#[test]
fn full_lifecycle() {
    let db = Database::new(
        Recorder::default(),
        QueryConfig {
            create_tables: true,
            alter_tables: true,
            verbose: true,
        },
    );
    let mut articles = db.load_table(schema()).unwrap();
    assert!(articles.creates_table());
    assert!(!articles.alters_table(), "explicit option overrides database default");

    articles.init().unwrap();

    let publish_at = Utc.with_ymd_and_hms(2024, 2, 29, 8, 5, 9).unwrap();
    articles
        .insert(
            Row::new()
                .with("slug", "hello-world")
                .with("meta", Datum::Json(json!({ "tags": ["intro"] })))
                .with("publish_at", publish_at)
                .with("views", 10),
        )
        .unwrap();

    db.executor().respond(Ok(QueryResult::from_rows(vec![Row::new()
        .with("id", 1)
        .with("slug", "hello-world")
        .with("published", Datum::Null)
        .with("meta", "{\"tags\":[\"intro\"]}")
        .with("publish_at", "2024-02-29 08:05:09.000")])));

    let filter = PredicateGroup::from_filters([Filter::new()
        .op("slug", Operator::StartsWith, "hello")
        .is_null("updated")])
    .unwrap();
    let out = articles
        .select(Some(&filter), &SelectOptions::new().order_by(OrderBy::desc("id")))
        .unwrap();
    let rows = out.records.into_rows().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("published"), Some(&Datum::Bool(false)));
    assert_eq!(rows[0].get("meta"), Some(&Datum::Json(json!({ "tags": ["intro"] }))));
    assert_eq!(rows[0].get("publish_at"), Some(&Datum::DateTime(publish_at)));

    articles
        .update(
            Row::new().with("id", 99).with("published", true),
            Some(&PredicateGroup::from_json([json!({ "id": 1 })]).unwrap()),
        )
        .unwrap();
    articles.delete(None).unwrap();

    let statements = db.executor().statements();
    let sql: Vec<&str> = statements.iter().map(|s| s.sql.as_str()).collect();
    assert_eq!(sql.len(), 5);
    assert_eq!(
        sql[0],
        "CREATE TABLE IF NOT EXISTS `articles` (`id` int(11) UNSIGNED NOT NULL AUTO_INCREMENT, \
         `slug` varchar(255) NOT NULL, `published` tinyint(1) NOT NULL, `meta` text, \
         `publish_at` datetime, `created` int(11) NOT NULL, `updated` int(11) NOT NULL, \
         PRIMARY KEY (`id`), UNIQUE (`slug`)) ENGINE=InnoDB"
    );
    assert_eq!(
        sql[1],
        "INSERT INTO `articles` SET `slug` = ?, `meta` = ?, `publish_at` = ?, `created` = ?"
    );
    assert_eq!(
        &statements[1].params[..3],
        &[
            Datum::from("hello-world"),
            Datum::from("{\"tags\":[\"intro\"]}"),
            Datum::from("2024-02-29 08:05:09.000"),
        ]
    );
    assert_eq!(
        sql[2],
        "SELECT * FROM `articles` WHERE (`slug` LIKE 'hello%' AND `updated` IS NULL) ORDER BY `id` DESC"
    );
    assert_eq!(sql[3], "UPDATE `articles` SET `published` = ?, `updated` = ? WHERE `id` = 1");
    assert_eq!(statements[3].params[0], Datum::Int(1));
    assert_eq!(sql[4], "DELETE FROM `articles`");
}

#[test]
fn single_prop_select_returns_values() {
    let db = Database::new(Recorder::default(), QueryConfig::default());
    let table = db
        .table(
            "flags",
            vec![
                db.column("name", "string", ColumnConfig::default()),
                db.column("on", "boolean", ColumnConfig::default()),
            ],
        )
        .unwrap();

    db.executor().respond(Ok(QueryResult::from_rows(vec![
        Row::new().with("on", 1),
        Row::new().with("on", 0),
    ])));
    let out = table
        .select(None, &SelectOptions::new().props(["on"]).limit(2))
        .unwrap();
    assert_eq!(out.records, Records::Values(vec![Datum::Bool(true), Datum::Bool(false)]));
    assert_eq!(db.executor().statements()[0].sql, "SELECT `on` FROM `flags` LIMIT 2");
}

#[test]
fn invalid_input_never_reaches_the_executor() {
    let db = Database::new(Recorder::default(), QueryConfig::default());
    let table = db
        .table("t", vec![db.column("a", "int", ColumnConfig::default())])
        .unwrap();

    let err = table
        .select(None, &SelectOptions::new().props(Vec::<String>::new()))
        .unwrap_err();
    assert!(matches!(err, QueryError::InvalidQuery(_)));

    let err = PredicateGroup::from_filters(Vec::<Filter>::new()).unwrap_err();
    assert!(matches!(err, QueryError::InvalidPredicate(_)));

    let err = PredicateGroup::from_json([json!({ "a": { "between": [1, 2] } })]).unwrap_err();
    assert!(matches!(err, QueryError::InvalidPredicate(_)));

    assert!(db.executor().statements().is_empty());
}

#[test]
fn transport_errors_are_returned_unchanged() {
    let db = Database::new(Recorder::default(), QueryConfig::default());
    let table = db
        .table("t", vec![db.column("a", "int", ColumnConfig::default())])
        .unwrap();
    db.executor()
        .respond(Err(ExecError::Query("Table 't' doesn't exist".to_string())));

    match table.insert(Row::new().with("a", 1)) {
        Err(QueryError::Transport(ExecError::Query(msg))) => {
            assert_eq!(msg, "Table 't' doesn't exist")
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn duplicate_columns_in_schema_fail() {
    let db = Database::new(Recorder::default(), QueryConfig::default());
    let schema: TableSchema = serde_json::from_value(json!({
        "name": "dup",
        "columns": [
            { "name": "a", "data_type": "int" },
            { "name": "a", "data_type": "string" }
        ]
    }))
    .unwrap();
    assert!(matches!(db.load_table(schema), Err(QueryError::DuplicateColumn(_))));
}
