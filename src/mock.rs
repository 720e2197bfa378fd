//! In-memory [`SqlExecutor`] for tests.
//!
//! `MockExecutor` records every statement it receives and replays queued
//! results in FIFO order. When the queue is empty it answers with an empty
//! `QueryResult`, so DDL and DML paths can be exercised without seeding.

use crate::executor::{ExecError, QueryResult, SqlExecutor, Statement};
use crate::value::Row;
use std::collections::VecDeque;
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct MockExecutor {
    queue: Mutex<VecDeque<Result<QueryResult, ExecError>>>,
    log: Mutex<Vec<Statement>>,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a result with the given rows
    pub fn push_rows(&self, rows: Vec<Row>) {
        self.push_result(QueryResult::from_rows(rows));
    }

    pub fn push_result(&self, result: QueryResult) {
        self.lock_queue().push_back(Ok(result));
    }

    pub fn push_error(&self, error: ExecError) {
        self.lock_queue().push_back(Err(error));
    }

    /// Every statement executed so far, in order
    pub fn executed(&self) -> Vec<Statement> {
        self.log.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn executed_sql(&self) -> Vec<String> {
        self.executed().into_iter().map(|s| s.sql).collect()
    }

    fn lock_queue(&self) -> std::sync::MutexGuard<'_, VecDeque<Result<QueryResult, ExecError>>> {
        self.queue.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl SqlExecutor for MockExecutor {
    fn execute(&self, statement: &Statement) -> Result<QueryResult, ExecError> {
        self.log
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(statement.clone());
        self.lock_queue()
            .pop_front()
            .unwrap_or_else(|| Ok(QueryResult::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replays_in_order_then_defaults() {
        let mock = MockExecutor::new();
        mock.push_result(QueryResult::affected(3));
        mock.push_error(ExecError::Other("boom".to_string()));

        let stmt = Statement::new("SELECT 1");
        assert_eq!(mock.execute(&stmt).unwrap().affected_rows, 3);
        assert!(mock.execute(&stmt).is_err());
        assert_eq!(mock.execute(&stmt).unwrap(), QueryResult::default());
        assert_eq!(mock.executed().len(), 3);
    }
}
