//! A scripted executor for tests that must not touch a live Neo4j.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde_json::Value;

use crate::client::{CypherExecutor, GraphError, Record};
use crate::statements::Statement;

/// Records every statement and answers with queued responses.
///
/// When the queue is empty a statement yields no rows.
#[derive(Default)]
pub struct ScriptedExecutor {
    responses: Mutex<VecDeque<Result<Vec<Record>, String>>>,
    executed: Mutex<Vec<Statement>>,
    ping_error: Mutex<Option<String>>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ScriptedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue rows for the next statement. Non-object values are ignored.
    pub fn push_rows(&self, rows: Vec<Value>) {
        let records = rows
            .into_iter()
            .filter_map(|v| match v {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .collect();
        lock(&self.responses).push_back(Ok(records));
    }

    /// Make the next statement fail with `message`.
    pub fn push_error(&self, message: &str) {
        lock(&self.responses).push_back(Err(message.to_string()));
    }

    /// Make every subsequent ping fail with `message`.
    pub fn fail_ping(&self, message: &str) {
        *lock(&self.ping_error) = Some(message.to_string());
    }

    /// Statements executed so far, in order.
    pub fn statements(&self) -> Vec<Statement> {
        lock(&self.executed).clone()
    }
}

#[async_trait]
impl CypherExecutor for ScriptedExecutor {
    async fn execute(&self, statement: Statement) -> Result<Vec<Record>, GraphError> {
        lock(&self.executed).push(statement);
        let next = lock(&self.responses).pop_front();
        match next {
            Some(Ok(rows)) => Ok(rows),
            Some(Err(message)) => Err(GraphError::Connection(message)),
            None => Ok(Vec::new()),
        }
    }

    async fn ping(&self) -> Result<(), GraphError> {
        match lock(&self.ping_error).clone() {
            Some(message) => Err(GraphError::Connection(message)),
            None => Ok(()),
        }
    }
}
