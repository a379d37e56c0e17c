//! Common Test Utilities
//!
//! An in-memory store that records every statement it receives, stages writes
//! per transaction and only makes them visible on commit.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use forum_server::application::services::CreationServiceImpl;
use forum_server::domain::{EntityKind, Row, Store, StoreTransaction, Value};
use forum_server::shared::error::{ForumError, StorageError};

/// Storage call as observed by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Begin,
    Insert { table: &'static str, rows: usize },
    Commit,
    Rollback,
}

impl Event {
    pub fn insert(table: &'static str, rows: usize) -> Self {
        Self::Insert { table, rows }
    }
}

#[derive(Default)]
struct State {
    tables: HashMap<&'static str, Vec<Row>>,
    sequences: HashMap<&'static str, i64>,
    events: Vec<Event>,
    statements: Vec<Vec<Row>>,
    failing: HashSet<&'static str>,
    unique: Vec<(&'static str, &'static str)>,
    migrated: Vec<EntityKind>,
}

impl State {
    /// First unique constraint `row` would violate against committed rows
    /// plus `pending`.
    fn conflict(&self, row: &Row, pending: &[Row]) -> Option<String> {
        for (table, column) in &self.unique {
            if row.table() != *table {
                continue;
            }
            let Some(value) = row.get(column) else {
                continue;
            };
            let clash = self
                .tables
                .get(table)
                .into_iter()
                .flatten()
                .chain(pending.iter())
                .any(|other| other.table() == *table && other.get(column) == Some(value));
            if clash {
                return Some(format!("{table}.{column}"));
            }
        }
        None
    }
}

/// In-memory [`Store`] with statement recording and failure injection.
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
    closed: AtomicBool,
}

impl MemoryStore {
    /// A store enforcing the same unique keys as the PostgreSQL schema.
    pub fn new() -> Arc<Self> {
        let state = State {
            unique: vec![
                ("users", "user_name"),
                ("topics", "title"),
                ("emails", "email"),
            ],
            ..State::default()
        };
        Arc::new(Self {
            state: Arc::new(Mutex::new(state)),
            closed: AtomicBool::new(false),
        })
    }

    /// Make every insert into `table` fail.
    pub fn fail_inserts_into(&self, table: &'static str) {
        self.state.lock().failing.insert(table);
    }

    /// Drop the connection; later transactions cannot begin.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    pub fn events(&self) -> Vec<Event> {
        self.state.lock().events.clone()
    }

    /// Every insert statement received, committed or not.
    pub fn statements(&self) -> Vec<Vec<Row>> {
        self.state.lock().statements.clone()
    }

    /// Statements that targeted `table`.
    pub fn statements_for(&self, table: &str) -> Vec<Vec<Row>> {
        self.statements()
            .into_iter()
            .filter(|rows| rows.first().is_some_and(|row| row.table() == table))
            .collect()
    }

    /// Committed rows of `table`.
    pub fn rows(&self, table: &str) -> Vec<Row> {
        self.state
            .lock()
            .tables
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    pub fn count(&self, table: &str) -> usize {
        self.rows(table).len()
    }

    pub fn migrated(&self) -> Vec<EntityKind> {
        self.state.lock().migrated.clone()
    }

    /// Seed a committed row, bypassing the protocol.
    pub fn seed(&self, row: Row) {
        self.state
            .lock()
            .tables
            .entry(row.table())
            .or_default()
            .push(row);
    }
}

#[async_trait]
impl Store for MemoryStore {
    type Transaction = MemoryTransaction;

    async fn begin(&self) -> Result<MemoryTransaction, ForumError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(ForumError::NoConnection);
        }
        self.state.lock().events.push(Event::Begin);
        Ok(MemoryTransaction {
            state: Arc::clone(&self.state),
            staged: Vec::new(),
        })
    }

    async fn migrate(&self, kinds: &[EntityKind]) -> Result<(), ForumError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(ForumError::NoConnection);
        }
        let mut state = self.state.lock();
        for kind in kinds {
            state.tables.entry(kind.table()).or_default();
            state.migrated.push(*kind);
        }
        Ok(())
    }
}

pub struct MemoryTransaction {
    state: Arc<Mutex<State>>,
    staged: Vec<Row>,
}

impl MemoryTransaction {
    fn insert_rows(&mut self, rows: Vec<Row>) -> Result<Vec<i64>, StorageError> {
        let mut state = self.state.lock();
        let Some(table) = rows.first().map(Row::table) else {
            return Ok(Vec::new());
        };
        state.events.push(Event::insert(table, rows.len()));
        state.statements.push(rows.clone());

        if state.failing.contains(table) {
            return Err(StorageError::Backend(format!("insert into {table} failed")));
        }

        let mut ids = Vec::new();
        for mut row in rows {
            if let Some(constraint) = state.conflict(&row, &self.staged) {
                return Err(duplicate(constraint));
            }
            if row.has_generated_key() {
                let next = state.sequences.entry(table).or_insert(0);
                *next += 1;
                ids.push(*next);
                row.columns.insert(0, ("id", Value::BigInt(*next)));
            }
            self.staged.push(row);
        }
        Ok(ids)
    }
}

#[async_trait]
impl StoreTransaction for MemoryTransaction {
    async fn insert(&mut self, row: Row) -> Result<Option<i64>, StorageError> {
        let ids = self.insert_rows(vec![row])?;
        Ok(ids.into_iter().next())
    }

    async fn insert_batch(
        &mut self,
        rows: Vec<Row>,
        batch_size: usize,
    ) -> Result<Vec<i64>, StorageError> {
        let mut ids = Vec::with_capacity(rows.len());
        for chunk in rows.chunks(batch_size.max(1)) {
            ids.extend(self.insert_rows(chunk.to_vec())?);
        }
        Ok(ids)
    }

    async fn commit(self) -> Result<(), StorageError> {
        let mut state = self.state.lock();
        // Writes from transactions that committed in the meantime.
        for (i, row) in self.staged.iter().enumerate() {
            if let Some(constraint) = state.conflict(row, &self.staged[..i]) {
                state.events.push(Event::Rollback);
                return Err(duplicate(constraint));
            }
        }
        for row in self.staged {
            state.tables.entry(row.table()).or_default().push(row);
        }
        state.events.push(Event::Commit);
        Ok(())
    }

    async fn rollback(self) -> Result<(), StorageError> {
        self.state.lock().events.push(Event::Rollback);
        Ok(())
    }
}

/// The error PostgreSQL reports for a duplicate key, carried as the cause.
fn duplicate(constraint: String) -> StorageError {
    let source = sqlx::Error::Protocol(format!(
        "duplicate key value violates unique constraint \"{constraint}\""
    ));
    StorageError::UniqueViolation { constraint, source }
}

/// Creation service over a fresh in-memory store.
pub fn service() -> (Arc<MemoryStore>, CreationServiceImpl<MemoryStore>) {
    let store = MemoryStore::new();
    let service = CreationServiceImpl::new(Arc::clone(&store));
    (store, service)
}

/// Integer column of a row, panicking when absent.
pub fn int(row: &Row, column: &str) -> i64 {
    row.get(column)
        .and_then(Value::as_i64)
        .unwrap_or_else(|| panic!("column {column} missing from {}", row.table()))
}

/// Text column of a row, panicking when absent.
pub fn text<'a>(row: &'a Row, column: &str) -> &'a str {
    row.get(column)
        .and_then(Value::as_str)
        .unwrap_or_else(|| panic!("column {column} missing from {}", row.table()))
}
