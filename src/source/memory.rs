//! In-memory fixture driver
//!
//! Serves fixed result sets keyed by exact SQL text. Tracks how many
//! connections and cursors are currently open so callers can check that
//! every one of them was released.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::collector::{GatherError, GatherResult, RawRow};

use super::{Connection, Connector, RowCursor, Statement};

const DRIVER: &str = "memory";

/// A fixed result set
#[derive(Debug, Clone, Default)]
pub struct MemoryTable {
    columns: Vec<String>,
    rows: Vec<Result<RawRow, String>>,
}

impl MemoryTable {
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn with_row(mut self, row: RawRow) -> Self {
        self.rows.push(Ok(row));
        self
    }

    /// Adds a row of text cells, `None` meaning NULL
    pub fn with_text_row<S: AsRef<str>>(self, cells: impl IntoIterator<Item = Option<S>>) -> Self {
        let cells: Vec<Option<S>> = cells.into_iter().collect();
        self.with_row(RawRow::from_text(&cells))
    }

    /// Adds a position at which fetching fails
    pub fn with_read_failure(mut self, message: impl Into<String>) -> Self {
        self.rows.push(Err(message.into()));
        self
    }
}

#[derive(Debug, Default)]
struct Counters {
    connections: AtomicUsize,
    cursors: AtomicUsize,
    closed: AtomicUsize,
}

/// Connector serving [`MemoryTable`]s
#[derive(Debug, Clone, Default)]
pub struct MemoryConnector {
    tables: Arc<BTreeMap<String, MemoryTable>>,
    fail_open: Option<String>,
    fail_ping: Option<String>,
    counters: Arc<Counters>,
}

impl MemoryConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `table` for the exact query text `sql`
    pub fn with_table(mut self, sql: impl Into<String>, table: MemoryTable) -> Self {
        Arc::make_mut(&mut self.tables).insert(sql.into(), table);
        self
    }

    pub fn failing_open(mut self, message: impl Into<String>) -> Self {
        self.fail_open = Some(message.into());
        self
    }

    pub fn failing_ping(mut self, message: impl Into<String>) -> Self {
        self.fail_ping = Some(message.into());
        self
    }

    /// Connections opened and not yet dropped
    pub fn open_connections(&self) -> usize {
        self.counters.connections.load(Ordering::SeqCst)
    }

    /// Cursors created and not yet dropped
    pub fn open_cursors(&self) -> usize {
        self.counters.cursors.load(Ordering::SeqCst)
    }

    /// Connections closed explicitly through [`Connection::close`]
    pub fn closed_connections(&self) -> usize {
        self.counters.closed.load(Ordering::SeqCst)
    }
}

impl Connector for MemoryConnector {
    fn open(&self, _driver: &str, _dsn: &str) -> GatherResult<Box<dyn Connection>> {
        if let Some(message) = &self.fail_open {
            return Err(GatherError::connection(DRIVER, message));
        }

        self.counters.connections.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MemoryConnection {
            tables: Arc::clone(&self.tables),
            fail_ping: self.fail_ping.clone(),
            counters: Arc::clone(&self.counters),
        }))
    }
}

struct MemoryConnection {
    tables: Arc<BTreeMap<String, MemoryTable>>,
    fail_ping: Option<String>,
    counters: Arc<Counters>,
}

impl Drop for MemoryConnection {
    fn drop(&mut self) {
        self.counters.connections.fetch_sub(1, Ordering::SeqCst);
    }
}

impl Connection for MemoryConnection {
    fn ping(&mut self) -> GatherResult<()> {
        match &self.fail_ping {
            Some(message) => Err(GatherError::connection(DRIVER, message)),
            None => Ok(()),
        }
    }

    fn prepare(&mut self, sql: &str) -> GatherResult<Box<dyn Statement + '_>> {
        let table = self
            .tables
            .get(sql)
            .ok_or_else(|| GatherError::query_execution(sql, "no fixture for query"))?;

        Ok(Box::new(MemoryStatement {
            table,
            sql: sql.to_string(),
            counters: &self.counters,
        }))
    }

    fn close(self: Box<Self>) -> GatherResult<()> {
        self.counters.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

struct MemoryStatement<'c> {
    table: &'c MemoryTable,
    sql: String,
    counters: &'c Counters,
}

impl Statement for MemoryStatement<'_> {
    fn columns(&self) -> &[String] {
        &self.table.columns
    }

    fn query(&mut self) -> GatherResult<Box<dyn RowCursor + '_>> {
        self.counters.cursors.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MemoryCursor {
            rows: self.table.rows.iter(),
            sql: &self.sql,
            counters: self.counters,
        }))
    }
}

struct MemoryCursor<'s> {
    rows: std::slice::Iter<'s, Result<RawRow, String>>,
    sql: &'s str,
    counters: &'s Counters,
}

impl Drop for MemoryCursor<'_> {
    fn drop(&mut self) {
        self.counters.cursors.fetch_sub(1, Ordering::SeqCst);
    }
}

impl RowCursor for MemoryCursor<'_> {
    fn next_row(&mut self) -> GatherResult<Option<RawRow>> {
        match self.rows.next() {
            Some(Ok(row)) => Ok(Some(row.clone())),
            Some(Err(message)) => Err(GatherError::row_read(self.sql, message)),
            None => Ok(None),
        }
    }
}
