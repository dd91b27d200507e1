//! SQLite driver
//!
//! INTEGER and REAL cells are rendered as decimal text, TEXT and BLOB cells
//! are passed through as raw bytes, NULL becomes the null marker.

use rusqlite::types::ValueRef;
use rusqlite::{OpenFlags, Rows};

use crate::collector::{Cell, GatherError, GatherResult, RawRow};

use super::{Connection, RowCursor, Statement};

const DRIVER: &str = "sqlite";

/// Read-only SQLite connection
pub struct SqliteConnection {
    conn: rusqlite::Connection,
}

impl SqliteConnection {
    /// Opens an existing database. `dsn` is a path or a `file:` URI.
    pub fn open(dsn: &str) -> GatherResult<Self> {
        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;

        let conn = rusqlite::Connection::open_with_flags(dsn, flags)
            .map_err(|e| GatherError::connection(DRIVER, e))?;

        Ok(Self { conn })
    }
}

impl Connection for SqliteConnection {
    fn ping(&mut self) -> GatherResult<()> {
        self.conn
            .query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
            .map(|_| ())
            .map_err(|e| GatherError::connection(DRIVER, e))
    }

    fn prepare(&mut self, sql: &str) -> GatherResult<Box<dyn Statement + '_>> {
        let stmt = self
            .conn
            .prepare(sql)
            .map_err(|e| GatherError::query_execution(sql, e))?;

        let columns = stmt.column_names().into_iter().map(String::from).collect();

        Ok(Box::new(SqliteStatement {
            stmt,
            sql: sql.to_string(),
            columns,
        }))
    }

    fn close(self: Box<Self>) -> GatherResult<()> {
        self.conn
            .close()
            .map_err(|(_, e)| GatherError::connection(DRIVER, e))
    }
}

struct SqliteStatement<'c> {
    stmt: rusqlite::Statement<'c>,
    sql: String,
    columns: Vec<String>,
}

impl Statement for SqliteStatement<'_> {
    fn columns(&self) -> &[String] {
        &self.columns
    }

    fn query(&mut self) -> GatherResult<Box<dyn RowCursor + '_>> {
        let width = self.columns.len();
        let rows = self
            .stmt
            .query([])
            .map_err(|e| GatherError::query_execution(&self.sql, e))?;

        Ok(Box::new(SqliteRows {
            rows,
            sql: &self.sql,
            width,
        }))
    }
}

struct SqliteRows<'s> {
    rows: Rows<'s>,
    sql: &'s str,
    width: usize,
}

fn to_cell(value: ValueRef<'_>) -> Cell {
    match value {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(i.to_string().into_bytes()),
        ValueRef::Real(f) => Some(f.to_string().into_bytes()),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => Some(bytes.to_vec()),
    }
}

impl RowCursor for SqliteRows<'_> {
    fn next_row(&mut self) -> GatherResult<Option<RawRow>> {
        let row = match self.rows.next() {
            Ok(Some(row)) => row,
            Ok(None) => return Ok(None),
            Err(e) => return Err(GatherError::row_read(self.sql, e)),
        };

        let mut cells = Vec::with_capacity(self.width);
        for idx in 0..self.width {
            let value = row
                .get_ref(idx)
                .map_err(|e| GatherError::row_read(self.sql, e))?;
            cells.push(to_cell(value));
        }

        Ok(Some(RawRow::new(cells)))
    }
}
