//! Database access seam
//!
//! The collector talks to a database only through these traits:
//!
//! 1. [`Connector::open`] a [`Connection`] for a driver name and DSN
//! 2. [`Connection::ping`] it
//! 3. [`Connection::prepare`] each query into a [`Statement`]
//! 4. [`Statement::query`] it for a lazy [`RowCursor`]
//! 5. [`Connection::close`] it
//!
//! Connections, statements and cursors are owned values. Dropping one
//! releases it, so early returns never leak a cursor or a connection.

mod memory;
mod sqlite;

pub use memory::{MemoryConnector, MemoryTable};
pub use sqlite::SqliteConnection;

use std::collections::BTreeMap;

use crate::collector::{GatherError, GatherResult, RawRow};

/// Opens connections by driver name
pub trait Connector {
    fn open(&self, driver: &str, dsn: &str) -> GatherResult<Box<dyn Connection>>;
}

/// An open database connection
pub trait Connection {
    /// Round-trips to the database to verify it is reachable
    fn ping(&mut self) -> GatherResult<()>;

    /// Prepares `sql`, making its column names available
    fn prepare(&mut self, sql: &str) -> GatherResult<Box<dyn Statement + '_>>;

    /// Closes the connection, reporting any error the driver raises
    fn close(self: Box<Self>) -> GatherResult<()>;
}

/// A prepared query
pub trait Statement {
    /// Result column names in order
    fn columns(&self) -> &[String];

    /// Executes the query
    fn query(&mut self) -> GatherResult<Box<dyn RowCursor + '_>>;
}

/// A finite, non-restartable sequence of raw rows
pub trait RowCursor {
    /// Fetches the next row, `None` once exhausted
    fn next_row(&mut self) -> GatherResult<Option<RawRow>>;
}

/// Constructor for connections of one driver
pub type DriverFactory = Box<dyn Fn(&str) -> GatherResult<Box<dyn Connection>> + Send + Sync>;

/// Connector dispatching on driver name
pub struct DriverRegistry {
    drivers: BTreeMap<String, DriverFactory>,
}

impl DriverRegistry {
    /// Registry with no drivers
    pub fn empty() -> Self {
        Self {
            drivers: BTreeMap::new(),
        }
    }

    /// Registry with the built-in SQLite driver under `sqlite` and `sqlite3`
    pub fn new() -> Self {
        let mut registry = Self::empty();
        for name in ["sqlite", "sqlite3"] {
            registry.register(name, |dsn| {
                Ok(Box::new(SqliteConnection::open(dsn)?) as Box<dyn Connection>)
            });
        }
        registry
    }

    /// Registers (or replaces) a driver
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(&str) -> GatherResult<Box<dyn Connection>> + Send + Sync + 'static,
    {
        self.drivers.insert(name.into(), Box::new(factory));
    }

    /// Registered driver names, sorted
    pub fn drivers(&self) -> Vec<&str> {
        self.drivers.keys().map(String::as_str).collect()
    }

    pub fn supports(&self, driver: &str) -> bool {
        self.drivers.contains_key(driver)
    }
}

impl Default for DriverRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Connector for DriverRegistry {
    fn open(&self, driver: &str, dsn: &str) -> GatherResult<Box<dyn Connection>> {
        let factory = self.drivers.get(driver).ok_or_else(|| {
            GatherError::connection(
                driver,
                format!("unsupported driver (available: {})", self.drivers().join(", ")),
            )
        })?;
        factory(dsn)
    }
}
