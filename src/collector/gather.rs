//! Collection cycle
//!
//! # Flow (strict order)
//!
//! 1. Open a connection and ping it
//! 2. For each configured query, in order:
//!    - prepare it and read its column names
//!    - classify the columns once
//!    - pull rows one at a time, decode each and emit it
//! 3. Close the connection
//!
//! The first error of any step aborts the cycle. Nothing is retried and the
//! remaining queries are skipped. The connection and any open cursor are
//! dropped on the way out.

use std::time::Instant;

use chrono::Utc;

use crate::sink::MetricSink;
use crate::source::{Connection, Connector};

use super::classifier::{classify, ColumnRoleConfig};
use super::decoder::{decode, NullPolicy};
use super::errors::{GatherError, GatherResult};
use super::observer::{CycleSummary, GatherObserver};

/// One configured collector instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlQuery {
    driver: String,
    server_url: String,
    table_name: String,
    queries: Vec<String>,
    roles: ColumnRoleConfig,
    null_policy: NullPolicy,
}

impl SqlQuery {
    /// Collector emitting into `table_name`, with no queries yet
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            driver: String::new(),
            server_url: String::new(),
            table_name: table_name.into(),
            queries: Vec::new(),
            roles: ColumnRoleConfig::default(),
            null_policy: NullPolicy::Omit,
        }
    }

    pub fn with_source(mut self, driver: impl Into<String>, server_url: impl Into<String>) -> Self {
        self.driver = driver.into();
        self.server_url = server_url.into();
        self
    }

    pub fn with_queries<S: Into<String>>(mut self, queries: impl IntoIterator<Item = S>) -> Self {
        self.queries = queries.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_roles(mut self, roles: ColumnRoleConfig) -> Self {
        self.roles = roles;
        self
    }

    pub fn with_null_policy(mut self, null_policy: NullPolicy) -> Self {
        self.null_policy = null_policy;
        self
    }

    pub fn driver(&self) -> &str {
        &self.driver
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn queries(&self) -> &[String] {
        &self.queries
    }

    pub fn roles(&self) -> &ColumnRoleConfig {
        &self.roles
    }

    pub fn null_policy(&self) -> NullPolicy {
        self.null_policy
    }

    /// Reports every column listed under more than one role
    pub fn report_overlaps(&self, observer: &dyn GatherObserver) {
        for overlap in self.roles.overlaps() {
            observer.role_overlap(&overlap);
        }
    }

    /// Runs one collection cycle.
    ///
    /// Every row of every query is emitted to `sink` with the measurement
    /// name `table_name`. Rows of one query share a single timestamp taken
    /// when the query starts returning rows.
    pub fn gather(
        &self,
        connector: &dyn Connector,
        sink: &mut dyn MetricSink,
        observer: &dyn GatherObserver,
    ) -> GatherResult<CycleSummary> {
        let started = Instant::now();
        observer.cycle_begin(&self.table_name, self.queries.len());

        match self.run_cycle(connector, sink, observer) {
            Ok(rows) => {
                let summary = CycleSummary {
                    queries: self.queries.len(),
                    rows,
                    elapsed: started.elapsed(),
                };
                observer.cycle_complete(&summary);
                Ok(summary)
            }
            Err(e) => {
                observer.cycle_failed(&e);
                Err(e)
            }
        }
    }

    fn run_cycle(
        &self,
        connector: &dyn Connector,
        sink: &mut dyn MetricSink,
        observer: &dyn GatherObserver,
    ) -> GatherResult<u64> {
        let mut conn = connector.open(&self.driver, &self.server_url)?;
        conn.ping()?;
        observer.connected(&self.driver);

        let mut rows = 0;
        for query in &self.queries {
            rows += self.run_query(conn.as_mut(), query, sink, observer)?;
        }

        conn.close()?;
        Ok(rows)
    }

    fn run_query(
        &self,
        conn: &mut dyn Connection,
        query: &str,
        sink: &mut dyn MetricSink,
        observer: &dyn GatherObserver,
    ) -> GatherResult<u64> {
        observer.query_begin(query);
        let started = Instant::now();

        let mut stmt = conn.prepare(query)?;
        let columns = stmt.columns().to_vec();
        let index = classify(&columns, &self.roles);
        observer.query_classified(query, &index);

        let mut cursor = stmt.query()?;
        let timestamp = Utc::now();

        let mut count = 0;
        while let Some(row) = cursor.next_row()? {
            if row.len() != columns.len() {
                return Err(GatherError::row_read(
                    query,
                    format!("row has {} cells, expected {}", row.len(), columns.len()),
                ));
            }

            let decoded = decode(&row, &columns, &index, self.null_policy)?;
            sink.emit(&self.table_name, decoded.fields, decoded.tags, timestamp);
            count += 1;
        }

        observer.query_complete(query, count, started.elapsed());
        Ok(count)
    }
}
