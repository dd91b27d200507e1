//! Observation hooks for the collection cycle

use std::time::Duration;

use super::classifier::{ColumnRoleIndex, RoleOverlap};
use super::errors::GatherError;

/// Outcome of a successful collection cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleSummary {
    /// Queries executed
    pub queries: usize,
    /// Records emitted across all queries
    pub rows: u64,
    pub elapsed: Duration,
}

/// Receives structured events from [`SqlQuery`](super::SqlQuery).
///
/// Every hook defaults to doing nothing.
pub trait GatherObserver {
    fn role_overlap(&self, _overlap: &RoleOverlap) {}

    fn cycle_begin(&self, _table_name: &str, _queries: usize) {}

    fn connected(&self, _driver: &str) {}

    fn query_begin(&self, _query: &str) {}

    fn query_classified(&self, _query: &str, _index: &ColumnRoleIndex) {}

    fn query_complete(&self, _query: &str, _rows: u64, _elapsed: Duration) {}

    fn cycle_complete(&self, _summary: &CycleSummary) {}

    fn cycle_failed(&self, _error: &GatherError) {}
}

/// Observer that ignores every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl GatherObserver for NoopObserver {}
