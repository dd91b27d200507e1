//! Observer writing collection events to the structured log

use std::sync::Arc;
use std::time::Duration;

use crate::collector::{ColumnRoleIndex, CycleSummary, GatherError, GatherObserver, RoleOverlap};

use super::events::Event;
use super::logger::Logger;
use super::metrics::MetricsRegistry;

/// Logs every collection event and keeps counters in a [`MetricsRegistry`]
#[derive(Debug, Clone, Default)]
pub struct LogObserver {
    metrics: Arc<MetricsRegistry>,
}

impl LogObserver {
    pub fn new(metrics: Arc<MetricsRegistry>) -> Self {
        Self { metrics }
    }

    pub fn metrics(&self) -> &MetricsRegistry {
        &self.metrics
    }
}

impl GatherObserver for LogObserver {
    fn role_overlap(&self, overlap: &RoleOverlap) {
        let shadowed: Vec<&str> = overlap.shadowed.iter().map(|r| r.as_str()).collect();
        Logger::warn(
            Event::ColumnRoleOverlap.as_str(),
            &[
                ("column", overlap.column.as_str()),
                ("winner", overlap.winner.as_str()),
                ("shadowed", shadowed.join(",").as_str()),
            ],
        );
    }

    fn cycle_begin(&self, table_name: &str, queries: usize) {
        self.metrics.increment_cycles_started();
        Logger::info(
            Event::GatherBegin.as_str(),
            &[("table", table_name), ("queries", queries.to_string().as_str())],
        );
    }

    fn connected(&self, driver: &str) {
        Logger::info(Event::Connected.as_str(), &[("driver", driver)]);
    }

    fn query_begin(&self, query: &str) {
        Logger::info(Event::QueryBegin.as_str(), &[("query", query)]);
    }

    fn query_classified(&self, query: &str, index: &ColumnRoleIndex) {
        Logger::info(
            Event::QueryClassified.as_str(),
            &[
                ("query", query),
                ("tags", index.tags.len().to_string().as_str()),
                ("int_fields", index.int_fields.len().to_string().as_str()),
                ("float_fields", index.float_fields.len().to_string().as_str()),
                ("bool_fields", index.bool_fields.len().to_string().as_str()),
                ("string_fields", index.string_fields.len().to_string().as_str()),
            ],
        );
    }

    fn query_complete(&self, query: &str, rows: u64, elapsed: Duration) {
        self.metrics.increment_queries_executed();
        self.metrics.add_rows_emitted(rows);
        Logger::info(
            Event::QueryComplete.as_str(),
            &[
                ("query", query),
                ("rows", rows.to_string().as_str()),
                ("duration_ms", elapsed.as_millis().to_string().as_str()),
            ],
        );
    }

    fn cycle_complete(&self, summary: &CycleSummary) {
        self.metrics.increment_cycles_completed();
        Logger::info(
            Event::GatherComplete.as_str(),
            &[
                ("queries", summary.queries.to_string().as_str()),
                ("rows", summary.rows.to_string().as_str()),
                ("duration_ms", summary.elapsed.as_millis().to_string().as_str()),
            ],
        );
    }

    fn cycle_failed(&self, error: &GatherError) {
        self.metrics.increment_cycles_failed();
        if error.is_coercion() {
            self.metrics.increment_coercion_failures();
        }
        Logger::error(
            Event::GatherFailed.as_str(),
            &[("code", error.code()), ("reason", error.to_string().as_str())],
        );
    }
}
