//! Destinations for decoded records

mod json_lines;
mod memory;

pub use json_lines::JsonLinesSink;
pub use memory::MemorySink;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::collector::{Fields, Tags};

/// Receives one record per decoded row.
///
/// Emitting is fire-and-forget: a sink handles its own failures.
pub trait MetricSink {
    fn emit(&mut self, measurement: &str, fields: Fields, tags: Tags, timestamp: DateTime<Utc>);
}

/// An emitted record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub measurement: String,
    pub tags: Tags,
    pub fields: Fields,
    pub timestamp: DateTime<Utc>,
}

impl Metric {
    pub fn new(
        measurement: impl Into<String>,
        fields: Fields,
        tags: Tags,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            measurement: measurement.into(),
            tags,
            fields,
            timestamp,
        }
    }
}
