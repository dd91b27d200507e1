//! Sink that keeps every record in memory

use chrono::{DateTime, Utc};

use crate::collector::{Fields, Tags};

use super::{Metric, MetricSink};

#[derive(Debug, Default)]
pub struct MemorySink {
    metrics: Vec<Metric>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn metrics(&self) -> &[Metric] {
        &self.metrics
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    /// Removes and returns everything collected so far
    pub fn drain(&mut self) -> Vec<Metric> {
        std::mem::take(&mut self.metrics)
    }
}

impl MetricSink for MemorySink {
    fn emit(&mut self, measurement: &str, fields: Fields, tags: Tags, timestamp: DateTime<Utc>) {
        self.metrics
            .push(Metric::new(measurement, fields, tags, timestamp));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::FieldValue;

    #[test]
    fn test_collects_and_drains() {
        let mut sink = MemorySink::new();
        let mut fields = Fields::new();
        fields.insert("used".into(), FieldValue::Int(1));

        sink.emit("disks", fields, Tags::new(), Utc::now());
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.metrics()[0].measurement, "disks");

        let drained = sink.drain();
        assert_eq!(drained.len(), 1);
        assert!(sink.is_empty());
    }
}
