//! Sink writing one JSON object per record per line

use std::io::Write;

use chrono::{DateTime, Utc};

use crate::collector::{Fields, Tags};
use crate::observability::{Event, Logger};

use super::{Metric, MetricSink};

/// Writes records as JSON lines.
///
/// A failed write is logged and counted; it never reaches the collector.
pub struct JsonLinesSink<W: Write> {
    writer: W,
    written: u64,
    failed: u64,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            written: 0,
            failed: 0,
        }
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn failed(&self) -> u64 {
        self.failed
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_metric(&mut self, metric: &Metric) -> std::io::Result<()> {
        serde_json::to_writer(&mut self.writer, metric)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()
    }
}

impl<W: Write> MetricSink for JsonLinesSink<W> {
    fn emit(&mut self, measurement: &str, fields: Fields, tags: Tags, timestamp: DateTime<Utc>) {
        let metric = Metric::new(measurement, fields, tags, timestamp);
        match self.write_metric(&metric) {
            Ok(()) => self.written += 1,
            Err(e) => {
                self.failed += 1;
                Logger::error(
                    Event::SinkWriteFailed.as_str(),
                    &[("measurement", measurement), ("reason", e.to_string().as_str())],
                );
            }
        }
    }
}
