//! Observability for the collector
//!
//! This module provides:
//! - Structured logging (JSON lines on stderr)
//! - Collection counters
//! - Typed lifecycle events
//! - [`LogObserver`], which wires all three into the collection cycle
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on collection
//! 3. No background threads
//! 4. Deterministic output
//!
//! # Usage
//!
//! ```ignore
//! use sqlquery::observability::{Logger, LogObserver};
//!
//! Logger::info("QUERY_COMPLETE", &[("rows", "42")]);
//!
//! let observer = LogObserver::default();
//! collector.gather(&connector, &mut sink, &observer)?;
//! println!("{}", observer.metrics().to_json());
//! ```

mod events;
mod logger;
mod metrics;
mod observer;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};
pub use observer::LogObserver;

/// Severity a lifecycle event is logged at
pub fn event_severity(event: Event) -> Severity {
    if event.is_failure() {
        Severity::Error
    } else {
        Severity::Info
    }
}

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event_severity(event), event.as_str(), fields);
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::logger::capture_log;

    fn rendered_severity(event: Event) -> String {
        let output = capture_log(
            event_severity(event),
            event.as_str(),
            &[("path", "/tmp/sqlquery.json")],
        );
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["event"], event.as_str());
        parsed["severity"].as_str().unwrap().to_string()
    }

    #[test]
    fn test_failure_events_log_as_error() {
        assert_eq!(rendered_severity(Event::GatherFailed), "ERROR");
        assert_eq!(rendered_severity(Event::SinkWriteFailed), "ERROR");
    }

    #[test]
    fn test_lifecycle_events_log_as_info() {
        assert_eq!(rendered_severity(Event::ConfigLoaded), "INFO");
        assert_eq!(rendered_severity(Event::GatherBegin), "INFO");
        assert_eq!(rendered_severity(Event::RunComplete), "INFO");
    }
}
