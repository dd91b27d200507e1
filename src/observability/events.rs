//! Observable events
//!
//! Events are explicit and typed; each renders as a stable upper-case name.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Configuration loaded and defaulted
    ConfigLoaded,
    /// A column name appears in more than one role list
    ColumnRoleOverlap,

    // Collection cycle
    /// Collection cycle begins
    GatherBegin,
    /// Database connection opened and pinged
    Connected,
    /// Collection cycle finished, all queries processed
    GatherComplete,
    /// Collection cycle aborted
    GatherFailed,
    /// A bounded `run` finished all its cycles
    RunComplete,

    // Queries
    /// Query about to be executed
    QueryBegin,
    /// Result columns split into role groups
    QueryClassified,
    /// All rows of a query emitted
    QueryComplete,

    // Sink
    /// A sink could not write a record
    SinkWriteFailed,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::ColumnRoleOverlap => "COLUMN_ROLE_OVERLAP",

            Event::GatherBegin => "GATHER_BEGIN",
            Event::Connected => "DB_CONNECTED",
            Event::GatherComplete => "GATHER_COMPLETE",
            Event::GatherFailed => "GATHER_FAILED",
            Event::RunComplete => "RUN_COMPLETE",

            Event::QueryBegin => "QUERY_BEGIN",
            Event::QueryClassified => "QUERY_CLASSIFIED",
            Event::QueryComplete => "QUERY_COMPLETE",

            Event::SinkWriteFailed => "SINK_WRITE_FAILED",
        }
    }

    /// Returns true if this event reports a failure
    pub fn is_failure(&self) -> bool {
        matches!(self, Event::GatherFailed | Event::SinkWriteFailed)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
