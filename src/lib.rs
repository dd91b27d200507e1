//! sqlquery - Turn SQL query results into metric records
//!
//! Runs configured queries against a database and emits one record per
//! result row: tag columns become string tags, configured columns are
//! coerced to int, float or bool fields, and everything else becomes a
//! string field.

pub mod cli;
pub mod collector;
pub mod config;
pub mod observability;
pub mod sink;
pub mod source;
