//! Row classification and type coercion
//!
//! Turns SQL result rows into metric records.
//!
//! # Pipeline (per query)
//!
//! 1. Classify the result columns into tag, int, float, bool and string
//!    groups (once per query)
//! 2. Decode each raw row into tags and typed fields
//! 3. Emit the record to the sink
//!
//! # Invariants
//!
//! - Every column lands in exactly one group
//! - Tag priority: tag > int > float > bool > string
//! - NULL tags are never emitted
//! - NULL fields are omitted unless nulls are zeroized
//! - A field that does not parse as its type aborts the cycle

mod classifier;
mod decoder;
mod errors;
mod gather;
mod observer;
mod row;

pub use classifier::{classify, ColumnRole, ColumnRoleConfig, ColumnRoleIndex, RoleOverlap};
pub use decoder::{coerce, decode, parse_bool, parse_float, parse_int, NullPolicy};
pub use errors::{CoercionError, GatherError, GatherResult};
pub use gather::SqlQuery;
pub use observer::{CycleSummary, GatherObserver, NoopObserver};
pub use row::{Cell, DecodedRow, FieldKind, FieldValue, Fields, RawRow, Tags};
