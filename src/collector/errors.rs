//! Collector error types
//!
//! Error codes:
//! - SQLQUERY_CONNECTION_FAILED
//! - SQLQUERY_QUERY_FAILED
//! - SQLQUERY_ROW_READ_FAILED
//! - SQLQUERY_TYPE_COERCION

use thiserror::Error;

use super::row::FieldKind;

/// Result type for collection operations
pub type GatherResult<T> = Result<T, GatherError>;

/// A field cell whose text could not be parsed into its configured type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot parse value {value:?} of column '{column}' as {kind}")]
pub struct CoercionError {
    /// Column the cell belongs to
    pub column: String,
    /// Type the column is configured as
    pub kind: FieldKind,
    /// Offending raw value, lossily rendered as text
    pub value: String,
}

impl CoercionError {
    pub fn new(column: impl Into<String>, kind: FieldKind, raw: &[u8]) -> Self {
        Self {
            column: column.into(),
            kind,
            value: String::from_utf8_lossy(raw).into_owned(),
        }
    }
}

/// Errors that abort a collection cycle
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatherError {
    #[error("cannot connect using driver '{driver}': {message}")]
    Connection { driver: String, message: String },

    #[error("query '{query}' failed: {message}")]
    QueryExecution { query: String, message: String },

    #[error("reading a row of query '{query}' failed: {message}")]
    RowRead { query: String, message: String },

    #[error(transparent)]
    TypeCoercion(#[from] CoercionError),
}

impl GatherError {
    pub fn connection(driver: impl Into<String>, message: impl ToString) -> Self {
        GatherError::Connection {
            driver: driver.into(),
            message: message.to_string(),
        }
    }

    pub fn query_execution(query: impl Into<String>, message: impl ToString) -> Self {
        GatherError::QueryExecution {
            query: query.into(),
            message: message.to_string(),
        }
    }

    pub fn row_read(query: impl Into<String>, message: impl ToString) -> Self {
        GatherError::RowRead {
            query: query.into(),
            message: message.to_string(),
        }
    }

    /// Stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            GatherError::Connection { .. } => "SQLQUERY_CONNECTION_FAILED",
            GatherError::QueryExecution { .. } => "SQLQUERY_QUERY_FAILED",
            GatherError::RowRead { .. } => "SQLQUERY_ROW_READ_FAILED",
            GatherError::TypeCoercion(_) => "SQLQUERY_TYPE_COERCION",
        }
    }

    /// Returns true when the failure is a misconfigured column role
    pub fn is_coercion(&self) -> bool {
        matches!(self, GatherError::TypeCoercion(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            GatherError::connection("sqlite", "no such file").code(),
            "SQLQUERY_CONNECTION_FAILED"
        );
        assert_eq!(
            GatherError::query_execution("SELECT 1", "syntax").code(),
            "SQLQUERY_QUERY_FAILED"
        );
        assert_eq!(
            GatherError::row_read("SELECT 1", "io").code(),
            "SQLQUERY_ROW_READ_FAILED"
        );
    }

    #[test]
    fn test_coercion_error_names_column_and_value() {
        let err: GatherError = CoercionError::new("used", FieldKind::Int, b"abc").into();
        assert!(err.is_coercion());
        assert_eq!(err.code(), "SQLQUERY_TYPE_COERCION");

        let display = err.to_string();
        assert!(display.contains("used"));
        assert!(display.contains("\"abc\""));
        assert!(display.contains("int"));
    }

    #[test]
    fn test_connection_error_display() {
        let err = GatherError::connection("oci8", "unsupported driver");
        assert_eq!(
            err.to_string(),
            "cannot connect using driver 'oci8': unsupported driver"
        );
    }
}
