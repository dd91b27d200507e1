//! Row types flowing between a cursor, the decoder and a sink

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

/// Tag mapping of a decoded row
pub type Tags = BTreeMap<String, String>;

/// Field mapping of a decoded row
pub type Fields = BTreeMap<String, FieldValue>;

/// One raw cell as returned by a driver.
///
/// `None` is SQL NULL. Non-null cells carry the driver's textual or binary
/// rendering of the value, uninterpreted.
pub type Cell = Option<Vec<u8>>;

/// A raw result row, cells aligned with the query's column list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    cells: Vec<Cell>,
}

impl RawRow {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { cells }
    }

    /// Builds a row from text cells, `None` meaning NULL
    pub fn from_text<S: AsRef<str>>(cells: &[Option<S>]) -> Self {
        Self {
            cells: cells
                .iter()
                .map(|c| c.as_ref().map(|s| s.as_ref().as_bytes().to_vec()))
                .collect(),
        }
    }

    /// Raw bytes of the cell at `idx`; `None` for NULL or out of range
    pub fn cell(&self, idx: usize) -> Option<&[u8]> {
        self.cells.get(idx).and_then(|c| c.as_deref())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Typed field categories a column can be configured as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Int,
    Float,
    Bool,
    String,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Int => "int",
            FieldKind::Float => "float",
            FieldKind::Bool => "bool",
            FieldKind::String => "string",
        }
    }

    /// Value a NULL cell takes when nulls are zeroized
    pub fn zero_value(&self) -> FieldValue {
        match self {
            FieldKind::Int => FieldValue::Int(0),
            FieldKind::Float => FieldValue::Float(0.0),
            FieldKind::Bool => FieldValue::Bool(false),
            FieldKind::String => FieldValue::Str(String::new()),
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A typed field value
///
/// Serializes as the bare value. Non-finite floats have no JSON number
/// form and serialize as the strings `"inf"`, `"-inf"` and `"NaN"`.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Int(v) => serializer.serialize_i64(*v),
            FieldValue::Float(v) if v.is_nan() => serializer.serialize_str("NaN"),
            FieldValue::Float(v) if v.is_infinite() => {
                serializer.serialize_str(if *v > 0.0 { "inf" } else { "-inf" })
            }
            FieldValue::Float(v) => serializer.serialize_f64(*v),
            FieldValue::Bool(v) => serializer.serialize_bool(*v),
            FieldValue::Str(v) => serializer.serialize_str(v),
        }
    }
}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Int(_) => FieldKind::Int,
            FieldValue::Float(_) => FieldKind::Float,
            FieldValue::Bool(_) => FieldKind::Bool,
            FieldValue::Str(_) => FieldKind::String,
        }
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Int(v)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Bool(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Str(v.to_string())
    }
}

/// Tags and fields decoded from one raw row
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedRow {
    pub tags: Tags,
    pub fields: Fields,
}
