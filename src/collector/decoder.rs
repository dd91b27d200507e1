//! Row decoding
//!
//! Turns one raw row into a tag map and a typed field map using the
//! column groups produced by the classifier.
//!
//! # NULL handling
//!
//! - A NULL tag cell is always omitted.
//! - A NULL field cell is omitted under [`NullPolicy::Omit`] and replaced by
//!   the type's zero value under [`NullPolicy::Zeroize`].

use super::classifier::ColumnRoleIndex;
use super::errors::CoercionError;
use super::row::{DecodedRow, FieldKind, FieldValue, RawRow};

/// What to do with NULL field cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NullPolicy {
    /// Leave the field out of the record
    #[default]
    Omit,
    /// Emit the type's zero value (0, 0.0, false, "")
    Zeroize,
}

impl NullPolicy {
    pub fn from_zeroize(zeroize_null: bool) -> Self {
        if zeroize_null {
            NullPolicy::Zeroize
        } else {
            NullPolicy::Omit
        }
    }

    pub fn zeroizes(&self) -> bool {
        *self == NullPolicy::Zeroize
    }
}

/// Parses a base-10 signed 64-bit integer. No surrounding whitespace.
pub fn parse_int(raw: &[u8]) -> Option<i64> {
    std::str::from_utf8(raw).ok()?.parse().ok()
}

/// Parses a 64-bit float, including exponents, `inf` and `nan`.
///
/// A finite literal too large for `f64` is rejected rather than rounded to
/// infinity.
pub fn parse_float(raw: &[u8]) -> Option<f64> {
    let text = std::str::from_utf8(raw).ok()?;
    let value: f64 = text.parse().ok()?;
    if value.is_infinite() && !is_infinity_literal(text) {
        return None;
    }
    Some(value)
}

fn is_infinity_literal(text: &str) -> bool {
    let unsigned = text.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(text);
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}

/// Parses a boolean literal.
///
/// Accepts `1 t T TRUE true True` and `0 f F FALSE false False`.
pub fn parse_bool(raw: &[u8]) -> Option<bool> {
    match raw {
        b"1" | b"t" | b"T" | b"TRUE" | b"true" | b"True" => Some(true),
        b"0" | b"f" | b"F" | b"FALSE" | b"false" | b"False" => Some(false),
        _ => None,
    }
}

fn decode_text(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).into_owned()
}

/// Converts a non-null cell into a value of `kind`
pub fn coerce(column: &str, kind: FieldKind, raw: &[u8]) -> Result<FieldValue, CoercionError> {
    let value = match kind {
        FieldKind::Int => parse_int(raw).map(FieldValue::Int),
        FieldKind::Float => parse_float(raw).map(FieldValue::Float),
        FieldKind::Bool => parse_bool(raw).map(FieldValue::Bool),
        FieldKind::String => Some(FieldValue::Str(decode_text(raw))),
    };
    value.ok_or_else(|| CoercionError::new(column, kind, raw))
}

/// Decodes one row.
///
/// `index` must have been built by classifying `columns`; indices past the
/// end of `columns` are skipped. Cells past the end of `row` read as NULL.
/// Fails on the first field cell that does not parse as its configured type.
pub fn decode<S: AsRef<str>>(
    row: &RawRow,
    columns: &[S],
    index: &ColumnRoleIndex,
    policy: NullPolicy,
) -> Result<DecodedRow, CoercionError> {
    let mut decoded = DecodedRow::default();

    for &idx in &index.tags {
        let (Some(column), Some(raw)) = (columns.get(idx), row.cell(idx)) else {
            continue;
        };
        decoded
            .tags
            .insert(column.as_ref().to_string(), decode_text(raw));
    }

    for (kind, group) in index.field_groups() {
        for &idx in group {
            let Some(column) = columns.get(idx) else {
                continue;
            };
            let column = column.as_ref();
            let value = match row.cell(idx) {
                Some(raw) => coerce(column, kind, raw)?,
                None if policy.zeroizes() => kind.zero_value(),
                None => continue,
            };
            decoded.fields.insert(column.to_string(), value);
        }
    }

    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::classifier::{classify, ColumnRoleConfig};

    const COLUMNS: [&str; 5] = ["loc", "used", "ratio", "active", "note"];

    fn scenario_index() -> ColumnRoleIndex {
        let roles = ColumnRoleConfig::default()
            .with_tags(["loc"])
            .with_ints(["used"])
            .with_floats(["ratio"])
            .with_bools(["active"]);
        classify(&COLUMNS, &roles)
    }

    #[test]
    fn test_scenario_row_omits_null_note() {
        let row = RawRow::from_text(&[Some("rack1"), Some("42"), Some("3.5"), Some("true"), None]);
        let decoded = decode(&row, &COLUMNS, &scenario_index(), NullPolicy::Omit).unwrap();

        assert_eq!(decoded.tags.len(), 1);
        assert_eq!(decoded.tags["loc"], "rack1");

        assert_eq!(decoded.fields.len(), 3);
        assert_eq!(decoded.fields["used"], FieldValue::Int(42));
        assert_eq!(decoded.fields["ratio"], FieldValue::Float(3.5));
        assert_eq!(decoded.fields["active"], FieldValue::Bool(true));
        assert!(!decoded.fields.contains_key("note"));
    }

    #[test]
    fn test_scenario_row_zeroizes_null_note() {
        let row = RawRow::from_text(&[Some("rack1"), Some("42"), Some("3.5"), Some("true"), None]);
        let decoded = decode(&row, &COLUMNS, &scenario_index(), NullPolicy::Zeroize).unwrap();

        assert_eq!(decoded.fields.len(), 4);
        assert_eq!(decoded.fields["note"], FieldValue::Str(String::new()));
    }

    #[test]
    fn test_all_null_row() {
        let row = RawRow::new(vec![None; 5]);

        let omitted = decode(&row, &COLUMNS, &scenario_index(), NullPolicy::Omit).unwrap();
        assert!(omitted.tags.is_empty());
        assert!(omitted.fields.is_empty());

        let zeroized = decode(&row, &COLUMNS, &scenario_index(), NullPolicy::Zeroize).unwrap();
        assert!(zeroized.tags.is_empty());
        assert_eq!(zeroized.fields["used"], FieldValue::Int(0));
        assert_eq!(zeroized.fields["ratio"], FieldValue::Float(0.0));
        assert_eq!(zeroized.fields["active"], FieldValue::Bool(false));
        assert_eq!(zeroized.fields["note"], FieldValue::Str(String::new()));
    }

    #[test]
    fn test_int_coercion_failure() {
        let row = RawRow::from_text(&[Some("rack1"), Some("abc"), Some("3.5"), Some("true"), None]);
        let err = decode(&row, &COLUMNS, &scenario_index(), NullPolicy::Omit).unwrap_err();

        assert_eq!(err.column, "used");
        assert_eq!(err.kind, FieldKind::Int);
        assert_eq!(err.value, "abc");
    }

    #[test]
    fn test_float_coercion_failure() {
        let row = RawRow::from_text(&[Some("rack1"), Some("1"), Some("high"), Some("true"), None]);
        let err = decode(&row, &COLUMNS, &scenario_index(), NullPolicy::Omit).unwrap_err();

        assert_eq!(err.column, "ratio");
        assert_eq!(err.kind, FieldKind::Float);
    }

    #[test]
    fn test_bool_coercion_failure() {
        let row = RawRow::from_text(&[Some("rack1"), Some("1"), Some("1.0"), Some("yes"), None]);
        let err = decode(&row, &COLUMNS, &scenario_index(), NullPolicy::Omit).unwrap_err();

        assert_eq!(err.column, "active");
        assert_eq!(err.value, "yes");
    }

    #[test]
    fn test_decode_is_idempotent() {
        let row = RawRow::from_text(&[Some("rack1"), Some("-7"), None, Some("0"), Some("x")]);
        let index = scenario_index();

        let first = decode(&row, &COLUMNS, &index, NullPolicy::Zeroize).unwrap();
        let second = decode(&row, &COLUMNS, &index, NullPolicy::Zeroize).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_parse_int() {
        assert_eq!(parse_int(b"42"), Some(42));
        assert_eq!(parse_int(b"-42"), Some(-42));
        assert_eq!(parse_int(b"+42"), Some(42));
        assert_eq!(parse_int(b"9223372036854775807"), Some(i64::MAX));
        assert_eq!(parse_int(b"9223372036854775808"), None);
        assert_eq!(parse_int(b"4.2"), None);
        assert_eq!(parse_int(b" 42"), None);
        assert_eq!(parse_int(b""), None);
        assert_eq!(parse_int(&[0xff, 0xfe]), None);
    }

    #[test]
    fn test_parse_float() {
        assert_eq!(parse_float(b"3.5"), Some(3.5));
        assert_eq!(parse_float(b"-1e3"), Some(-1000.0));
        assert_eq!(parse_float(b"7"), Some(7.0));
        assert_eq!(parse_float(b"inf"), Some(f64::INFINITY));
        assert!(parse_float(b"NaN").unwrap().is_nan());
        assert_eq!(parse_float(b"1,5"), None);
        assert_eq!(parse_float(b""), None);
    }

    #[test]
    fn test_parse_float_rejects_out_of_range() {
        assert_eq!(parse_float(b"1e400"), None);
        assert_eq!(parse_float(b"-1e400"), None);
        assert_eq!(parse_float(b"1.7976931348623157e308"), Some(f64::MAX));

        assert_eq!(parse_float(b"+inf"), Some(f64::INFINITY));
        assert_eq!(parse_float(b"-Infinity"), Some(f64::NEG_INFINITY));
        assert_eq!(parse_float(b"INF"), Some(f64::INFINITY));
    }

    #[test]
    fn test_out_of_range_float_is_coercion_error() {
        let index = classify(&["ratio"], &ColumnRoleConfig::default().with_floats(["ratio"]));

        for literal in ["1e400", "-1e400"] {
            let row = RawRow::from_text(&[Some(literal)]);
            let err = decode(&row, &["ratio"], &index, NullPolicy::Omit).unwrap_err();
            assert_eq!(err.column, "ratio");
            assert_eq!(err.kind, FieldKind::Float);
            assert_eq!(err.value, literal);
        }
    }

    #[test]
    fn test_index_longer_than_columns_is_skipped() {
        let index = scenario_index();
        let row = RawRow::from_text(&[Some("rack1"), Some("42"), Some("3.5"), Some("true"), Some("x")]);

        let decoded = decode(&row, &["loc", "used"], &index, NullPolicy::Zeroize).unwrap();
        assert_eq!(decoded.tags["loc"], "rack1");
        assert_eq!(decoded.fields.len(), 1);
        assert_eq!(decoded.fields["used"], FieldValue::Int(42));
    }

    #[test]
    fn test_parse_bool() {
        for raw in ["1", "t", "T", "TRUE", "true", "True"] {
            assert_eq!(parse_bool(raw.as_bytes()), Some(true), "{}", raw);
        }
        for raw in ["0", "f", "F", "FALSE", "false", "False"] {
            assert_eq!(parse_bool(raw.as_bytes()), Some(false), "{}", raw);
        }
        for raw in ["yes", "no", "tRUE", "2", ""] {
            assert_eq!(parse_bool(raw.as_bytes()), None, "{}", raw);
        }
    }

    #[test]
    fn test_invalid_utf8_string_is_lossy() {
        let value = coerce("note", FieldKind::String, &[b'o', b'k', 0xff]).unwrap();
        assert_eq!(value, FieldValue::Str("ok\u{fffd}".to_string()));
    }

    #[test]
    fn test_short_row_reads_as_null() {
        let row = RawRow::from_text(&[Some("rack1"), Some("1")]);
        let decoded = decode(&row, &COLUMNS, &scenario_index(), NullPolicy::Omit).unwrap();
        assert_eq!(decoded.fields.len(), 1);
        assert_eq!(decoded.fields["used"], FieldValue::Int(1));
    }

    #[test]
    fn test_null_policy_from_flag() {
        assert_eq!(NullPolicy::from_zeroize(true), NullPolicy::Zeroize);
        assert_eq!(NullPolicy::from_zeroize(false), NullPolicy::Omit);
        assert_eq!(NullPolicy::default(), NullPolicy::Omit);
    }
}
