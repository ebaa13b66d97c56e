//! Row values as delivered by the binlog reader.

use std::borrow::Cow;
use std::fmt;

use chrono::NaiveDateTime;

/// One field of a binlog row event.
///
/// Uses `Cow` for string and byte data so the binlog reader can hand over
/// slices of its event buffer without copying. Normalization always returns
/// an owned `SqlValue<'static>`.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue<'a> {
    /// SQL NULL.
    Null,

    /// Signed integer of any width.
    Int(i64),

    /// Unsigned integer that does not fit in `i64`.
    UInt(u64),

    /// Floating point (float/double).
    Float(f64),

    /// Text already decoded by the driver.
    Text(Cow<'a, str>),

    /// Raw bytes (binary columns, or text in an undecoded charset).
    Bytes(Cow<'a, [u8]>),

    /// Date/time value.
    Temporal(NaiveDateTime),
}

impl<'a> SqlValue<'a> {
    /// Convert to a fully owned value with `'static` lifetime.
    #[must_use]
    pub fn into_owned(self) -> SqlValue<'static> {
        match self {
            SqlValue::Null => SqlValue::Null,
            SqlValue::Int(v) => SqlValue::Int(v),
            SqlValue::UInt(v) => SqlValue::UInt(v),
            SqlValue::Float(v) => SqlValue::Float(v),
            SqlValue::Text(v) => SqlValue::Text(Cow::Owned(v.into_owned())),
            SqlValue::Bytes(v) => SqlValue::Bytes(Cow::Owned(v.into_owned())),
            SqlValue::Temporal(v) => SqlValue::Temporal(v),
        }
    }

    /// Owned copy without consuming `self`.
    #[must_use]
    pub fn to_owned_value(&self) -> SqlValue<'static> {
        self.clone().into_owned()
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    /// Byte content, if this is a byte value.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            SqlValue::Bytes(b) => Some(&**b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SqlValue::Text(s) => Some(&**s),
            _ => None,
        }
    }
}

/// Textual form: bytes render as lowercase hex, NULL as `NULL`.
impl fmt::Display for SqlValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Null => f.write_str("NULL"),
            SqlValue::Int(v) => write!(f, "{}", v),
            SqlValue::UInt(v) => write!(f, "{}", v),
            SqlValue::Float(v) => write!(f, "{}", v),
            SqlValue::Text(v) => f.write_str(v),
            SqlValue::Bytes(v) => f.write_str(&hex::encode(v)),
            SqlValue::Temporal(v) => write!(f, "{}", v.format("%Y-%m-%d %H:%M:%S%.f")),
        }
    }
}

impl From<i64> for SqlValue<'static> {
    fn from(v: i64) -> Self {
        SqlValue::Int(v)
    }
}

impl From<u64> for SqlValue<'static> {
    fn from(v: u64) -> Self {
        SqlValue::UInt(v)
    }
}

impl From<f64> for SqlValue<'static> {
    fn from(v: f64) -> Self {
        SqlValue::Float(v)
    }
}

impl From<String> for SqlValue<'static> {
    fn from(v: String) -> Self {
        SqlValue::Text(Cow::Owned(v))
    }
}

impl<'a> From<&'a str> for SqlValue<'a> {
    fn from(v: &'a str) -> Self {
        SqlValue::Text(Cow::Borrowed(v))
    }
}

impl From<Vec<u8>> for SqlValue<'static> {
    fn from(v: Vec<u8>) -> Self {
        SqlValue::Bytes(Cow::Owned(v))
    }
}

impl<'a> From<&'a [u8]> for SqlValue<'a> {
    fn from(v: &'a [u8]) -> Self {
        SqlValue::Bytes(Cow::Borrowed(v))
    }
}

impl From<NaiveDateTime> for SqlValue<'static> {
    fn from(v: NaiveDateTime) -> Self {
        SqlValue::Temporal(v)
    }
}

/// Owned values of one row, in column ordinal order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ColumnValues {
    values: Vec<SqlValue<'static>>,
}

impl ColumnValues {
    pub fn new(values: Vec<SqlValue<'static>>) -> Self {
        Self { values }
    }

    /// Copy a row of possibly borrowed values.
    pub fn from_row(row: &[SqlValue<'_>]) -> Self {
        Self {
            values: row.iter().map(SqlValue::to_owned_value).collect(),
        }
    }

    pub fn abstract_values(&self) -> &[SqlValue<'static>] {
        &self.values
    }

    pub fn into_values(self) -> Vec<SqlValue<'static>> {
        self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Stable textual form of one field; bytes render as lowercase hex.
    pub fn string_column(&self, index: usize) -> Option<String> {
        self.values.get(index).map(ToString::to_string)
    }
}

impl fmt::Display for ColumnValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.values.iter().map(ToString::to_string).collect();
        f.write_str(&rendered.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_binary_to_string() {
        let row = ColumnValues::from_row(&[SqlValue::from(&[0x1b_u8, 0x99][..])]);
        assert_eq!(row.string_column(0).as_deref(), Some("1b99"));
        assert_eq!(row.string_column(1), None);
    }

    #[test]
    fn test_string_column_scalars() {
        let ts = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(12, 30, 0)
            .unwrap();
        let row = ColumnValues::new(vec![
            SqlValue::Int(-7),
            SqlValue::UInt(u64::MAX),
            SqlValue::from("abc".to_string()),
            SqlValue::Null,
            SqlValue::Temporal(ts),
        ]);
        assert_eq!(row.string_column(0).as_deref(), Some("-7"));
        assert_eq!(row.string_column(1).as_deref(), Some("18446744073709551615"));
        assert_eq!(row.string_column(2).as_deref(), Some("abc"));
        assert_eq!(row.string_column(3).as_deref(), Some("NULL"));
        assert_eq!(row.string_column(4).as_deref(), Some("2024-05-01 12:30:00"));
        assert_eq!(row.to_string(), "-7,18446744073709551615,abc,NULL,2024-05-01 12:30:00");
    }

    #[test]
    fn test_into_owned() {
        let buf = vec![1_u8, 2, 3];
        let borrowed = SqlValue::from(buf.as_slice());
        let owned: SqlValue<'static> = borrowed.into_owned();
        drop(buf);
        assert_eq!(owned.as_bytes(), Some(&[1_u8, 2, 3][..]));
    }

    #[test]
    fn test_is_null() {
        assert!(SqlValue::Null.is_null());
        assert!(!SqlValue::Int(0).is_null());
    }
}
