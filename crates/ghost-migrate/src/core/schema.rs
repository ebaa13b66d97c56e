//! Column metadata for the ghost table.
//!
//! A [`ColumnList`] is built once per migration, either from the table's
//! `INFORMATION_SCHEMA.COLUMNS` rows or from a plain comma separated list,
//! and then shared read-only by the row copier and the binlog applier.

use std::collections::HashMap;
use std::fmt;

use encoding_rs::Encoding;
use tracing::debug;

use crate::error::{MigrateError, Result};

/// Column type distinctions that matter when applying binlog values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColumnType {
    #[default]
    Unknown,
    /// Fixed-width `BINARY(n)`.
    Binary,
}

impl ColumnType {
    /// Classify a `COLUMN_TYPE` string such as `binary(16)` or `varchar(255)`.
    pub fn from_column_type(column_type: &str) -> Self {
        let lower = column_type.trim().to_lowercase();
        let base = lower
            .split(|c: char| c == '(' || c.is_whitespace())
            .next()
            .unwrap_or_default();

        match base {
            "binary" => ColumnType::Binary,
            _ => ColumnType::Unknown,
        }
    }
}

/// Resolved decoder for a column whose bytes arrive in a charset other than
/// the one statements are bound in.
///
/// Both encodings are resolved when the column is built, so applying the
/// conversion needs no lookup and no shared state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharsetConversion {
    pub(crate) from: &'static Encoding,
    pub(crate) to: &'static Encoding,
    pub(crate) from_repertoire: Repertoire,
    pub(crate) to_repertoire: Repertoire,
}

impl CharsetConversion {
    /// Resolve a pair of MySQL charset names.
    pub fn new(from_charset: &str, to_charset: &str) -> Result<Self> {
        Ok(Self {
            from: encoding_for_charset(from_charset)?,
            to: encoding_for_charset(to_charset)?,
            from_repertoire: Repertoire::for_charset(from_charset),
            to_repertoire: Repertoire::for_charset(to_charset),
        })
    }

    pub fn from_encoding(&self) -> &'static Encoding {
        self.from
    }

    pub fn to_encoding(&self) -> &'static Encoding {
        self.to
    }
}

/// Characters a MySQL charset can store, where that is narrower than what
/// its decoder accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Repertoire {
    Full,
    /// `ascii`: decoded with cp1252, but only 0x00-0x7F are valid.
    Ascii,
    /// `utf8` / `utf8mb3`: at most three bytes per character.
    Bmp,
}

impl Repertoire {
    fn for_charset(charset: &str) -> Self {
        match charset.trim().to_lowercase().as_str() {
            "ascii" => Repertoire::Ascii,
            "utf8" | "utf8mb3" => Repertoire::Bmp,
            _ => Repertoire::Full,
        }
    }

    /// Whether every character of `text` fits.
    pub(crate) fn admits(self, text: &str) -> bool {
        match self {
            Repertoire::Full => true,
            Repertoire::Ascii => text.is_ascii(),
            Repertoire::Bmp => text.chars().all(|c| u32::from(c) <= 0xFFFF),
        }
    }
}

/// Map a MySQL charset name to its decoder.
pub fn encoding_for_charset(charset: &str) -> Result<&'static Encoding> {
    let name = charset.trim().to_lowercase();
    let encoding = match name.as_str() {
        "utf8" | "utf8mb3" | "utf8mb4" => encoding_rs::UTF_8,
        // MySQL's latin1 is cp1252, and ascii is a subset of it.
        "latin1" | "ascii" => encoding_rs::WINDOWS_1252,
        "latin2" => encoding_rs::ISO_8859_2,
        "latin5" => encoding_rs::WINDOWS_1254,
        "latin7" => encoding_rs::ISO_8859_13,
        "cp1250" => encoding_rs::WINDOWS_1250,
        "cp1251" => encoding_rs::WINDOWS_1251,
        "cp1256" => encoding_rs::WINDOWS_1256,
        "cp1257" => encoding_rs::WINDOWS_1257,
        "cp866" => encoding_rs::IBM866,
        "koi8r" => encoding_rs::KOI8_R,
        "koi8u" => encoding_rs::KOI8_U,
        "greek" => encoding_rs::ISO_8859_7,
        "hebrew" => encoding_rs::ISO_8859_8,
        "tis620" => encoding_rs::WINDOWS_874,
        "macroman" => encoding_rs::MACINTOSH,
        "sjis" | "cp932" => encoding_rs::SHIFT_JIS,
        "ujis" | "eucjpms" => encoding_rs::EUC_JP,
        "euckr" => encoding_rs::EUC_KR,
        "gbk" | "gb2312" => encoding_rs::GBK,
        "gb18030" => encoding_rs::GB18030,
        "big5" => encoding_rs::BIG5,
        _ => Encoding::for_label(name.as_bytes())
            .ok_or_else(|| MigrateError::UnsupportedCharset(charset.to_string()))?,
    };
    Ok(encoding)
}

/// Column metadata.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Column {
    /// Column name.
    pub name: String,

    /// Type classification.
    pub column_type: ColumnType,

    /// Declared octet length of a `BINARY(n)` column.
    pub binary_octet_length: Option<usize>,

    /// Declared character set, if any.
    pub charset: Option<String>,

    pub(crate) charset_conversion: Option<CharsetConversion>,
}

impl Column {
    /// Column with only a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// `BINARY(octet_length)` column.
    pub fn binary(name: impl Into<String>, octet_length: usize) -> Self {
        Self {
            name: name.into(),
            column_type: ColumnType::Binary,
            binary_octet_length: Some(octet_length),
            ..Self::default()
        }
    }

    /// Build from the `COLUMN_NAME`, `COLUMN_TYPE`, `CHARACTER_SET_NAME` and
    /// `CHARACTER_OCTET_LENGTH` fields of an `INFORMATION_SCHEMA.COLUMNS` row.
    pub fn from_information_schema(
        name: &str,
        column_type: &str,
        character_set: Option<&str>,
        octet_length: Option<usize>,
    ) -> Self {
        let kind = ColumnType::from_column_type(column_type);
        Self {
            name: name.to_string(),
            column_type: kind,
            binary_octet_length: match kind {
                ColumnType::Binary => octet_length,
                _ => None,
            },
            charset: character_set.map(str::to_string),
            charset_conversion: None,
        }
    }

    /// Attach a charset conversion, resolving both charsets now.
    pub fn with_charset_conversion(mut self, from_charset: &str, to_charset: &str) -> Result<Self> {
        self.charset_conversion = Some(CharsetConversion::new(from_charset, to_charset)?);
        Ok(self)
    }

    pub fn charset_conversion(&self) -> Option<&CharsetConversion> {
        self.charset_conversion.as_ref()
    }
}

/// Ordered set of columns with name lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnList {
    columns: Vec<Column>,
    ordinals: HashMap<String, usize>,
}

impl ColumnList {
    /// Build from column descriptors in declared order.
    ///
    /// If a name repeats, lookups resolve to its first position.
    pub fn new(columns: Vec<Column>) -> Self {
        let mut ordinals = HashMap::with_capacity(columns.len());
        for (i, column) in columns.iter().enumerate() {
            ordinals.entry(column.name.clone()).or_insert(i);
        }
        Self { columns, ordinals }
    }

    /// Build from a comma separated list of names.
    ///
    /// Never fails: empty fragments become empty-named columns.
    pub fn parse(names: &str) -> Self {
        Self::new(names.split(',').map(Column::new).collect())
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Column names in declared order.
    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Look up a column by name. Absence is a normal outcome.
    pub fn get_column(&self, name: &str) -> Option<&Column> {
        self.ordinals.get(name).map(|&i| &self.columns[i])
    }

    /// Zero-based position of a column.
    pub fn ordinal(&self, name: &str) -> Option<usize> {
        self.ordinals.get(name).copied()
    }

    pub fn column_at(&self, ordinal: usize) -> Option<&Column> {
        self.columns.get(ordinal)
    }

    /// Configure a charset conversion on the named columns.
    ///
    /// Only meant for the build phase, before the list is shared.
    pub fn set_charset_conversion(
        &mut self,
        names: &[&str],
        from_charset: &str,
        to_charset: &str,
    ) -> Result<()> {
        let conversion = CharsetConversion::new(from_charset, to_charset)?;
        for name in names {
            let ordinal = self.ordinal(name).ok_or_else(|| {
                MigrateError::Config(format!("no such column for charset conversion: {}", name))
            })?;
            self.columns[ordinal].charset_conversion = Some(conversion);
            debug!(
                "Column {} converts {} to {}",
                name,
                conversion.from.name(),
                conversion.to.name()
            );
        }
        Ok(())
    }

    /// Whether every column name here also appears in `other`.
    pub fn is_subset_of(&self, other: &ColumnList) -> bool {
        self.columns
            .iter()
            .all(|c| other.ordinals.contains_key(&c.name))
    }
}

impl fmt::Display for ColumnList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.names().join(","))
    }
}
