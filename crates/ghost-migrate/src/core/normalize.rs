//! Normalization of binlog values before they are applied to the ghost table.
//!
//! Two things can go wrong between the binlog and the ghost table:
//!
//! - MySQL strips trailing `0x00` bytes from `BINARY(n)` values in row
//!   events, so a value has to be padded back to its declared width or the
//!   ghost row would not match the original.
//! - The driver may hand over column bytes in the column's own charset
//!   rather than the connection charset; those bytes are decoded here.
//!
//! Everything else passes through as an owned copy.

use std::borrow::Cow;

use tracing::warn;

use super::schema::{Column, ColumnList, ColumnType};
use super::value::{ColumnValues, SqlValue};
use crate::error::{MigrateError, Result};

impl Column {
    /// Convert one binlog value into the value bound for this column.
    ///
    /// A `BINARY(n)` value longer than `n` is passed through unchanged.
    pub fn convert_arg(&self, raw: &SqlValue<'_>) -> Result<SqlValue<'static>> {
        match raw {
            SqlValue::Bytes(bytes) => {
                if self.column_type == ColumnType::Binary {
                    if let Some(octet_length) = self.binary_octet_length {
                        return Ok(SqlValue::Bytes(Cow::Owned(self.pad_binary(
                            bytes,
                            octet_length,
                        ))));
                    }
                }
                if self.charset_conversion.is_some() {
                    return self.decode(bytes).map(|s| SqlValue::Text(Cow::Owned(s)));
                }
                Ok(SqlValue::Bytes(Cow::Owned(bytes.to_vec())))
            }
            SqlValue::Null
            | SqlValue::Int(_)
            | SqlValue::UInt(_)
            | SqlValue::Float(_)
            | SqlValue::Text(_)
            | SqlValue::Temporal(_) => Ok(raw.to_owned_value()),
        }
    }

    fn pad_binary(&self, bytes: &[u8], octet_length: usize) -> Vec<u8> {
        if bytes.len() > octet_length {
            warn!(
                "Column {}: binary value of {} bytes exceeds declared length {}, passing through",
                self.name,
                bytes.len(),
                octet_length
            );
            return bytes.to_vec();
        }
        let mut padded = Vec::with_capacity(octet_length);
        padded.extend_from_slice(bytes);
        padded.resize(octet_length, 0);
        padded
    }

    fn decode(&self, bytes: &[u8]) -> Result<String> {
        let Some(conversion) = self.charset_conversion else {
            return Err(MigrateError::conversion(&self.name, "no charset conversion"));
        };

        let malformed = || {
            MigrateError::conversion(
                &self.name,
                format!("malformed {} byte sequence", conversion.from.name()),
            )
        };
        let text = conversion
            .from
            .decode_without_bom_handling_and_without_replacement(bytes)
            .ok_or_else(malformed)?;
        if !conversion.from_repertoire.admits(&text) {
            return Err(malformed());
        }

        let representable = conversion.to_repertoire.admits(&text)
            && (conversion.to == encoding_rs::UTF_8 || !conversion.to.encode(&text).2);
        if !representable {
            return Err(MigrateError::conversion(
                &self.name,
                format!("value is not representable in {}", conversion.to.name()),
            ));
        }

        Ok(text.into_owned())
    }
}

/// Normalize the value at `ordinal` of a row event.
pub fn normalize(
    columns: &ColumnList,
    ordinal: usize,
    raw: &SqlValue<'_>,
) -> Result<SqlValue<'static>> {
    let column = columns.column_at(ordinal).ok_or_else(|| {
        MigrateError::RowShape(format!(
            "ordinal {} is out of range for {} columns",
            ordinal,
            columns.len()
        ))
    })?;
    column.convert_arg(raw)
}

/// Normalize a whole row event, field by field in ordinal order.
pub fn normalize_row(columns: &ColumnList, row: &[SqlValue<'_>]) -> Result<ColumnValues> {
    if row.len() != columns.len() {
        return Err(MigrateError::RowShape(format!(
            "row has {} values but the table has {} columns",
            row.len(),
            columns.len()
        )));
    }

    columns
        .columns()
        .iter()
        .zip(row)
        .map(|(column, raw)| column.convert_arg(raw))
        .collect::<Result<Vec<_>>>()
        .map(ColumnValues::new)
}
