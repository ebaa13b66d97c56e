//! Core types for building and feeding the ghost table.
//!
//! - [`identifier`]: ghost/changelog/retired table names and trigger names
//! - [`schema`]: column metadata and the ordered column list
//! - [`value`]: binlog row values
//! - [`normalize`]: conversion of binlog values for the ghost table
//!
//! Everything here is synchronous and free of shared mutable state; the
//! column list and configuration are built once and read concurrently.

pub mod identifier;
pub mod normalize;
pub mod schema;
pub mod value;

// Re-export commonly used types for convenience
pub use identifier::{TableNames, MAX_TABLE_NAME_LENGTH};
pub use schema::{CharsetConversion, Column, ColumnList, ColumnType};
pub use value::{ColumnValues, SqlValue};
