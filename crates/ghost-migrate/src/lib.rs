//! # ghost-migrate
//!
//! Core of an online MySQL schema migration tool.
//!
//! A shadow ("ghost") copy of the original table is built with the new
//! structure and kept in sync with writes read from the binary log until
//! cut-over. This crate holds the parts of that process where a subtle
//! mistake corrupts data or gets DDL rejected halfway through:
//!
//! - **Identifier derivation** for the ghost, changelog and retired tables
//!   and for ghost triggers, bounded by MySQL's 64 character limit
//! - **Value normalization** of binlog row values before they are bound
//!   into statements against the ghost table (charset decoding, `BINARY(n)`
//!   zero padding)
//! - **Configuration** loaded once from flags and an INI file, then frozen
//!
//! ## Example
//!
//! ```rust,no_run
//! use ghost_migrate::{ColumnList, MigrationConfig, SqlValue};
//!
//! fn main() -> ghost_migrate::Result<()> {
//!     let config = MigrationConfig::builder()
//!         .original_table_name("orders")
//!         .config_file("/etc/ghost-migrate.cnf")
//!         .build()?;
//!     println!("ghost table: {}", config.ghost_table_name());
//!
//!     let columns = ColumnList::parse("id,customer,note");
//!     let row = ghost_migrate::normalize_row(
//!         &columns,
//!         &[SqlValue::Int(1), SqlValue::from("acme"), SqlValue::Null],
//!     )?;
//!     println!("{:?}", row.string_column(1));
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod core;
pub mod error;

// Re-exports for convenient access
pub use config::{ConfigFile, LoadMap, MigrationConfig, MigrationConfigBuilder};
pub use crate::core::identifier::{validate_ghost_trigger_length_below_max_length, TableNames};
pub use crate::core::normalize::{normalize, normalize_row};
pub use crate::core::{CharsetConversion, Column, ColumnList, ColumnType, ColumnValues, SqlValue};
pub use error::{MigrateError, Result};
