//! Configuration validation.

use super::MigrationConfigBuilder;
use crate::error::{MigrateError, Result};

/// Validate builder input before the configuration is frozen.
pub fn validate(builder: &MigrationConfigBuilder) -> Result<()> {
    match builder.force_table_name.as_deref() {
        Some(name) if name.trim().is_empty() => {
            return Err(MigrateError::Config(
                "force_table_name must not be empty when set".into(),
            ));
        }
        Some(_) => {}
        None => {
            if builder.original_table_name.trim().is_empty() {
                return Err(MigrateError::Config("table name is required".into()));
            }
        }
    }

    if let Some(db) = builder.database_name.as_deref() {
        if db.trim().is_empty() {
            return Err(MigrateError::Config(
                "database name must not be empty when set".into(),
            ));
        }
    }

    Ok(())
}
