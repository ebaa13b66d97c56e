//! Names of the tables and triggers a migration creates.
//!
//! The ghost, changelog and retired tables are named after the original
//! table (or a forced base name):
//!
//! ```text
//! _<base>_gho                   ghost table
//! _<base>_ghc                   changelog table
//! _<base>_del                   original table after cut-over
//! _<base>_<YYYYMMDDHHMMSS>_del  same, with --timestamp-old-table
//! ```
//!
//! MySQL rejects identifiers over 64 characters, so the base derived from
//! the original table name is cut short enough that every table name fits.
//! Trigger names are not truncated: a truncated trigger name could collide
//! with another trigger, so they are checked with
//! [`validate_ghost_trigger_length_below_max_length`] before any DDL runs.

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::MigrationConfig;
use crate::error::{MigrateError, Result};

/// Maximum identifier length in MySQL, in characters.
pub const MAX_TABLE_NAME_LENGTH: usize = 64;

const GHOST_TABLE_SUFFIX: &str = "gho";
const CHANGELOG_TABLE_SUFFIX: &str = "ghc";
const OLD_TABLE_SUFFIX: &str = "del";

/// Compact timestamp embedded in a timestamped retired-table name.
const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Characters around the base in `_<base>_xxx`.
const TABLE_NAME_OVERHEAD: usize = 1 + 1 + 3;

/// Characters taken by `_<YYYYMMDDHHMMSS>`.
const TIMESTAMP_SEGMENT_LENGTH: usize = 15;

/// The three table names derived for a migration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableNames {
    pub ghost: String,
    pub changelog: String,
    pub old: String,
}

/// Longest prefix of `name` with at most `max_chars` characters.
fn truncate_chars(name: &str, max_chars: usize) -> &str {
    match name.char_indices().nth(max_chars) {
        Some((idx, _)) => &name[..idx],
        None => name,
    }
}

/// Whether a ghost trigger name fits the identifier limit (inclusive).
pub fn validate_ghost_trigger_length_below_max_length(name: &str) -> bool {
    let length = name.chars().count();
    if length > MAX_TABLE_NAME_LENGTH {
        warn!(
            "Ghost trigger name {} is {} characters, limit is {}",
            name, length, MAX_TABLE_NAME_LENGTH
        );
        return false;
    }
    true
}

impl MigrationConfig {
    /// Base for table names whose fixed parts take `overhead` characters.
    fn table_name_base(&self, overhead: usize) -> &str {
        if let Some(forced) = self.force_table_name.as_deref() {
            return forced;
        }

        let max_base = MAX_TABLE_NAME_LENGTH - overhead;
        let base = truncate_chars(&self.original_table_name, max_base);
        if base.len() < self.original_table_name.len() {
            debug!(
                "Table name {} truncated to {} for derived names",
                self.original_table_name, base
            );
        }
        base
    }

    /// Name the original table gets after cut-over.
    pub fn old_table_name(&self) -> String {
        if self.timestamp_old_table {
            let base = self.table_name_base(TABLE_NAME_OVERHEAD + TIMESTAMP_SEGMENT_LENGTH);
            format!(
                "_{}_{}_{}",
                base,
                self.start_time.format(TIMESTAMP_FORMAT),
                OLD_TABLE_SUFFIX
            )
        } else {
            format!(
                "_{}_{}",
                self.table_name_base(TABLE_NAME_OVERHEAD),
                OLD_TABLE_SUFFIX
            )
        }
    }

    pub fn ghost_table_name(&self) -> String {
        format!(
            "_{}_{}",
            self.table_name_base(TABLE_NAME_OVERHEAD),
            GHOST_TABLE_SUFFIX
        )
    }

    pub fn changelog_table_name(&self) -> String {
        format!(
            "_{}_{}",
            self.table_name_base(TABLE_NAME_OVERHEAD),
            CHANGELOG_TABLE_SUFFIX
        )
    }

    pub fn table_names(&self) -> TableNames {
        TableNames {
            ghost: self.ghost_table_name(),
            changelog: self.changelog_table_name(),
            old: self.old_table_name(),
        }
    }

    /// Name of the ghost counterpart of an original trigger.
    ///
    /// The suffix is appended, or, with `remove_trigger_suffix`, stripped
    /// from a name that already ends with it.
    pub fn ghost_trigger_name(&self, trigger_name: &str) -> String {
        if self.remove_trigger_suffix {
            if let Some(stripped) = trigger_name.strip_suffix(self.trigger_suffix.as_str()) {
                return stripped.to_string();
            }
        }
        format!("{}{}", trigger_name, self.trigger_suffix)
    }

    pub fn validate_ghost_trigger_length_below_max_length(&self, name: &str) -> bool {
        validate_ghost_trigger_length_below_max_length(name)
    }

    /// Ghost trigger names for `triggers`, failing on the first that is too long.
    pub fn check_ghost_triggers<S: AsRef<str>>(&self, triggers: &[S]) -> Result<Vec<String>> {
        triggers
            .iter()
            .map(|trigger| {
                let name = self.ghost_trigger_name(trigger.as_ref());
                if validate_ghost_trigger_length_below_max_length(&name) {
                    Ok(name)
                } else {
                    Err(MigrateError::IdentifierTooLong {
                        length: name.chars().count(),
                        name,
                        max: MAX_TABLE_NAME_LENGTH,
                    })
                }
            })
            .collect()
    }
}
