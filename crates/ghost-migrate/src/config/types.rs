//! Configuration type definitions.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset, Local};
use serde::Serialize;

use crate::error::{MigrateError, Result};

/// Default suffix appended to ghost trigger names.
pub const DEFAULT_TRIGGER_SUFFIX: &str = "_gho";

/// Contents of the INI-style config file.
///
/// Only the `[client]` and `[osc]` sections are read; anything else in the
/// file is ignored so a regular MySQL option file can be reused.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConfigFile {
    /// `[client]` section.
    pub client: ClientSection,

    /// `[osc]` section.
    pub osc: OscSection,
}

/// Credentials from the `[client]` section.
#[derive(Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClientSection {
    /// MySQL user.
    pub user: String,

    /// MySQL password (never serialized).
    #[serde(skip_serializing)]
    pub password: String,
}

impl fmt::Debug for ClientSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientSection")
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Tunables from the `[osc]` section, kept verbatim as strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OscSection {
    /// Rows per copy chunk.
    pub chunk_size: String,

    /// Replication lag threshold in milliseconds.
    pub max_lag_millis: String,

    /// Custom query used to measure replication lag.
    pub replication_lag_query: String,

    /// Load thresholds, e.g. `Threads_running=25,Threads_connected=500`.
    pub max_load: String,
}

/// Parsed form of the `max_load` tunable: status variable name to threshold.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadMap(BTreeMap<String, i64>);

impl LoadMap {
    /// Parse a comma separated list of `name=threshold` pairs.
    ///
    /// An empty (or all whitespace) string yields an empty map.
    pub fn parse(spec: &str) -> Result<Self> {
        let mut map = BTreeMap::new();
        if spec.trim().is_empty() {
            return Ok(Self(map));
        }

        for entry in spec.split(',') {
            let (name, value) = entry.split_once('=').ok_or_else(|| {
                MigrateError::Config(format!("max_load entry '{}' is not name=value", entry))
            })?;
            let name = name.trim();
            if name.is_empty() {
                return Err(MigrateError::Config(format!(
                    "max_load entry '{}' has an empty variable name",
                    entry
                )));
            }
            let threshold: i64 = value.trim().parse().map_err(|_| {
                MigrateError::Config(format!(
                    "max_load threshold for '{}' is not an integer: '{}'",
                    name, value
                ))
            })?;
            map.insert(name.to_string(), threshold);
        }

        Ok(Self(map))
    }

    /// Threshold for a status variable.
    pub fn get(&self, name: &str) -> Option<i64> {
        self.0.get(name).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl fmt::Display for LoadMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (name, threshold) in &self.0 {
            if !first {
                f.write_str(",")?;
            }
            write!(f, "{}={}", name, threshold)?;
            first = false;
        }
        Ok(())
    }
}

/// Migration configuration.
///
/// Built once through [`MigrationConfigBuilder`] during startup and never
/// mutated afterwards: there are no setters, so a `MigrationConfig` behind
/// an `Arc` can be read by the row copier, the binlog applier and the
/// cut-over task at the same time without locking.
#[derive(Debug, Clone)]
pub struct MigrationConfig {
    pub(crate) database_name: Option<String>,
    pub(crate) original_table_name: String,
    pub(crate) force_table_name: Option<String>,
    pub(crate) timestamp_old_table: bool,
    pub(crate) start_time: DateTime<FixedOffset>,
    pub(crate) trigger_suffix: String,
    pub(crate) remove_trigger_suffix: bool,
    pub(crate) config_file: Option<PathBuf>,
    pub(crate) file: ConfigFile,
    pub(crate) credentials: ClientSection,
}

impl MigrationConfig {
    /// Start building a configuration.
    pub fn builder() -> MigrationConfigBuilder {
        MigrationConfigBuilder::default()
    }

    pub fn database_name(&self) -> Option<&str> {
        self.database_name.as_deref()
    }

    /// Name of the table being altered.
    pub fn original_table_name(&self) -> &str {
        &self.original_table_name
    }

    /// Base name forced for the ghost, changelog and retired tables.
    pub fn force_table_name(&self) -> Option<&str> {
        self.force_table_name.as_deref()
    }

    pub fn timestamp_old_table(&self) -> bool {
        self.timestamp_old_table
    }

    /// When the migration started.
    pub fn start_time(&self) -> DateTime<FixedOffset> {
        self.start_time
    }

    pub fn trigger_suffix(&self) -> &str {
        &self.trigger_suffix
    }

    pub fn remove_trigger_suffix(&self) -> bool {
        self.remove_trigger_suffix
    }

    pub fn config_file(&self) -> Option<&Path> {
        self.config_file.as_deref()
    }

    /// Parsed config file (defaults when no file was given).
    pub fn file(&self) -> &ConfigFile {
        &self.file
    }

    /// Effective user: command-line value, falling back to `[client] user`.
    pub fn user(&self) -> &str {
        if self.credentials.user.is_empty() {
            &self.file.client.user
        } else {
            &self.credentials.user
        }
    }

    /// Effective password: command-line value, falling back to `[client] password`.
    pub fn password(&self) -> &str {
        if self.credentials.password.is_empty() {
            &self.file.client.password
        } else {
            &self.credentials.password
        }
    }

    /// Thresholds parsed from the `[osc] max_load` string.
    pub fn max_load(&self) -> Result<LoadMap> {
        LoadMap::parse(&self.file.osc.max_load)
    }
}

/// Builder for [`MigrationConfig`].
#[derive(Debug, Clone, Default)]
pub struct MigrationConfigBuilder {
    pub(crate) database_name: Option<String>,
    pub(crate) original_table_name: String,
    pub(crate) force_table_name: Option<String>,
    pub(crate) timestamp_old_table: bool,
    pub(crate) start_time: Option<DateTime<FixedOffset>>,
    pub(crate) trigger_suffix: Option<String>,
    pub(crate) remove_trigger_suffix: bool,
    pub(crate) config_file: Option<PathBuf>,
    pub(crate) file: Option<ConfigFile>,
    pub(crate) credentials: ClientSection,
}

impl MigrationConfigBuilder {
    pub fn database_name(mut self, name: impl Into<String>) -> Self {
        self.database_name = Some(name.into());
        self
    }

    pub fn original_table_name(mut self, name: impl Into<String>) -> Self {
        self.original_table_name = name.into();
        self
    }

    pub fn force_table_name(mut self, name: impl Into<String>) -> Self {
        self.force_table_name = Some(name.into());
        self
    }

    pub fn timestamp_old_table(mut self, enabled: bool) -> Self {
        self.timestamp_old_table = enabled;
        self
    }

    pub fn start_time(mut self, start_time: DateTime<FixedOffset>) -> Self {
        self.start_time = Some(start_time);
        self
    }

    pub fn trigger_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.trigger_suffix = Some(suffix.into());
        self
    }

    pub fn remove_trigger_suffix(mut self, enabled: bool) -> Self {
        self.remove_trigger_suffix = enabled;
        self
    }

    /// Path of an INI file to read during [`build`](Self::build).
    pub fn config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    /// Use already parsed file contents instead of reading a path.
    pub fn file(mut self, file: ConfigFile) -> Self {
        self.file = Some(file);
        self
    }

    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.credentials.user = user.into();
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.credentials.password = password.into();
        self
    }

    /// Validate, read the config file if one was given, and freeze.
    pub fn build(self) -> Result<MigrationConfig> {
        super::validation::validate(&self)?;

        let file = match (&self.config_file, self.file) {
            (Some(path), _) => ConfigFile::load(path)?,
            (None, Some(file)) => file,
            (None, None) => ConfigFile::default(),
        };

        Ok(MigrationConfig {
            database_name: self.database_name,
            original_table_name: self.original_table_name,
            force_table_name: self.force_table_name,
            timestamp_old_table: self.timestamp_old_table,
            start_time: self
                .start_time
                .unwrap_or_else(|| Local::now().fixed_offset()),
            trigger_suffix: self
                .trigger_suffix
                .unwrap_or_else(|| DEFAULT_TRIGGER_SUFFIX.to_string()),
            remove_trigger_suffix: self.remove_trigger_suffix,
            config_file: self.config_file,
            file,
            credentials: self.credentials,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_load_map_parse() {
        let map = LoadMap::parse("Threads_running=100,Threads_connected=500").unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("Threads_running"), Some(100));
        assert_eq!(map.get("Threads_connected"), Some(500));
        assert_eq!(map.get("Questions"), None);
        assert_eq!(map.to_string(), "Threads_connected=500,Threads_running=100");
    }

    #[test]
    fn test_load_map_empty() {
        assert!(LoadMap::parse("").unwrap().is_empty());
        assert!(LoadMap::parse("  ").unwrap().is_empty());
    }

    #[test]
    fn test_load_map_rejects_malformed() {
        assert!(LoadMap::parse("Threads_running").is_err());
        assert!(LoadMap::parse("Threads_running=lots").is_err());
        assert!(LoadMap::parse("=5").is_err());
    }

    #[test]
    fn test_defaults() {
        let config = MigrationConfig::builder()
            .original_table_name("t")
            .build()
            .unwrap();
        assert_eq!(config.trigger_suffix(), "_gho");
        assert!(!config.remove_trigger_suffix());
        assert!(!config.timestamp_old_table());
        assert!(config.force_table_name().is_none());
        assert!(config.config_file().is_none());
        assert_eq!(config.file(), &ConfigFile::default());
        assert!(config.max_load().unwrap().is_empty());
    }

    #[test]
    fn test_credentials_prefer_command_line() {
        let file = ConfigFile {
            client: ClientSection {
                user: "file_user".to_string(),
                password: "file_pass".to_string(),
            },
            osc: OscSection::default(),
        };

        let config = MigrationConfig::builder()
            .original_table_name("t")
            .file(file.clone())
            .build()
            .unwrap();
        assert_eq!(config.user(), "file_user");
        assert_eq!(config.password(), "file_pass");

        let config = MigrationConfig::builder()
            .original_table_name("t")
            .file(file)
            .user("cli_user")
            .password("cli_pass")
            .build()
            .unwrap();
        assert_eq!(config.user(), "cli_user");
        assert_eq!(config.password(), "cli_pass");
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = MigrationConfig::builder()
            .original_table_name("t")
            .password("super_secret_password_123")
            .build()
            .unwrap();
        let debug_output = format!("{:?}", config);
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_password_123"));
    }

    #[test]
    fn test_password_not_serialized() {
        let file = ConfigFile {
            client: ClientSection {
                user: "u".to_string(),
                password: "secret_password".to_string(),
            },
            osc: OscSection::default(),
        };
        let json = serde_json::to_string(&file).unwrap();
        assert!(!json.contains("secret_password"), "Password was serialized: {}", json);
    }

    #[test]
    fn test_config_shared_across_threads() {
        let config = Arc::new(
            MigrationConfig::builder()
                .original_table_name("shared")
                .build()
                .unwrap(),
        );

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let config = Arc::clone(&config);
                std::thread::spawn(move || config.ghost_table_name())
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), "_shared_gho");
        }
    }
}
