//! Configuration loading and validation.

mod types;
mod validation;

pub use types::*;

use crate::error::{MigrateError, Result};
use ini::Ini;
use std::path::Path;
use tracing::debug;

impl ConfigFile {
    /// Load the config file at `path`.
    ///
    /// A missing or unreadable file is an error; a file with no recognized
    /// sections yields the defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let file = Self::parse(&content)?;
        debug!("Read config file {:?}", path);
        Ok(file)
    }

    /// Parse INI content.
    pub fn parse(content: &str) -> Result<Self> {
        let ini = Ini::load_from_str(content)
            .map_err(|e| MigrateError::Config(format!("invalid config file: {}", e)))?;

        let value = |section: &str, key: &str| -> String {
            ini.section(Some(section))
                .and_then(|props| props.get(key))
                .unwrap_or_default()
                .to_string()
        };

        Ok(ConfigFile {
            client: ClientSection {
                user: value("client", "user"),
                password: value("client", "password"),
            },
            osc: OscSection {
                chunk_size: value("osc", "chunk_size"),
                max_lag_millis: value("osc", "max_lag_millis"),
                replication_lag_query: value("osc", "replication_lag_query"),
                max_load: value("osc", "max_load"),
            },
        })
    }
}
