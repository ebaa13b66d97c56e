//! Error types for the migration library.

use thiserror::Error;

/// Main error type for migration operations.
#[derive(Error, Debug)]
pub enum MigrateError {
    /// Configuration error (bad INI content, missing table name, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (config file missing or unreadable)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A replication value could not be converted for the shadow table
    #[error("Conversion failed for column {column}: {message}")]
    Conversion { column: String, message: String },

    /// Charset name with no known decoder
    #[error("Unsupported character set: {0}")]
    UnsupportedCharset(String),

    /// Derived identifier exceeds the engine limit
    #[error("Identifier {name} is {length} characters long, the maximum is {max}")]
    IdentifierTooLong {
        name: String,
        length: usize,
        max: usize,
    },

    /// Row event does not line up with the column catalog
    #[error("Row shape mismatch: {0}")]
    RowShape(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MigrateError {
    /// Create a Conversion error
    pub fn conversion(column: impl Into<String>, message: impl Into<String>) -> Self {
        MigrateError::Conversion {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Process exit code for this error class.
    pub fn exit_code(&self) -> u8 {
        match self {
            MigrateError::Config(_) | MigrateError::Io(_) => 2,
            MigrateError::IdentifierTooLong { .. } => 3,
            MigrateError::Conversion { .. }
            | MigrateError::UnsupportedCharset(_)
            | MigrateError::RowShape(_) => 4,
            MigrateError::Json(_) => 1,
        }
    }

    /// Format error with full details including error chain
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);

        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }
}

/// Result type alias for migration operations.
pub type Result<T> = std::result::Result<T, MigrateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_by_class() {
        assert_eq!(MigrateError::Config("x".into()).exit_code(), 2);
        assert_eq!(
            MigrateError::IdentifierTooLong {
                name: "t".into(),
                length: 65,
                max: 64
            }
            .exit_code(),
            3
        );
        assert_eq!(MigrateError::conversion("c", "bad").exit_code(), 4);
    }

    #[test]
    fn test_format_detailed_includes_cause() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = MigrateError::Io(io);
        let detailed = err.format_detailed();
        assert!(detailed.starts_with("Error: IO error: no such file"));
    }
}
