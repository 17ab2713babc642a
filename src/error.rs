//! Error types for wpenv

use thiserror::Error;

/// Result type alias for wpenv operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for wpenv
///
/// Missing, empty and malformed environment values are never errors: they
/// resolve to the declared default. What remains is either a broken setting
/// table (fatal at startup), a typed lookup on the wrong key, or a failed
/// hand-off to the bootstrap program.
#[derive(Error, Debug)]
pub enum Error {
    // -------------------------------------------------------------------------
    // Setting Table Errors
    // -------------------------------------------------------------------------
    #[error("Unsupported setting kind '{kind}'")]
    UnsupportedKind { kind: String },

    #[error("Invalid setting {key}: {reason}")]
    InvalidSetting { key: String, reason: String },

    // -------------------------------------------------------------------------
    // Lookup Errors
    // -------------------------------------------------------------------------
    #[error("Setting not found: {0}")]
    SettingNotFound(String),

    #[error("Type mismatch for {key}: expected {expected}, got {actual}")]
    TypeMismatch {
        key: String,
        expected: String,
        actual: String,
    },

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Failed to serialize data: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Bootstrap Errors
    // -------------------------------------------------------------------------
    #[error("Failed to start bootstrap '{program}': {source}")]
    BootstrapSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Bootstrap '{program}' exited with {}", exit_description(.code))]
    BootstrapExited { program: String, code: Option<i32> },
}

fn exit_description(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "a signal".to_string(),
    }
}

impl Error {
    pub(crate) fn invalid(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidSetting {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Check if this is a "not found" type error
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::SettingNotFound(_))
    }

    /// Check if this error comes from a broken setting table
    ///
    /// These are programming errors: the process must not proceed to bootstrap.
    #[must_use]
    pub fn is_fatal_schema_error(&self) -> bool {
        matches!(
            self,
            Error::UnsupportedKind { .. } | Error::InvalidSetting { .. }
        )
    }

    /// Exit code to use when this error terminates the process
    ///
    /// A bootstrap that exited with its own status passes it through.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::BootstrapExited {
                code: Some(code), ..
            } => *code,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        let err = Error::UnsupportedKind {
            kind: "float".into(),
        };
        assert!(err.is_fatal_schema_error());
        assert!(!err.is_not_found());

        let err = Error::SettingNotFound("DB_NAME".into());
        assert!(err.is_not_found());
        assert!(!err.is_fatal_schema_error());
    }

    #[test]
    fn test_write_failure_is_reported() {
        let err: Error = std::io::Error::from(std::io::ErrorKind::BrokenPipe).into();
        assert!(matches!(err, Error::Output(_)));
        assert!(err.to_string().starts_with("Failed to write output"));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_bootstrap_exit_codes() {
        let err = Error::BootstrapExited {
            program: "php-fpm".into(),
            code: Some(3),
        };
        assert_eq!(err.exit_code(), 3);
        assert_eq!(err.to_string(), "Bootstrap 'php-fpm' exited with status 3");

        let err = Error::BootstrapExited {
            program: "php-fpm".into(),
            code: None,
        };
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().ends_with("a signal"));
    }
}
