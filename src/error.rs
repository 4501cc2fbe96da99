//! Error types for cfn-publish.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for package publishing operations.
#[derive(Error, Debug)]
pub enum PublishError {
    #[error(
        "Invalid format of subversion '{0}': expected exactly 7 numeric characters"
    )]
    InvalidVersionFormat(String),

    #[error(
        "{prefix} already exists in production bucket {bucket}: you cannot override a version in the production bucket"
    )]
    ProductionOverwriteForbidden { bucket: String, prefix: String },

    #[error(
        "There should be exactly one {kind} file in {} directory, found {found}",
        dir.display()
    )]
    PackageLayout {
        dir: PathBuf,
        kind: String,
        found: usize,
    },

    #[error(
        "Command `{command}` failed in {} ({status})",
        cwd.display()
    )]
    ExternalToolFailure {
        command: String,
        cwd: PathBuf,
        status: String,
    },

    #[error("Storage operation failed: {0}")]
    Storage(#[from] object_store::Error),

    #[error("Invalid schema document {}: {reason}", path.display())]
    InvalidSchema { path: PathBuf, reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    JsonParseError(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using PublishError
pub type Result<T> = std::result::Result<T, PublishError>;

impl PublishError {
    /// Create a package layout error for a directory
    pub fn package_layout(
        dir: impl Into<PathBuf>,
        kind: impl Into<String>,
        found: usize,
    ) -> Self {
        Self::PackageLayout {
            dir: dir.into(),
            kind: kind.into(),
            found,
        }
    }

    /// Create an external tool failure error
    pub fn tool_failure(
        command: impl Into<String>,
        cwd: impl Into<PathBuf>,
        status: impl Into<String>,
    ) -> Self {
        Self::ExternalToolFailure {
            command: command.into(),
            cwd: cwd.into(),
            status: status.into(),
        }
    }

    /// Create an invalid schema error
    pub fn invalid_schema(
        path: impl Into<PathBuf>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidSchema {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_formats() {
        let err = PublishError::package_layout("cfn-resources/4.0/cluster", "json", 2);
        assert_eq!(
            err.to_string(),
            "There should be exactly one json file in cfn-resources/4.0/cluster directory, found 2"
        );

        let err = PublishError::InvalidVersionFormat("12ab".into());
        assert_eq!(
            err.to_string(),
            "Invalid format of subversion '12ab': expected exactly 7 numeric characters"
        );

        let err = PublishError::invalid_config("empty build command");
        assert_eq!(err.to_string(), "Invalid configuration: empty build command");
    }

    #[test]
    fn test_error_helpers() {
        let err = PublishError::tool_failure("make", "/tmp", "exit status: 2");
        assert!(matches!(err, PublishError::ExternalToolFailure { .. }));

        let err = PublishError::invalid_schema("schema.json", "not an object");
        assert!(matches!(err, PublishError::InvalidSchema { .. }));
    }

    #[test]
    fn test_from_conversions() {
        let json_err = serde_json::from_str::<serde_json::Value>("{");
        let err: PublishError = json_err.unwrap_err().into();
        assert!(matches!(err, PublishError::JsonParseError(_)));

        let io_err = std::io::Error::other("boom");
        let err: PublishError = io_err.into();
        assert!(matches!(err, PublishError::Io(_)));
    }
}
