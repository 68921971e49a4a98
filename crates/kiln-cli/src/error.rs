//! Error handling for the Kiln CLI.
//!
//! A hierarchical error type system built on `thiserror`. Top-level errors
//! (`CliError`) represent broad categories of failures, domain-specific
//! errors (`ConfigError`, `BuildError`) carry detailed context, and
//! conversion between them is automatic via `#[from]`. Error messages carry
//! actionable hints where a fix is known.
//!
//! # Example
//!
//! ```rust,no_run
//! use kiln_cli::error::{Result, ResultExt};
//! use std::path::Path;
//!
//! fn read_manifest(path: &Path) -> Result<String> {
//!     std::fs::read_to_string(path)
//!         .with_path(path)
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

mod miette;

pub use self::miette::cli_error_to_miette;

/// Top-level CLI error type.
///
/// The primary error type returned by CLI commands. Domain-specific errors
/// convert into it automatically.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration-related errors (missing fields, bad values, etc.)
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Main-process build errors
    #[error("Build error: {0}")]
    Build(#[from] BuildError),

    /// Invalid command-line arguments or options
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// File or directory not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// I/O errors from file system operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Development server errors
    #[error("Server error: {0}")]
    Server(String),

    /// File watching errors
    #[error("File watcher error: {0}")]
    Watch(#[from] notify::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Application executable could not be located
    #[error("Application executable not found: {}\n\nHint: Install it or pass --app <path>", .0.display())]
    AppNotFound(PathBuf),

    /// Application process failed to start
    #[error("Failed to start application: {0}")]
    Spawn(String),

    /// Generic errors with custom messages
    #[error("{0}")]
    Custom(String),
}

/// Configuration-specific errors.
///
/// These occur during config file loading, merging, and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Missing required configuration field
    #[error("Missing required field: {field}\n\nHint: {hint}")]
    MissingField {
        /// Name of the missing field
        field: String,
        /// Helpful hint for providing the field
        hint: String,
    },

    /// Invalid value for a configuration option
    #[error("Invalid value for '{field}': {value}\n\nHint: {hint}")]
    InvalidValue {
        /// Name of the field with invalid value
        field: String,
        /// The invalid value
        value: String,
        /// Helpful hint for correct values
        hint: String,
    },

    /// Config file or environment extraction failed
    #[error("Failed to load configuration: {0}\n\nHint: Check kiln.config.json syntax and KILN_* variables")]
    Extract(#[from] figment::Error),

    /// I/O error while reading config
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
}

/// Main-process build errors.
///
/// These occur when running the configured bundler command.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The build command was empty after parsing
    #[error("Build command is empty\n\nHint: Pass --build \"<command>\" or set \"build\" in kiln.config.json")]
    MissingCommand,

    /// The build command could not be spawned
    #[error("Failed to run build command '{program}': {source}\n\nHint: Check that '{program}' is installed and on PATH")]
    CommandSpawn {
        /// Program that failed to start
        program: String,
        /// Underlying spawn error
        source: std::io::Error,
    },

    /// The build command ran but exited unsuccessfully
    #[error("Build command exited with {status}")]
    CommandFailed {
        /// Exit status description
        status: String,
    },
}

/// Result type alias using `CliError` as the default error type.
pub type Result<T, E = CliError> = std::result::Result<T, E>;

/// Extension trait for adding context to `Result` types.
pub trait ResultExt<T> {
    /// Add a file path to the error context.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # use std::path::Path;
    /// # use kiln_cli::error::{Result, ResultExt};
    /// # fn run() -> Result<()> {
    /// let path = Path::new("non_existent_file.txt");
    /// std::fs::read_to_string(path)
    ///     .with_path(path)?;
    /// # Ok(())
    /// # }
    /// ```
    fn with_path(self, path: impl AsRef<std::path::Path>) -> Result<T>;

    /// Add a helpful hint to the error context.
    fn with_hint(self, hint: impl std::fmt::Display) -> Result<T>;

    /// Convert to a custom error message.
    fn context(self, msg: impl std::fmt::Display) -> Result<T>;
}

impl<T, E: Into<CliError>> ResultExt<T> for std::result::Result<T, E> {
    fn with_path(self, path: impl AsRef<std::path::Path>) -> Result<T> {
        self.map_err(|e| {
            let err: CliError = e.into();
            match err {
                CliError::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound => {
                    CliError::FileNotFound(path.as_ref().to_path_buf())
                }
                other => other,
            }
        })
    }

    fn with_hint(self, hint: impl std::fmt::Display) -> Result<T> {
        self.map_err(|e| {
            let err: CliError = e.into();
            CliError::Custom(format!("{}\n\nHint: {}", err, hint))
        })
    }

    fn context(self, msg: impl std::fmt::Display) -> Result<T> {
        self.map_err(|e| {
            let err: CliError = e.into();
            CliError::Custom(format!("{}: {}", msg, err))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_missing_field() {
        let err = ConfigError::MissingField {
            field: "build".to_string(),
            hint: "Pass --build \"<command>\" or set \"build\" in kiln.config.json".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Missing required field: build"));
        assert!(msg.contains("Hint:"));
    }

    #[test]
    fn test_config_error_invalid_value() {
        let err = ConfigError::InvalidValue {
            field: "port".to_string(),
            value: "0".to_string(),
            hint: "Use a port between 1 and 65535".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Invalid value for 'port'"));
        assert!(msg.contains("Use a port between"));
    }

    #[test]
    fn test_build_error_command_failed() {
        let err = BuildError::CommandFailed {
            status: "exit code 1".to_string(),
        };
        assert!(err.to_string().contains("exit code 1"));
    }

    #[test]
    fn test_cli_error_from_config_error() {
        let config_err = ConfigError::MissingField {
            field: "build".to_string(),
            hint: "set it".to_string(),
        };
        let cli_err: CliError = config_err.into();
        assert!(matches!(cli_err, CliError::Config(_)));
    }

    #[test]
    fn test_cli_error_from_build_error() {
        let cli_err: CliError = BuildError::MissingCommand.into();
        assert!(matches!(cli_err, CliError::Build(_)));
    }

    #[test]
    fn test_app_not_found_carries_hint() {
        let err = CliError::AppNotFound(PathBuf::from("electron"));
        let msg = err.to_string();
        assert!(msg.contains("electron"));
        assert!(msg.contains("Hint:"));
    }

    #[test]
    fn test_result_ext_with_path() {
        let result: std::io::Result<()> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "file not found",
        ));

        let err = result.with_path("/test/path.txt").unwrap_err();
        assert!(matches!(err, CliError::FileNotFound(_)));
    }

    #[test]
    fn test_result_ext_with_hint() {
        let result: std::result::Result<(), BuildError> = Err(BuildError::MissingCommand);

        let err = result.with_hint("Try passing --build").unwrap_err();
        assert!(err.to_string().contains("Hint: Try passing --build"));
    }

    #[test]
    fn test_result_ext_context() {
        let result: std::result::Result<(), BuildError> = Err(BuildError::MissingCommand);

        let err = result.context("Failed to start dev session").unwrap_err();
        assert!(err.to_string().contains("Failed to start dev session"));
    }
}
