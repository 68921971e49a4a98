//! Miette diagnostic conversion for CLI errors.
//!
//! Converts CLI errors to miette diagnostics for readable error reporting
//! at the binary boundary.

use crate::error::{BuildError, CliError};
use miette::Report;

/// Convert CliError to miette Report
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Build(e) => build_error_to_miette(e),
        CliError::Config(e) => miette::miette!("Configuration error: {}", e),
        CliError::Server(msg) => miette::miette!("Server error: {}", msg),
        _ => miette::miette!("{}", err),
    }
}

/// Convert BuildError to miette Report
pub fn build_error_to_miette(err: BuildError) -> Report {
    match err {
        BuildError::CommandSpawn { program, source } => {
            miette::miette!(
                "Failed to run build command '{}': {}\n\nHint: Check that '{}' is installed and on PATH",
                program,
                source,
                program
            )
        }
        _ => miette::miette!("{}", err),
    }
}
