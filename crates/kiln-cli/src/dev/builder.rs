//! Main-process bundling for the dev session.
//!
//! The session doesn't bundle anything itself; it shells out to whatever
//! command the project configures (esbuild, tsc, a package script) and only
//! cares whether the command succeeded. [`Bundler`] is the seam that lets
//! session tests substitute an in-memory implementation.

use crate::error::{BuildError, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Instant;
use tokio::process::Command;

/// Outcome of one successful build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildReport {
    /// Wall-clock build duration in milliseconds
    pub duration_ms: u64,
}

/// Produces the main-process artifact.
#[async_trait]
pub trait Bundler: Send + Sync {
    /// Run one (re)build of the main-process entry.
    ///
    /// # Errors
    ///
    /// Returns an error when the build cannot run or exits unsuccessfully.
    async fn build(&self) -> Result<BuildReport>;

    /// Release any build context. Must settle before the dev session counts
    /// as stopped.
    async fn dispose(&self);
}

/// Bundler that runs a configured command line with inherited stdio, so
/// compiler diagnostics land on the user's terminal unchanged.
pub struct CommandBundler {
    program: String,
    args: Vec<String>,
    cwd: PathBuf,
}

impl CommandBundler {
    /// Create a bundler from a parsed command line.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::MissingCommand`] when the command is empty.
    pub fn new(command: Vec<String>, cwd: PathBuf) -> Result<Self> {
        let mut parts = command.into_iter();
        let program = parts.next().ok_or(BuildError::MissingCommand)?;
        Ok(Self {
            program,
            args: parts.collect(),
            cwd,
        })
    }

    /// The program this bundler runs.
    pub fn program(&self) -> &str {
        &self.program
    }
}

#[async_trait]
impl Bundler for CommandBundler {
    async fn build(&self) -> Result<BuildReport> {
        let start = Instant::now();
        tracing::debug!("running build command: {} {:?}", self.program, self.args);

        let status = Command::new(&self.program)
            .args(&self.args)
            .current_dir(&self.cwd)
            .status()
            .await
            .map_err(|source| BuildError::CommandSpawn {
                program: self.program.clone(),
                source,
            })?;

        if !status.success() {
            let status = match status.code() {
                Some(code) => format!("exit code {}", code),
                None => "a signal".to_string(),
            };
            return Err(BuildError::CommandFailed { status }.into());
        }

        Ok(BuildReport {
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    async fn dispose(&self) {
        // One-shot commands leave no watch context behind.
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_command_is_rejected() {
        let result = CommandBundler::new(vec![], PathBuf::from("."));
        assert!(result.is_err());
    }

    #[test]
    fn test_command_splits_program_and_args() {
        let bundler = CommandBundler::new(
            vec!["esbuild".into(), "src/main.ts".into(), "--bundle".into()],
            PathBuf::from("."),
        )
        .unwrap();
        assert_eq!(bundler.program(), "esbuild");
        assert_eq!(bundler.args, vec!["src/main.ts", "--bundle"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_successful_command_reports_duration() {
        let bundler = CommandBundler::new(vec!["true".into()], PathBuf::from(".")).unwrap();
        let report = bundler.build().await.unwrap();
        assert!(report.duration_ms < 60_000);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_command_is_an_error() {
        let bundler = CommandBundler::new(vec!["false".into()], PathBuf::from(".")).unwrap();
        let err = bundler.build().await.unwrap_err();
        assert!(err.to_string().contains("exit code"));
    }

    #[tokio::test]
    async fn test_missing_program_is_a_spawn_error() {
        let bundler = CommandBundler::new(
            vec!["kiln-test-no-such-program".into()],
            PathBuf::from("."),
        )
        .unwrap();
        let err = bundler.build().await.unwrap_err();
        assert!(err.to_string().contains("kiln-test-no-such-program"));
    }
}
