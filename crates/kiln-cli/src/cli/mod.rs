//! Command-line interface definition for the Kiln dev harness.
//!
//! The complete CLI structure using clap v4's derive macros, giving
//! type-safe argument parsing with clear error messages.
//!
//! # Command Structure
//!
//! - `kiln dev` - Development session: asset server, rebuild watcher, and
//!   application supervisor
//! - `kiln serve` - Preview a packaged renderer root over HTTP

mod commands;

use clap::Parser;

pub use commands::{Command, DevArgs, ServeArgs};

/// Kiln - a dev harness for desktop web-view applications
#[derive(Parser, Debug)]
#[command(
    name = "kiln",
    version,
    about = "A dev harness for desktop web-view applications",
    long_about = "Kiln serves renderer assets over HTTP, rebuilds the main process when\n\
                  its sources change, and supervises the application process, restarting\n\
                  it after each successful rebuild."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    ///
    /// Shows detailed information about builds, file watching, and process
    /// supervision.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    ///
    /// Only critical errors will be displayed. Useful for CI/CD environments
    /// or when piping output to other tools.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    ///
    /// Outputs plain text without ANSI color codes. Useful for logging to
    /// files or systems that don't support colored terminal output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_structure_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_dev_parses_with_overrides() {
        let cli = Cli::parse_from([
            "kiln",
            "dev",
            "--build",
            "esbuild src/main.ts --bundle --outfile=dist/main.js",
            "--port",
            "4000",
        ]);
        match cli.command {
            Command::Dev(args) => {
                assert_eq!(args.port, Some(4000));
                assert!(args.build.as_deref().unwrap().starts_with("esbuild"));
            }
            _ => panic!("expected dev command"),
        }
    }

    #[test]
    fn test_global_flags_apply_after_subcommand() {
        let cli = Cli::parse_from(["kiln", "serve", "--verbose"]);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::Serve(_)));
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        let result = Cli::try_parse_from(["kiln", "serve", "--verbose", "--quiet"]);
        assert!(result.is_err());
    }
}
