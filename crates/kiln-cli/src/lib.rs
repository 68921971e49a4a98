//! Kiln CLI library.
//!
//! The `kiln` binary's internals, exposed as a library so integration tests
//! can drive the pieces directly: CLI definitions, command implementations,
//! the dev session (builder, watcher, launcher, supervisor), and the asset
//! server.

pub mod cli;
pub mod commands;
pub mod dev;
pub mod error;
pub mod logger;
pub mod server;
pub mod ui;

pub use error::{BuildError, CliError, ConfigError, Result, ResultExt};
