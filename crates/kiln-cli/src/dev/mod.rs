//! Development session infrastructure.
//!
//! A dev session has three cooperating parts:
//!
//! - an HTTP server for renderer assets (see [`crate::server`]),
//! - a file watcher plus bundler that rebuilds the main process on change,
//! - a supervisor that owns the application process and restarts it after
//!   successful rebuilds.
//!
//! The supervisor never starts the application before both the server
//! address is known and one build has succeeded.

pub mod builder;
pub mod config;
pub mod launcher;
pub mod shims;
pub mod supervisor;
pub mod watcher;

pub use builder::{BuildReport, Bundler, CommandBundler};
pub use config::DevConfig;
pub use launcher::{AppHandle, AppLauncher, ShellLauncher};
pub use supervisor::{base_url, SupervisorSession, RESTART_DEBOUNCE};
pub use watcher::{FileChange, FileWatcher};

/// Lifecycle events reported back to the dev session loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DevEvent {
    /// The application process closed on its own (not killed by a restart).
    AppExited {
        /// Exit code when the process terminated normally
        code: Option<i32>,
    },
}
