//! Terminal UI utilities for status messages and formatted output.
//!
//! Handles environment detection (CI, TTY) and gracefully degrades when
//! terminal features aren't available.
//!
//! # Examples
//!
//! ```no_run
//! use kiln_cli::ui;
//!
//! ui::init_colors();
//!
//! ui::success("Development server running");
//! ui::error("Build failed");
//! ```

mod format;
mod messages;

pub use format::format_duration;
pub use messages::{debug, error, info, success, warning};

/// Check if running in a CI environment.
///
/// Detects common CI environment variables from GitHub Actions, GitLab CI,
/// CircleCI, and Travis CI.
pub fn is_ci() -> bool {
    std::env::var("CI").is_ok()
        || std::env::var("GITHUB_ACTIONS").is_ok()
        || std::env::var("GITLAB_CI").is_ok()
        || std::env::var("CIRCLECI").is_ok()
        || std::env::var("TRAVIS").is_ok()
}

/// Check if color output should be enabled.
///
/// Respects NO_COLOR and FORCE_COLOR environment variables, falls back to
/// terminal capability detection.
pub fn should_use_color() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    console::user_attended_stderr()
}

/// Initialize color support based on environment.
///
/// Should be called early in the application lifecycle (e.g., in main).
/// `owo-colors` already respects NO_COLOR and terminal capabilities; this
/// exists as an explicit initialization point.
pub fn init_colors() {
    let _ = should_use_color();
}
