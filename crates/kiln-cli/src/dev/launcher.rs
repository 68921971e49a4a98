//! Application process launching and monitoring.
//!
//! The supervisor holds an [`AppHandle`] per running application instance.
//! A background monitor task owns the child process: it reports a natural
//! exit as a [`DevEvent::AppExited`], while a deliberate kill through the
//! handle tears the process down silently so restarts don't masquerade as
//! the user closing the app.

use crate::dev::DevEvent;
use crate::error::{CliError, Result};
use async_trait::async_trait;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tokio::process::{Child, Command};
use tokio::sync::{mpsc, oneshot};

/// Handle to a running application instance.
///
/// Dropping the handle without calling [`AppHandle::kill`] also terminates
/// the process: the monitor treats a closed kill channel as a kill request,
/// so no instance outlives its session.
#[derive(Debug)]
pub struct AppHandle {
    pid: Option<u32>,
    kill: Option<oneshot::Sender<()>>,
}

impl AppHandle {
    /// Assemble a handle from a process id and a kill channel.
    pub fn new(pid: Option<u32>, kill: oneshot::Sender<()>) -> Self {
        Self {
            pid,
            kill: Some(kill),
        }
    }

    /// OS process id, when still known.
    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    /// Request termination. Idempotent; the monitor swallows kill errors and
    /// emits no exit event for a deliberate kill.
    pub fn kill(&mut self) {
        if let Some(kill) = self.kill.take() {
            let _ = kill.send(());
        }
    }
}

/// Starts application instances for the dev session.
#[async_trait]
pub trait AppLauncher: Send + Sync {
    /// Locate the application executable.
    ///
    /// # Errors
    ///
    /// Returns an error when the executable cannot be found; the session
    /// reports this and stays up rather than crashing.
    async fn resolve(&self) -> Result<PathBuf>;

    /// Spawn the application.
    ///
    /// The process receives exactly two arguments: the main-process artifact
    /// path and the dev server base URL. A natural exit is reported on
    /// `events`; a kill through the returned handle is not.
    async fn launch(
        &self,
        executable: &Path,
        artifact: &Path,
        dev_url: &str,
        events: mpsc::Sender<DevEvent>,
    ) -> Result<AppHandle>;
}

/// Launcher that spawns the configured executable with inherited stdio.
pub struct ShellLauncher {
    executable: PathBuf,
    cwd: PathBuf,
}

impl ShellLauncher {
    /// Create a launcher for `executable`, resolved against `cwd` when
    /// relative, or against PATH when it is a bare name.
    pub fn new(executable: PathBuf, cwd: PathBuf) -> Self {
        Self { executable, cwd }
    }
}

#[async_trait]
impl AppLauncher for ShellLauncher {
    async fn resolve(&self) -> Result<PathBuf> {
        // Anything with a path component is a concrete location; only bare
        // names go through PATH lookup.
        if self.executable.components().count() > 1 || self.executable.is_absolute() {
            let candidate = if self.executable.is_absolute() {
                self.executable.clone()
            } else {
                self.cwd.join(&self.executable)
            };
            if candidate.is_file() {
                return Ok(candidate);
            }
            return Err(CliError::AppNotFound(candidate));
        }

        search_path(self.executable.as_os_str())
    }

    async fn launch(
        &self,
        executable: &Path,
        artifact: &Path,
        dev_url: &str,
        events: mpsc::Sender<DevEvent>,
    ) -> Result<AppHandle> {
        let child = Command::new(executable)
            .arg(artifact)
            .arg(dev_url)
            .current_dir(&self.cwd)
            .spawn()
            .map_err(|err| CliError::Spawn(format!("{}: {}", executable.display(), err)))?;

        let pid = child.id();
        tracing::debug!("launched application (pid {:?})", pid);

        let (kill_tx, kill_rx) = oneshot::channel();
        tokio::spawn(monitor(child, kill_rx, events));

        Ok(AppHandle::new(pid, kill_tx))
    }
}

/// Wait on the child until it exits or a kill is requested.
async fn monitor(mut child: Child, mut kill_rx: oneshot::Receiver<()>, events: mpsc::Sender<DevEvent>) {
    let natural_exit = {
        let wait = child.wait();
        tokio::pin!(wait);
        tokio::select! {
            status = &mut wait => Some(status),
            // Fires on kill() and when the handle is dropped
            _ = &mut kill_rx => None,
        }
    };

    match natural_exit {
        Some(status) => {
            let code = status.ok().and_then(|s| s.code());
            tracing::debug!("application exited with code {:?}", code);
            let _ = events.send(DevEvent::AppExited { code }).await;
        }
        None => {
            let _ = child.start_kill();
            let _ = child.wait().await;
            tracing::debug!("application killed for restart or shutdown");
        }
    }
}

/// Look up a bare executable name on PATH.
fn search_path(name: &OsStr) -> Result<PathBuf> {
    let path_var = std::env::var_os("PATH").unwrap_or_default();
    for dir in std::env::split_paths(&path_var) {
        let candidate = dir.join(name);
        if candidate.is_file() {
            return Ok(candidate);
        }
        #[cfg(windows)]
        for ext in ["exe", "cmd", "bat"] {
            let candidate = dir.join(name).with_extension(ext);
            if candidate.is_file() {
                return Ok(candidate);
            }
        }
    }
    Err(CliError::AppNotFound(PathBuf::from(name)))
}
