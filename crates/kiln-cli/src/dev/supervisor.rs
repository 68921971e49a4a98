//! Application process supervision for the dev session.
//!
//! The supervisor tracks two prerequisites, the server address and one
//! successful build, and starts the application only once both are met.
//! Later successful builds don't restart immediately: they arm a single
//! restart deadline that each newer build pushes forward, so a burst of
//! rebuilds collapses into one kill-and-relaunch using the latest artifact.

use crate::dev::launcher::{AppHandle, AppLauncher};
use crate::dev::DevEvent;
use crate::ui;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::{Duration, Instant};

/// How long after the last successful rebuild the restart fires.
pub const RESTART_DEBOUNCE: Duration = Duration::from_millis(150);

/// Base URL clients can actually connect to for a bound server address.
///
/// Wildcard addresses are not connectable, so they map to `localhost`;
/// concrete IPv6 addresses get bracketed.
pub fn base_url(addr: &SocketAddr) -> String {
    let host = match addr.ip() {
        IpAddr::V4(Ipv4Addr::UNSPECIFIED) | IpAddr::V6(Ipv6Addr::UNSPECIFIED) => {
            "localhost".to_string()
        }
        IpAddr::V4(ip) => ip.to_string(),
        IpAddr::V6(ip) => format!("[{}]", ip),
    };
    format!("http://{}:{}", host, addr.port())
}

/// Owns the application process for one dev session.
///
/// At most one application instance runs at a time; a restart kills the old
/// instance before launching the new one.
pub struct SupervisorSession {
    launcher: Arc<dyn AppLauncher>,
    artifact: PathBuf,
    events: mpsc::Sender<DevEvent>,
    app: Option<AppHandle>,
    server_url: Option<String>,
    restart_at: Option<Instant>,
    built_once: bool,
}

impl SupervisorSession {
    /// Create a supervisor that launches `artifact` through `launcher` and
    /// reports application exits on `events`.
    pub fn new(
        launcher: Arc<dyn AppLauncher>,
        artifact: PathBuf,
        events: mpsc::Sender<DevEvent>,
    ) -> Self {
        Self {
            launcher,
            artifact,
            events,
            app: None,
            server_url: None,
            restart_at: None,
            built_once: false,
        }
    }

    /// The URL handed to launched instances, once the server is up.
    pub fn server_url(&self) -> Option<&str> {
        self.server_url.as_deref()
    }

    /// Whether an application instance is currently running.
    pub fn has_app(&self) -> bool {
        self.app.is_some()
    }

    /// Deadline of the pending restart, if one is armed.
    pub fn restart_deadline(&self) -> Option<Instant> {
        self.restart_at
    }

    /// Record the bound server address. Starts the application when a build
    /// has already succeeded.
    pub async fn server_listening(&mut self, addr: SocketAddr) {
        self.server_url = Some(base_url(&addr));
        self.try_start().await;
    }

    /// Record a successful build. The first one starts the application (once
    /// the server address is known); every later one arms or re-arms the
    /// restart deadline.
    pub async fn build_succeeded(&mut self) {
        if self.built_once {
            self.restart_at = Some(Instant::now() + RESTART_DEBOUNCE);
        } else {
            self.built_once = true;
            self.try_start().await;
        }
    }

    /// Fire the armed restart: kill the running instance and launch a fresh
    /// one against the latest artifact.
    pub async fn restart_due(&mut self) {
        self.restart_at = None;
        if let Some(mut app) = self.app.take() {
            ui::info("Restarting application...");
            app.kill();
        }
        self.try_start().await;
    }

    /// Forget the running instance after it exited on its own, so teardown
    /// doesn't try to kill a process that is already gone.
    pub fn app_closed(&mut self) {
        self.app = None;
    }

    /// Tear the session down: cancel any pending restart and kill the
    /// running instance.
    pub fn shutdown(&mut self) {
        self.restart_at = None;
        if let Some(mut app) = self.app.take() {
            app.kill();
        }
    }

    /// Launch the application if every prerequisite is met and no instance
    /// is running. Launch failures are reported and leave the session up.
    async fn try_start(&mut self) {
        if self.app.is_some() || !self.built_once {
            return;
        }
        let Some(url) = self.server_url.clone() else {
            return;
        };

        let executable = match self.launcher.resolve().await {
            Ok(path) => path,
            Err(err) => {
                ui::error(&format!("Failed to locate the application: {}", err));
                return;
            }
        };

        match self
            .launcher
            .launch(&executable, &self.artifact, &url, self.events.clone())
            .await
        {
            Ok(handle) => {
                tracing::debug!(
                    "application running (pid {:?}) against {}",
                    handle.pid(),
                    url
                );
                self.app = Some(handle);
            }
            Err(err) => {
                ui::error(&format!("Failed to start the application: {}", err));
            }
        }
    }
}
