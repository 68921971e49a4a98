//! Dev command: the full development session.
//!
//! Wires together the four moving parts and drives them from one event
//! loop:
//!
//! 1. write the renderer shims,
//! 2. run the initial build,
//! 3. bind the asset server and tell the supervisor its address,
//! 4. watch main-process sources; every change triggers a rebuild, every
//!    successful rebuild arms the restart timer.
//!
//! The session ends when the user interrupts it or the application closes
//! on its own; both are clean exits.

use crate::cli::DevArgs;
use crate::dev::{
    shims, Bundler, CommandBundler, DevConfig, DevEvent, FileWatcher, ShellLauncher,
    SupervisorSession,
};
use crate::error::{CliError, Result};
use crate::server::asset_router;
use crate::ui;
use crate::ui::format_duration;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::mpsc;
use tokio::time::Instant;

/// Execute the dev command.
///
/// # Errors
///
/// Returns an error when configuration is invalid or the server cannot
/// start. Build and launch failures inside a running session are reported
/// on stderr and keep the session alive.
pub async fn execute(args: DevArgs) -> Result<()> {
    ui::info("Starting development session...");

    let config = DevConfig::from_args(&args)?;
    config.validate()?;

    ui::info(&format!("Serving renderer assets from {}", config.root.display()));
    ui::info(&format!(
        "Watching main-process sources in {}",
        config.watch_dir.display()
    ));

    let written = shims::write_shims(&config.shim_dir).await?;
    tracing::debug!(
        "{} renderer shims available under {}",
        written,
        config.shim_dir.display()
    );

    let builder = CommandBundler::new(config.build.clone(), config.cwd.clone())?;
    let launcher = Arc::new(ShellLauncher::new(config.app.clone(), config.cwd.clone()));
    let (event_tx, mut events) = mpsc::channel::<DevEvent>(16);
    let mut session = SupervisorSession::new(launcher, config.artifact.clone(), event_tx);

    // Initial build before anything runs. A failure is reported and the
    // session stays up so the next save can fix it.
    ui::info("Performing initial build...");
    match builder.build().await {
        Ok(report) => {
            ui::success(&format!(
                "Initial build completed in {}",
                format_duration(Duration::from_millis(report.duration_ms))
            ));
            session.build_succeeded().await;
        }
        Err(err) => ui::error(&format!("Initial build failed: {}", err)),
    }

    let listener = TcpListener::bind(config.addr)
        .await
        .map_err(|err| CliError::Server(format!("Failed to bind to {}: {}", config.addr, err)))?;
    let local_addr = listener
        .local_addr()
        .map_err(|err| CliError::Server(err.to_string()))?;
    session.server_listening(local_addr).await;

    if let Some(url) = session.server_url() {
        ui::success(&format!("Development server running at {}", url));
    }
    ui::info("Press Ctrl+C to stop");

    let router = asset_router(config.root.clone());
    let mut server = tokio::spawn(async move {
        if let Err(err) = axum::serve(listener, router).await {
            ui::error(&format!("Server error: {}", err));
        }
    });

    let (_watcher, mut changes) = FileWatcher::new(
        config.watch_dir.clone(),
        config.watch_ignore.clone(),
        config.dedupe_ms,
    )?;

    loop {
        // Single-slot restart timer: each successful rebuild replaces the
        // deadline, so only the quiet end of a burst actually restarts.
        let deadline = session.restart_deadline();

        tokio::select! {
            Some(change) = changes.recv() => {
                ui::info(&format!("File changed: {}", change.path().display()));
                match builder.build().await {
                    Ok(report) => {
                        ui::success(&format!(
                            "Rebuild completed in {}",
                            format_duration(Duration::from_millis(report.duration_ms))
                        ));
                        session.build_succeeded().await;
                    }
                    Err(err) => ui::error(&format!("Rebuild failed: {}", err)),
                }
            }
            _ = tokio::time::sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                session.restart_due().await;
            }
            Some(event) = events.recv() => {
                match event {
                    DevEvent::AppExited { code } => {
                        session.app_closed();
                        ui::info(&format!(
                            "Application closed (exit code {})",
                            code.map_or_else(|| "unknown".to_string(), |c| c.to_string())
                        ));
                        break;
                    }
                }
            }
            _ = signal::ctrl_c() => {
                ui::info("Shutting down development session...");
                break;
            }
            _ = &mut server => {
                ui::warning("Server task ended unexpectedly");
                break;
            }
        }
    }

    // Teardown order: settle the build context, then take down the app and
    // the server.
    builder.dispose().await;
    session.shutdown();
    server.abort();

    ui::success("Development session stopped");
    Ok(())
}
