//! Serve command: preview a packaged renderer root.
//!
//! Binds a local HTTP server over the asset router so a packaged build can
//! be inspected in a browser with exactly the resolution rules the
//! application's custom scheme applies.

use crate::cli::ServeArgs;
use crate::dev::config::{absolutize, find_available_port, DEFAULT_PORT};
use crate::error::{CliError, ConfigError, Result};
use crate::server::asset_router;
use crate::ui;
use std::path::PathBuf;
use tokio::net::TcpListener;

/// Execute the serve command.
///
/// # Errors
///
/// Returns an error when the root is missing or the server cannot bind.
pub async fn execute(args: ServeArgs) -> Result<()> {
    let cwd = match &args.cwd {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()?,
    };
    let root = absolutize(&cwd, args.root.unwrap_or_else(|| PathBuf::from("dist")));

    if !root.is_dir() {
        return Err(ConfigError::InvalidValue {
            field: "root".to_string(),
            value: root.display().to_string(),
            hint: "Build the renderer first or pass --root <dir>".to_string(),
        }
        .into());
    }
    if !root.join("index.html").is_file() {
        ui::warning(&format!(
            "No index.html in {}; SPA routes will fail",
            root.display()
        ));
    }

    let addr = find_available_port(args.port.unwrap_or(DEFAULT_PORT))?;
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|err| CliError::Server(format!("Failed to bind to {}: {}", addr, err)))?;
    let local_addr = listener
        .local_addr()
        .map_err(|err| CliError::Server(err.to_string()))?;

    ui::success(&format!("Preview server running at http://{}", local_addr));
    ui::info(&format!("Serving {}", root.display()));
    ui::info("Press Ctrl+C to stop");

    axum::serve(listener, asset_router(root))
        .await
        .map_err(|err| CliError::Server(err.to_string()))?;

    Ok(())
}
