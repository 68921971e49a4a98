use clap::{Args, Subcommand};
use std::path::PathBuf;

/// Available Kiln subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start a development session
    ///
    /// Serves renderer assets, watches main-process sources, rebuilds on
    /// change, and restarts the application after each successful rebuild.
    Dev(DevArgs),

    /// Preview a packaged renderer root
    ///
    /// Serves a built renderer directory over HTTP with the same resolution
    /// rules the packaged application uses.
    Serve(ServeArgs),
}

/// Arguments for the dev command
#[derive(Args, Debug, Default)]
pub struct DevArgs {
    /// Renderer assets root served by the dev server
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Bundler command for the main process
    ///
    /// The whole command line, quoted. Example:
    ///   kiln dev --build "esbuild src/main/main.ts --bundle --outfile=dist/main.js"
    #[arg(short, long, value_name = "CMD")]
    pub build: Option<String>,

    /// Bundled main-process artifact handed to the application
    #[arg(long, value_name = "FILE")]
    pub artifact: Option<PathBuf>,

    /// Application executable to supervise
    ///
    /// A bare name is looked up on PATH; anything with a path separator is
    /// resolved relative to the working directory.
    #[arg(long, value_name = "PATH")]
    pub app: Option<PathBuf>,

    /// Directory of main-process sources to watch for rebuilds
    #[arg(long, value_name = "DIR")]
    pub watch: Option<PathBuf>,

    /// Port for the dev server
    #[arg(short, long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Working directory for the session
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,
}

/// Arguments for the serve command
#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Packaged renderer root to serve
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Working directory
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,
}
