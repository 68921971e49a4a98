//! Development session configuration.
//!
//! CLI flags take precedence over `kiln.config.json`, which takes precedence
//! over `KILN_*` environment variables and the built-in defaults.

use crate::cli::DevArgs;
use crate::error::{ConfigError, Result};
use figment::providers::{Env, Format, Json};
use figment::Figment;
use path_clean::PathClean;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Default dev server port.
pub const DEFAULT_PORT: u16 = 5173;

/// Config file name looked up in the working directory.
pub const CONFIG_FILE: &str = "kiln.config.json";

/// Shape of `kiln.config.json` and `KILN_*` environment overrides.
///
/// The file uses camelCase keys; environment variables arrive snake_cased
/// from figment, so multi-word fields accept both spellings.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct FileConfig {
    root: Option<PathBuf>,
    build: Option<String>,
    artifact: Option<PathBuf>,
    app: Option<PathBuf>,
    watch: Option<PathBuf>,
    port: Option<u16>,
    #[serde(alias = "shim_dir")]
    shim_dir: Option<PathBuf>,
    #[serde(alias = "watch_ignore")]
    watch_ignore: Option<Vec<String>>,
    #[serde(alias = "dedupe_ms")]
    dedupe_ms: Option<u64>,
}

impl FileConfig {
    fn load(cwd: &Path) -> Result<Self> {
        let mut figment = Figment::new();
        let file = cwd.join(CONFIG_FILE);
        if file.exists() {
            figment = figment.merge(Json::file(file));
        }
        figment = figment.merge(Env::prefixed("KILN_"));
        Ok(figment.extract().map_err(ConfigError::Extract)?)
    }
}

/// Fully resolved development session configuration.
///
/// All paths are absolute after resolution, except `app` when it is a bare
/// executable name left for PATH lookup.
#[derive(Debug, Clone)]
pub struct DevConfig {
    /// Working directory for the session
    pub cwd: PathBuf,

    /// Requested server socket address (IP + port)
    pub addr: SocketAddr,

    /// Renderer assets root served over HTTP
    pub root: PathBuf,

    /// Main-process source directory to watch
    pub watch_dir: PathBuf,

    /// Bundled main-process artifact handed to the application
    pub artifact: PathBuf,

    /// Application executable to supervise
    pub app: PathBuf,

    /// Build command, split into program and arguments
    pub build: Vec<String>,

    /// Directory the renderer shims are written to
    pub shim_dir: PathBuf,

    /// Patterns to ignore when watching files
    pub watch_ignore: Vec<String>,

    /// Per-file deduplication window for watch events, in milliseconds
    pub dedupe_ms: u64,
}

impl DevConfig {
    /// Resolve configuration from CLI arguments, the config file, and
    /// environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error when the config file is malformed, no build command
    /// is configured, or no port in the probed range is free.
    pub fn from_args(args: &DevArgs) -> Result<Self> {
        let cwd = match &args.cwd {
            Some(dir) => dir.clone().clean(),
            None => std::env::current_dir()?,
        };

        let file = FileConfig::load(&cwd)?;

        let build_line = args
            .build
            .clone()
            .or(file.build)
            .ok_or_else(|| ConfigError::MissingField {
                field: "build".to_string(),
                hint: format!(
                    "Pass --build \"<command>\" or set \"build\" in {}",
                    CONFIG_FILE
                ),
            })?;
        let build: Vec<String> = build_line.split_whitespace().map(String::from).collect();
        if build.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "build".to_string(),
                value: build_line,
                hint: "The build command must name a program to run".to_string(),
            }
            .into());
        }

        let root = absolutize(
            &cwd,
            args.root
                .clone()
                .or(file.root)
                .unwrap_or_else(|| PathBuf::from("dist")),
        );
        let watch_dir = absolutize(
            &cwd,
            args.watch
                .clone()
                .or(file.watch)
                .unwrap_or_else(|| PathBuf::from("src/main")),
        );
        let artifact = absolutize(
            &cwd,
            args.artifact
                .clone()
                .or(file.artifact)
                .unwrap_or_else(|| PathBuf::from("dist/main.js")),
        );
        let shim_dir = absolutize(
            &cwd,
            file.shim_dir
                .unwrap_or_else(|| PathBuf::from(".kiln/shims")),
        );

        // Bare names stay bare for PATH lookup; paths get anchored to cwd
        let app = args
            .app
            .clone()
            .or(file.app)
            .unwrap_or_else(|| PathBuf::from("electron"));
        let app = if app.components().count() > 1 || app.is_absolute() {
            absolutize(&cwd, app)
        } else {
            app
        };

        let port = args.port.or(file.port).unwrap_or(DEFAULT_PORT);
        let addr = find_available_port(port)?;

        let watch_ignore = file.watch_ignore.unwrap_or_else(|| {
            vec![
                "node_modules".to_string(),
                ".git".to_string(),
                "dist".to_string(),
                "build".to_string(),
                "target".to_string(),
                "*.log".to_string(),
                ".DS_Store".to_string(),
            ]
        });

        Ok(Self {
            cwd,
            addr,
            root,
            watch_dir,
            artifact,
            app,
            build,
            shim_dir,
            watch_ignore,
            dedupe_ms: file.dedupe_ms.unwrap_or(100),
        })
    }

    /// Validate the resolved configuration against the filesystem.
    ///
    /// # Errors
    ///
    /// Returns an error when the working directory, renderer root, or watch
    /// directory is missing.
    pub fn validate(&self) -> Result<()> {
        if !self.cwd.is_dir() {
            return Err(ConfigError::InvalidValue {
                field: "cwd".to_string(),
                value: self.cwd.display().to_string(),
                hint: "Working directory does not exist".to_string(),
            }
            .into());
        }

        if !self.root.is_dir() {
            return Err(ConfigError::InvalidValue {
                field: "root".to_string(),
                value: self.root.display().to_string(),
                hint: "Build the renderer first or pass --root <dir>".to_string(),
            }
            .into());
        }

        if !self.watch_dir.is_dir() {
            return Err(ConfigError::InvalidValue {
                field: "watch".to_string(),
                value: self.watch_dir.display().to_string(),
                hint: "Point --watch at the main-process source directory".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

/// Anchor a possibly relative path to `cwd` and normalize it.
pub(crate) fn absolutize(cwd: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path.clean()
    } else {
        cwd.join(path).clean()
    }
}

/// Find an available port starting from the requested port.
///
/// Tries the requested port first, then incrementally searches for the next
/// available port (up to +10 from the original).
pub(crate) fn find_available_port(requested_port: u16) -> Result<SocketAddr> {
    use std::net::TcpListener;

    if requested_port < 1024 {
        crate::ui::warning(&format!(
            "Port {} is in privileged range, may require root access",
            requested_port
        ));
    }

    let addr = SocketAddr::from(([127, 0, 0, 1], requested_port));
    if TcpListener::bind(addr).is_ok() {
        return Ok(addr);
    }

    for offset in 1..=10 {
        let port = requested_port.saturating_add(offset);
        let addr = SocketAddr::from(([127, 0, 0, 1], port));
        if TcpListener::bind(addr).is_ok() {
            crate::ui::warning(&format!(
                "Port {} is busy, using port {} instead",
                requested_port, port
            ));
            return Ok(addr);
        }
    }

    Err(ConfigError::InvalidValue {
        field: "port".to_string(),
        value: requested_port.to_string(),
        hint: format!(
            "Ports {}-{} are all in use. Try a different port range.",
            requested_port,
            requested_port + 10
        ),
    }
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::DevArgs;
    use std::net::TcpListener;

    fn args_in(temp: &tempfile::TempDir) -> DevArgs {
        DevArgs {
            cwd: Some(temp.path().to_path_buf()),
            ..DevArgs::default()
        }
    }

    #[test]
    fn test_missing_build_command_is_an_error() {
        let temp = tempfile::TempDir::new().unwrap();
        let err = DevConfig::from_args(&args_in(&temp)).unwrap_err();
        assert!(err.to_string().contains("build"));
    }

    #[test]
    fn test_cli_flags_override_defaults() {
        let temp = tempfile::TempDir::new().unwrap();
        let mut args = args_in(&temp);
        args.build = Some("esbuild src/main.ts --bundle".to_string());
        args.root = Some(PathBuf::from("renderer/out"));

        let config = DevConfig::from_args(&args).unwrap();
        assert_eq!(config.build[0], "esbuild");
        assert_eq!(config.build.len(), 3);
        assert_eq!(config.root, temp.path().join("renderer/out"));
        assert_eq!(config.artifact, temp.path().join("dist/main.js"));
        assert_eq!(config.app, PathBuf::from("electron"));
    }

    #[test]
    fn test_config_file_fills_in_missing_values() {
        let temp = tempfile::TempDir::new().unwrap();
        std::fs::write(
            temp.path().join(CONFIG_FILE),
            r#"{
                "build": "tsc -p tsconfig.main.json",
                "watch": "electron/main",
                "dedupeMs": 250
            }"#,
        )
        .unwrap();

        let config = DevConfig::from_args(&args_in(&temp)).unwrap();
        assert_eq!(config.build, vec!["tsc", "-p", "tsconfig.main.json"]);
        assert_eq!(config.watch_dir, temp.path().join("electron/main"));
        assert_eq!(config.dedupe_ms, 250);
    }

    #[test]
    fn test_cli_build_wins_over_config_file() {
        let temp = tempfile::TempDir::new().unwrap();
        std::fs::write(
            temp.path().join(CONFIG_FILE),
            r#"{ "build": "tsc -p tsconfig.main.json" }"#,
        )
        .unwrap();

        let mut args = args_in(&temp);
        args.build = Some("esbuild main.ts".to_string());

        let config = DevConfig::from_args(&args).unwrap();
        assert_eq!(config.build[0], "esbuild");
    }

    #[test]
    fn test_relative_app_path_is_anchored_to_cwd() {
        let temp = tempfile::TempDir::new().unwrap();
        let mut args = args_in(&temp);
        args.build = Some("true".to_string());
        args.app = Some(PathBuf::from("node_modules/.bin/electron"));

        let config = DevConfig::from_args(&args).unwrap();
        assert_eq!(config.app, temp.path().join("node_modules/.bin/electron"));
    }

    #[test]
    fn test_validate_requires_renderer_root() {
        let temp = tempfile::TempDir::new().unwrap();
        let mut args = args_in(&temp);
        args.build = Some("true".to_string());

        let config = DevConfig::from_args(&args).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("root"));
    }

    #[test]
    fn test_validate_accepts_complete_layout() {
        let temp = tempfile::TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("dist")).unwrap();
        std::fs::create_dir_all(temp.path().join("src/main")).unwrap();

        let mut args = args_in(&temp);
        args.build = Some("true".to_string());

        let config = DevConfig::from_args(&args).unwrap();
        config.validate().unwrap();
    }

    #[test]
    fn test_find_available_port_success() {
        let listener = match TcpListener::bind(("127.0.0.1", 0)) {
            Ok(listener) => listener,
            Err(err) => {
                eprintln!(
                    "Skipping test_find_available_port_success: unable to bind socket ({})",
                    err
                );
                return;
            }
        };

        let start_port = listener.local_addr().unwrap().port();
        drop(listener);

        let addr = find_available_port(start_port).expect("should find port");
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert!(addr.port() >= start_port);
    }

    #[test]
    fn test_absolutize() {
        let cwd = Path::new("/work/project");
        assert_eq!(
            absolutize(cwd, PathBuf::from("dist")),
            PathBuf::from("/work/project/dist")
        );
        assert_eq!(
            absolutize(cwd, PathBuf::from("/abs/dist")),
            PathBuf::from("/abs/dist")
        );
        assert_eq!(
            absolutize(cwd, PathBuf::from("./dist/../out")),
            PathBuf::from("/work/project/out")
        );
    }
}
