//! File system watcher with per-file deduplication for development mode.
//!
//! Watches the main-process source directory and filters changes to relevant
//! files, ignoring build artifacts, hidden paths, and configured patterns.

use crate::error::{CliError, Result};
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// File change event type.
#[derive(Debug, Clone)]
pub enum FileChange {
    /// File was modified
    Modified(PathBuf),
    /// File was created
    Created(PathBuf),
    /// File was removed
    Removed(PathBuf),
}

impl FileChange {
    /// Get the path affected by this change.
    pub fn path(&self) -> &Path {
        match self {
            FileChange::Modified(p) | FileChange::Created(p) | FileChange::Removed(p) => p,
        }
    }
}

/// Recursive directory watcher feeding a channel of [`FileChange`] events.
///
/// Editors fire several raw events per save; a per-file deduplication window
/// collapses them so one save produces one rebuild trigger.
pub struct FileWatcher {
    /// Underlying notify watcher; kept alive for the watch duration
    _watcher: RecommendedWatcher,
    /// Root directory being watched
    root: PathBuf,
}

impl FileWatcher {
    /// Create a new file watcher.
    ///
    /// # Arguments
    ///
    /// * `root` - Root directory to watch recursively
    /// * `ignore_patterns` - Patterns to ignore (directory names or `*.ext`)
    /// * `dedupe_ms` - Per-file deduplication window in milliseconds
    ///
    /// # Returns
    ///
    /// Tuple of (FileWatcher, receiver for change events)
    ///
    /// # Errors
    ///
    /// Returns an error if the directory doesn't exist or the watcher cannot
    /// be created.
    pub fn new(
        root: PathBuf,
        ignore_patterns: Vec<String>,
        dedupe_ms: u64,
    ) -> Result<(Self, mpsc::Receiver<FileChange>)> {
        if !root.is_dir() {
            return Err(CliError::FileNotFound(root));
        }

        let (tx, rx) = mpsc::channel(100);

        let window = Duration::from_millis(dedupe_ms);
        let mut recent: HashMap<PathBuf, Instant> = HashMap::new();
        let watch_root = root.clone();

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let event = match res {
                Ok(event) => event,
                Err(err) => {
                    tracing::warn!("file watcher error: {}", err);
                    return;
                }
            };

            for path in &event.paths {
                if should_ignore(path, &watch_root, &ignore_patterns) {
                    continue;
                }

                // One save can fire several raw events for the same file;
                // collapse repeats inside the window.
                let now = Instant::now();
                if let Some(seen) = recent.get(path) {
                    if now.duration_since(*seen) < window {
                        continue;
                    }
                }
                recent.insert(path.clone(), now);
                recent.retain(|_, seen| now.duration_since(*seen) < window);

                let change = match event.kind {
                    notify::EventKind::Create(_) => FileChange::Created(path.clone()),
                    notify::EventKind::Modify(_) => FileChange::Modified(path.clone()),
                    notify::EventKind::Remove(_) => FileChange::Removed(path.clone()),
                    _ => continue,
                };

                let _ = tx.blocking_send(change);
            }
        })
        .map_err(CliError::Watch)?;

        watcher
            .watch(&root, RecursiveMode::Recursive)
            .map_err(CliError::Watch)?;

        Ok((
            Self {
                _watcher: watcher,
                root,
            },
            rx,
        ))
    }

    /// Get the root directory being watched.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Check whether a change at `path` should be dropped.
///
/// Paths outside the watch root, hidden components, and anything matching an
/// ignore pattern (a directory name or a `*.ext` suffix) are dropped.
fn should_ignore(path: &Path, root: &Path, ignore_patterns: &[String]) -> bool {
    let rel_path = match path.strip_prefix(root) {
        Ok(p) => p,
        Err(_) => return true,
    };

    let path_str = rel_path.to_string_lossy();

    for pattern in ignore_patterns {
        if let Some(suffix) = pattern.strip_prefix('*') {
            if path_str.ends_with(suffix) {
                return true;
            }
        } else if path_str.starts_with(pattern.as_str())
            || path_str.contains(&format!("/{}", pattern))
        {
            return true;
        }
    }

    rel_path.components().any(|component| {
        component
            .as_os_str()
            .to_str()
            .is_some_and(|name| name.starts_with('.') && name != "." && name != "..")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_ignore_directory_pattern() {
        let root = PathBuf::from("/project");
        let patterns = vec!["node_modules".to_string()];

        let path = PathBuf::from("/project/node_modules/package/index.js");
        assert!(should_ignore(&path, &root, &patterns));

        let path = PathBuf::from("/project/src/main.ts");
        assert!(!should_ignore(&path, &root, &patterns));
    }

    #[test]
    fn test_should_ignore_extension_pattern() {
        let root = PathBuf::from("/project");
        let patterns = vec!["*.log".to_string()];

        assert!(should_ignore(
            &PathBuf::from("/project/debug.log"),
            &root,
            &patterns
        ));
        assert!(!should_ignore(
            &PathBuf::from("/project/src/main.ts"),
            &root,
            &patterns
        ));
    }

    #[test]
    fn test_should_ignore_hidden_paths() {
        let root = PathBuf::from("/project");
        let patterns = vec![];

        assert!(should_ignore(
            &PathBuf::from("/project/.git/config"),
            &root,
            &patterns
        ));
        assert!(should_ignore(
            &PathBuf::from("/project/src/.cache/file.ts"),
            &root,
            &patterns
        ));
    }

    #[test]
    fn test_should_ignore_outside_root() {
        let root = PathBuf::from("/project");
        assert!(should_ignore(&PathBuf::from("/other/file.ts"), &root, &[]));
    }

    #[test]
    fn test_file_change_path() {
        let path = PathBuf::from("/project/src/main.ts");

        assert_eq!(FileChange::Modified(path.clone()).path(), path.as_path());
        assert_eq!(FileChange::Created(path.clone()).path(), path.as_path());
        assert_eq!(FileChange::Removed(path.clone()).path(), path.as_path());
    }

    #[tokio::test]
    async fn test_watcher_rejects_missing_directory() {
        let result = FileWatcher::new(PathBuf::from("/definitely/not/a/dir"), vec![], 100);
        assert!(matches!(result, Err(CliError::FileNotFound(_))));
    }

    #[tokio::test]
    async fn test_watcher_reports_changes() {
        let temp = tempfile::TempDir::new().unwrap();
        let (watcher, mut rx) = FileWatcher::new(temp.path().to_path_buf(), vec![], 50).unwrap();
        assert_eq!(watcher.root(), temp.path());

        std::fs::write(temp.path().join("main.ts"), "export {}").unwrap();

        let change = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("watcher should report the change")
            .expect("channel should stay open");
        assert!(change.path().ends_with("main.ts"));
    }
}
