//! Request resolution against the serving root.
//!
//! Turns an incoming URI into an absolute target path plus a safety verdict.
//! URI parsers fold the first path segment of `app://assets/app.js` into the
//! authority, so the host and path are recomposed before resolution.

use http::Uri;
use path_clean::PathClean;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Resolution failure. Only malformed percent-encoding ends up here;
/// traversal attempts are a verdict ([`Resolution::is_safe`]), not an error.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Percent-decoded bytes were not valid UTF-8
    #[error("failed to percent-decode request path: {0}")]
    Decode(#[from] std::string::FromUtf8Error),
}

/// Outcome of resolving one request URI. Computed per request and discarded
/// once the response is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Authority component of the request URI (may be a path segment)
    pub host: String,
    /// Decoded path relative to the serving root, after route rewriting
    pub pathname: String,
    /// Lowercased extension without the dot; `html` after a route rewrite
    pub extension: String,
    /// Absolute path of the resolution target
    pub target: PathBuf,
    /// Whether the target stays inside the serving root
    pub is_safe: bool,
}

/// Resolve a request URI against the serving root.
///
/// Algorithm:
///
/// 1. Recompose `host` + `path`, strip one leading separator, percent-decode.
/// 2. Check the decoded path for root escape. This happens before any route
///    rewriting so a traversal-shaped request can never be laundered into an
///    `index.html` rewrite.
/// 3. No extension means a client-side route: rewrite to `index.html`.
/// 4. Join onto the root and normalize. The target is safe only if the path
///    relative to the root is non-empty, does not start with a
///    parent-directory token, and is not absolute; normalization reduces the
///    latter two to a prefix check.
pub fn resolve(root: &Path, uri: &Uri) -> Result<Resolution, ResolveError> {
    let root = root.to_path_buf().clean();

    let host = uri.host().unwrap_or("").to_string();
    let composed = format!("{}{}", host, uri.path());
    let composed = composed.strip_prefix('/').unwrap_or(&composed);

    let mut pathname = urlencoding::decode(composed)?.into_owned();

    // Escape check on the raw path. An empty relative result is tolerated
    // here (the route rewrite below turns it into index.html); only leaving
    // the root is fatal.
    let escaped = !pathname.is_empty() && {
        let raw_target = root.join(&pathname).clean();
        raw_target.strip_prefix(&root).is_err()
    };

    let mut extension = extension_of(&pathname);
    if extension.is_empty() {
        pathname = "index.html".to_string();
        extension = "html".to_string();
    }

    let target = root.join(&pathname).clean();
    let is_safe = !escaped
        && match target.strip_prefix(&root) {
            Ok(relative) => !relative.as_os_str().is_empty(),
            Err(_) => false,
        };

    Ok(Resolution {
        host,
        pathname,
        extension,
        target,
        is_safe,
    })
}

/// Lowercased extension of a request path, without the dot. Empty when the
/// path has none.
fn extension_of(pathname: &str) -> String {
    Path::new(pathname)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve_str(root: &str, uri: &str) -> Resolution {
        let uri: Uri = uri.parse().expect("test uri should parse");
        resolve(Path::new(root), &uri).expect("resolution should succeed")
    }

    #[test]
    fn test_host_segment_is_preserved() {
        let res = resolve_str("/srv/app", "app://assets/app.js");
        assert_eq!(res.host, "assets");
        assert_eq!(res.pathname, "assets/app.js");
        assert_eq!(res.extension, "js");
        assert_eq!(res.target, PathBuf::from("/srv/app/assets/app.js"));
        assert!(res.is_safe);
    }

    #[test]
    fn test_bare_host_maps_to_root_file() {
        let res = resolve_str("/srv/app", "app://index.html");
        assert_eq!(res.pathname, "index.html");
        assert_eq!(res.target, PathBuf::from("/srv/app/index.html"));
        assert!(res.is_safe);
    }

    #[test]
    fn test_extensionless_route_rewrites_to_index() {
        let res = resolve_str("/srv/app", "app://some/spa/route");
        assert_eq!(res.pathname, "index.html");
        assert_eq!(res.extension, "html");
        assert!(res.is_safe);
    }

    #[test]
    fn test_empty_request_rewrites_to_index() {
        let res = resolve_str("/srv/app", "app://");
        assert_eq!(res.pathname, "index.html");
        assert!(res.is_safe);
    }

    #[test]
    fn test_parent_traversal_is_unsafe() {
        let res = resolve_str("/srv/app", "app://../../etc/passwd");
        assert!(!res.is_safe);
    }

    #[test]
    fn test_traversal_with_extension_is_unsafe() {
        let res = resolve_str("/srv/app", "app://../secrets.json");
        assert!(!res.is_safe);
    }

    #[test]
    fn test_encoded_traversal_is_unsafe() {
        let res = resolve_str("/srv/app", "app://assets/%2e%2e/%2e%2e/etc/passwd");
        assert!(!res.is_safe);
    }

    #[test]
    fn test_traversal_inside_root_stays_safe() {
        // Climbing and descending again never leaves the root
        let res = resolve_str("/srv/app", "app://assets/../index.html");
        assert_eq!(res.target, PathBuf::from("/srv/app/index.html"));
        assert!(res.is_safe);
    }

    #[test]
    fn test_path_collapsing_to_root_becomes_index() {
        let res = resolve_str("/srv/app", "app://assets/..");
        assert_eq!(res.pathname, "index.html");
        assert!(res.is_safe);
    }

    #[test]
    fn test_percent_decoding() {
        let res = resolve_str("/srv/app", "app://assets/space%20name.txt");
        assert_eq!(res.pathname, "assets/space name.txt");
        assert_eq!(res.extension, "txt");
        assert!(res.is_safe);
    }

    #[test]
    fn test_invalid_percent_encoding_is_an_error() {
        let uri: Uri = "app://assets/bad%FF.js".parse().unwrap();
        assert!(resolve(Path::new("/srv/app"), &uri).is_err());
    }

    #[test]
    fn test_extension_is_lowercased() {
        let res = resolve_str("/srv/app", "app://logo.PNG");
        assert_eq!(res.extension, "png");
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("index.html"), "html");
        assert_eq!(extension_of("assets/app.js"), "js");
        assert_eq!(extension_of("archive.tar.gz"), "gz");
        assert_eq!(extension_of("route/about"), "");
        assert_eq!(extension_of(""), "");
    }
}
