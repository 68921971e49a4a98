//! The asset handler: one request in, one response out, no exceptions past
//! the boundary.

use crate::mime::mime_for_extension;
use crate::reader::FileReader;
use crate::resolve::resolve;
use http::{StatusCode, Uri};
use path_clean::PathClean;
use std::path::{Path, PathBuf};

/// Response produced by the handler. The CLI adapts this to whatever
/// request/response vocabulary the host server speaks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetResponse {
    /// HTTP-equivalent status
    pub status: StatusCode,
    /// Value for the `content-type` header
    pub content_type: String,
    /// Response body
    pub body: Vec<u8>,
}

impl AssetResponse {
    fn ok(content_type: &str, body: Vec<u8>) -> Self {
        Self {
            status: StatusCode::OK,
            content_type: content_type.to_string(),
            body,
        }
    }

    fn text(status: StatusCode, message: &str) -> Self {
        Self {
            status,
            content_type: "text/plain".to_string(),
            body: message.as_bytes().to_vec(),
        }
    }
}

/// Serves requests on the application scheme from a fixed root directory.
///
/// Every request re-reads from the [`FileReader`]; there is no cache.
pub struct AssetHandler<R> {
    root: PathBuf,
    reader: R,
}

impl<R: FileReader> AssetHandler<R> {
    /// Create a handler serving from `root`. The root should be absolute;
    /// it is normalized on construction.
    pub fn new(root: impl Into<PathBuf>, reader: R) -> Self {
        Self {
            root: root.into().clean(),
            reader,
        }
    }

    /// The serving root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Handle one request.
    ///
    /// Status mapping: 400 for requests that would escape the root, 404 for
    /// missing non-HTML targets, 200 with the root `index.html` for missing
    /// HTML targets (SPA deep links), 200 with table-derived `content-type`
    /// for existing files, 500 for anything unexpected. A rejected request
    /// never reaches the reader.
    pub async fn handle(&self, uri: &Uri) -> AssetResponse {
        let resolution = match resolve(&self.root, uri) {
            Ok(resolution) => resolution,
            Err(err) => {
                tracing::error!("failed to resolve asset request {}: {}", uri, err);
                return AssetResponse::text(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error",
                );
            }
        };

        if !resolution.is_safe {
            return AssetResponse::text(StatusCode::BAD_REQUEST, "Bad Request");
        }

        if !self.reader.exists(&resolution.target).await {
            if resolution.extension == "html" {
                let fallback = self.root.join("index.html");
                return match self.reader.read(&fallback).await {
                    Ok(body) => AssetResponse::ok("text/html", body),
                    Err(err) => {
                        tracing::error!(
                            "failed to read SPA fallback {}: {}",
                            fallback.display(),
                            err
                        );
                        AssetResponse::text(
                            StatusCode::INTERNAL_SERVER_ERROR,
                            "Internal Server Error",
                        )
                    }
                };
            }
            return AssetResponse::text(StatusCode::NOT_FOUND, "Not Found");
        }

        match self.reader.read(&resolution.target).await {
            Ok(body) => AssetResponse::ok(mime_for_extension(&resolution.extension), body),
            Err(err) => {
                tracing::error!(
                    "failed to read asset {}: {}",
                    resolution.target.display(),
                    err
                );
                AssetResponse::text(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
        }
    }
}
