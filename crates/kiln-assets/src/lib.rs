//! Asset handler for a custom application scheme.
//!
//! Desktop shells that load their renderer over a private scheme
//! (`app://...`) need a request handler that maps URIs onto files under a
//! fixed serving root. This crate implements that handler:
//!
//! - URIs are resolved against a serving root and may never escape it
//!   (traversal-shaped requests answer 400 without touching the disk)
//! - extensionless paths are treated as client-side routes and rewritten to
//!   `index.html`
//! - missing `.html` targets fall back to the root `index.html` so deep
//!   links into a single-page app keep working
//! - content types come from a static extension table, defaulting to
//!   `application/octet-stream`
//! - every request re-reads from the source; there is no caching layer
//!
//! File access goes through the [`FileReader`] capability so the handler can
//! be driven by an in-memory tree in tests. The handler itself never returns
//! an error: unexpected failures become 500 responses because the host
//! runtime has no other recovery path for the request.

pub mod handler;
pub mod mime;
pub mod reader;
pub mod resolve;

pub use handler::{AssetHandler, AssetResponse};
pub use mime::mime_for_extension;
pub use reader::{DiskReader, FileReader, MemoryReader};
pub use resolve::{resolve, Resolution, ResolveError};
