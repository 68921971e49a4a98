//! Static extension → MIME table for the application scheme.

/// Look up the `content-type` for a file extension.
///
/// The extension is matched lowercase and without the leading dot. Unknown
/// extensions map to `application/octet-stream`.
pub fn mime_for_extension(extension: &str) -> &'static str {
    match extension {
        "js" | "mjs" => "text/javascript",
        "html" => "text/html",
        "css" => "text/css",
        "svg" => "image/svg+xml",
        "json" => "application/json",
        "map" => "application/json",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "ico" => "image/x-icon",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "wasm" => "application/wasm",
        "webp" => "image/webp",
        "avif" => "image/avif",
        "txt" => "text/plain; charset=utf-8",
        "csv" => "text/csv; charset=utf-8",
        _ => "application/octet-stream",
    }
}
