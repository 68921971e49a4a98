//! HTTP front for the asset handler.
//!
//! Every route falls through to [`kiln_assets::AssetHandler`], which applies
//! the same resolution rules in development as the packaged application's
//! custom scheme does in production: percent-decoding, extensionless route
//! rewriting, SPA fallback, and traversal rejection.

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Uri};
use axum::response::Response;
use axum::Router;
use kiln_assets::{AssetHandler, AssetResponse, DiskReader};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

type SharedAssets = Arc<AssetHandler<DiskReader>>;

/// Build the asset router for a renderer root.
///
/// CORS is wide open; the server is a localhost development convenience, and
/// the embedded page loads from a different origin than the dev server.
pub fn asset_router(root: PathBuf) -> Router {
    let handler: SharedAssets = Arc::new(AssetHandler::new(root, DiskReader));

    Router::new()
        .fallback(serve_asset)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(handler)
}

async fn serve_asset(State(assets): State<SharedAssets>, uri: Uri) -> Response {
    into_response(assets.handle(&uri).await)
}

/// Adapt the handler's response vocabulary to axum's.
fn into_response(asset: AssetResponse) -> Response {
    let builder = Response::builder()
        .status(asset.status)
        .header(header::CONTENT_TYPE, asset.content_type)
        // Dev assets change under the client's feet
        .header(header::CACHE_CONTROL, "no-cache");

    match builder.body(Body::from(asset.body)) {
        Ok(response) => response,
        Err(err) => {
            tracing::error!("failed to assemble asset response: {}", err);
            Response::new(Body::empty())
        }
    }
}
