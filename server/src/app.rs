use std::path::{Path, PathBuf};

use axum::{
    Json, Router,
    extract::{Request, State},
    http::{HeaderValue, header},
    middleware::{self, Next},
    response::Response,
};
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;

const IMMUTABLE_CACHE: &str = "public, max-age=31536000, immutable";

#[derive(Clone, Debug)]
pub(crate) struct StaticSettings {
    pub dir: PathBuf,
    pub asset_max_age_secs: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CachePolicy {
    /// Content-hashed bundle output.
    Immutable,
    /// Province raster and tiles: stable for a deploy, refreshed daily by default.
    MapData,
}

pub(crate) fn build_app(settings: StaticSettings) -> Router {
    let static_assets = Router::new()
        .fallback_service(
            ServeDir::new(&settings.dir)
                .precompressed_br()
                .precompressed_gzip(),
        )
        .layer(middleware::from_fn_with_state(
            settings.asset_max_age_secs,
            set_static_cache_control,
        ));

    Router::new()
        .route("/api/health", axum::routing::get(health))
        .fallback_service(static_assets)
        .layer(CompressionLayer::new())
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn set_static_cache_control(
    State(asset_max_age_secs): State<u64>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_owned();
    let mut response = next.run(request).await;

    if response.status().is_success()
        && let Some(policy) = cache_policy_for_path(&path)
    {
        let value = match policy {
            CachePolicy::Immutable => HeaderValue::from_static(IMMUTABLE_CACHE),
            CachePolicy::MapData => map_data_cache_header(asset_max_age_secs),
        };
        response.headers_mut().insert(header::CACHE_CONTROL, value);
    }

    response
}

fn map_data_cache_header(max_age_secs: u64) -> HeaderValue {
    HeaderValue::from_str(&format!("public, max-age={max_age_secs}"))
        .unwrap_or_else(|_| HeaderValue::from_static("no-cache"))
}

fn cache_policy_for_path(path: &str) -> Option<CachePolicy> {
    if is_hashed_bundle_asset(path) {
        return Some(CachePolicy::Immutable);
    }

    if path.starts_with("/tiles/") || path == "/provinces.json" {
        return Some(CachePolicy::MapData);
    }

    None
}

fn is_hashed_bundle_asset(path: &str) -> bool {
    let Some(ext) = Path::new(path).extension().and_then(|ext| ext.to_str()) else {
        return false;
    };

    if !matches!(ext, "wasm" | "js" | "css") {
        return false;
    }

    let Some(filename) = Path::new(path).file_name().and_then(|name| name.to_str()) else {
        return false;
    };

    filename
        .split(['-', '_', '.'])
        .any(|segment| segment.len() >= 8 && segment.chars().all(|c| c.is_ascii_hexdigit()))
}
