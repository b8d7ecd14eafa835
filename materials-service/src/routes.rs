use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method},
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

use crate::handlers::{download, health, method_not_allowed, preflight, upload};
use crate::AppState;

/// Room for multipart boundaries and the text fields on top of the file itself
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

fn upload_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

fn download_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

pub fn router(state: AppState) -> Router {
    let body_limit = state
        .settings
        .max_upload_bytes
        .saturating_add(FORM_OVERHEAD_BYTES);

    // `get` would also answer HEAD, which these endpoints reject
    let upload_routes = get(upload::list_materials)
        .head(method_not_allowed)
        .post(upload::upload_material)
        .delete(upload::delete_material)
        .options(preflight)
        .fallback(method_not_allowed)
        .layer::<_, std::convert::Infallible>(RequestBodyLimitLayer::new(body_limit))
        .layer(upload_cors());

    let download_routes = get(download::download_material)
        .head(method_not_allowed)
        .options(preflight)
        .fallback(method_not_allowed)
        .layer(download_cors());

    Router::new()
        .route("/health", get(health::health_check))
        .route("/upload", upload_routes)
        .route("/download", download_routes)
        .layer(DefaultBodyLimit::disable())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
