use axum::extract::DefaultBodyLimit;
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use dxreport_core::files::PUBLIC_PREFIX;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::handlers::{health::health, submissions::list_submissions, upload::upload_report};
use crate::state::{AppState, ServeOptions};
use crate::ApiDoc;

/// Builds the REST router.
///
/// Stored reports are served read-only from `options.upload_dir` under `/<PUBLIC_PREFIX>`,
/// the same prefix the blob store puts in returned paths. When a frontend directory is
/// configured it answers every path no route claims.
pub fn router(state: AppState, options: &ServeOptions) -> Router {
    let mut app = Router::new()
        .route("/health", get(health))
        .route("/upload", post(upload_report))
        .route("/submissions", get(list_submissions))
        .route("/api-docs/openapi.json", get(openapi_json))
        .nest_service(
            &format!("/{}", PUBLIC_PREFIX),
            ServeDir::new(&options.upload_dir),
        );

    if let Some(frontend_dir) = &options.frontend_dir {
        app = app.fallback_service(ServeDir::new(frontend_dir));
    }

    app.layer(DefaultBodyLimit::max(options.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
