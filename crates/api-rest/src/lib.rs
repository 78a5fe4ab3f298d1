//! # API REST
//!
//! REST API implementation for DXReport.
//!
//! Handles:
//! - HTTP endpoints with axum (upload, listing, health)
//! - Static serving of stored reports under `/uploads` and of the browser client
//! - OpenAPI documentation at `/api-docs/openapi.json`
//!
//! Uses `api-shared` for wire types and `dxreport-core` for the upload flow.

#![warn(rust_2018_idioms)]

pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::router;
pub use state::{AppState, ServeOptions};

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health,
        handlers::upload::upload_report,
        handlers::submissions::list_submissions,
    ),
    components(schemas(
        api_shared::HealthRes,
        api_shared::UploadReq,
        api_shared::UploadRes,
        api_shared::MessageRes,
        api_shared::ErrorRes,
        api_shared::SubmissionRes,
    ))
)]
pub struct ApiDoc;
