use api_shared::{HealthRes, HealthService};
use axum::extract::State;
use axum::response::Json;

use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
#[axum::debug_handler]
/// Health check endpoint for the REST API
///
/// Used for monitoring and load balancer health checks. Does not touch the store or the
/// summarisation service.
pub async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}
