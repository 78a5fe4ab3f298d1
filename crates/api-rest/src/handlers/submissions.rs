use api_shared::{ErrorRes, SubmissionRes};
use axum::extract::{Query, State};
use axum::response::Json;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::error::ApiError;
use crate::state::AppState;

/// Query string accepted by `GET /submissions`.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListSubmissionsQuery {
    /// Center whose submissions to return; compared exactly, case-sensitive
    #[param(example = "Center 1")]
    pub center_id: Option<String>,
}

#[utoipa::path(
    get,
    path = "/submissions",
    params(ListSubmissionsQuery),
    responses(
        (status = 200, description = "Submissions of the center, oldest first", body = [SubmissionRes]),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
#[axum::debug_handler]
/// List the submissions of one center
///
/// Records are returned in insertion order. A center with no submissions yields an empty
/// array; without `center_id` every record is returned.
///
/// # Returns
/// * `Ok(Json<Vec<SubmissionRes>>)` - Matching records
/// * `Err(ApiError)` - 500 if the store query fails
pub async fn list_submissions(
    State(state): State<AppState>,
    Query(query): Query<ListSubmissionsQuery>,
) -> Result<Json<Vec<SubmissionRes>>, ApiError> {
    match state.submissions.list_for_center(query.center_id).await {
        Ok(records) => Ok(Json(records.into_iter().map(SubmissionRes::from).collect())),
        Err(e) => {
            tracing::error!("List submissions error: {:?}", e);
            Err(ApiError::from_listing(e))
        }
    }
}
