use api_shared::{ErrorRes, MessageRes, UploadReq, UploadRes};
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::Json;
use dxreport_core::{UploadForm, UploadedReport};

use crate::error::ApiError;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/upload",
    request_body(content = UploadReq, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Report stored and summarised", body = UploadRes),
        (status = 400, description = "Missing center_id or report file", body = MessageRes),
        (status = 413, description = "Request body too large", body = MessageRes),
        (status = 500, description = "Error processing report", body = ErrorRes)
    )
)]
#[axum::debug_handler]
/// Upload a diagnostic report
///
/// Stores the report file, asks the summariser for a plain-language analysis, stores that
/// analysis next to it, and records the submission. Both stored files are then reachable
/// under `/uploads`.
///
/// Unknown form fields are ignored. A `report` part only counts as a file when it carries a
/// file name; when several are sent, the first wins.
///
/// # Returns
/// * `Ok((StatusCode::CREATED, Json<UploadRes>))` - Relative URLs of both stored files
/// * `Err(ApiError)` - 400 on missing input, 500 if any processing step fails
pub async fn upload_report(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<UploadRes>), ApiError> {
    let form = read_upload_form(multipart).await.map_err(|e| {
        tracing::warn!("Upload rejected, unreadable multipart body: {:?}", e);
        e
    })?;

    match state.submissions.process_upload(form).await {
        Ok(record) => Ok((
            StatusCode::CREATED,
            Json(UploadRes {
                message: "Uploaded successfully".into(),
                original_report_url: record.original_report_url,
                simplified_report_url: record.simplified_report_url.unwrap_or_default(),
            }),
        )),
        Err(e) if e.is_validation() => {
            tracing::warn!("Upload rejected: {}", e);
            Err(ApiError::from_upload(e))
        }
        Err(e) => {
            tracing::error!("Upload error: {:?}", e);
            Err(ApiError::from_upload(e))
        }
    }
}

/// Collects the known fields of an upload form.
async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, ApiError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "report" => match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let bytes = field.bytes().await?;
                    if form.report.is_none() {
                        form.report = Some(UploadedReport {
                            file_name: Some(file_name),
                            bytes: bytes.to_vec(),
                        });
                    }
                }
                None => tracing::debug!("ignoring report part without a file name"),
            },
            "center_id" => form.center_id = Some(field.text().await?),
            "patient_name" => form.patient_name = Some(field.text().await?),
            "phone_number" => form.phone_number = Some(field.text().await?),
            "email" => form.email = Some(field.text().await?),
            other => tracing::debug!("ignoring form field {:?}", other),
        }
    }

    Ok(form)
}
