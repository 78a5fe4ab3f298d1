//! Request and response bodies of the HTTP API.
//!
//! Field names match what the browser client reads, so renaming any of them is a breaking
//! change.

use chrono::SecondsFormat;
use dxreport_core::Submission;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Health check response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Multipart form accepted by `POST /upload` (documentation only; parsed field by field).
#[derive(Debug, Clone, ToSchema)]
pub struct UploadReq {
    /// The report file
    #[schema(value_type = String, format = Binary)]
    pub report: Vec<u8>,
    #[schema(example = "Center 1")]
    pub center_id: String,
    pub patient_name: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
}

/// Successful upload (201).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UploadRes {
    #[schema(example = "Uploaded successfully")]
    pub message: String,
    #[schema(example = "uploads/report-1700000000000-482913377.txt")]
    pub original_report_url: String,
    #[schema(example = "uploads/simplified_report_1700000000123.txt")]
    pub simplified_report_url: String,
}

/// Client error (400) carrying only a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageRes {
    #[schema(example = "center_id is required")]
    pub message: String,
}

/// Server error (500) with a summary message and the failure text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    #[schema(example = "Error processing report")]
    pub message: String,
    pub error: String,
}

/// One submission record as returned by `GET /submissions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SubmissionRes {
    pub id: String,
    #[schema(example = "Center 1")]
    pub center_id: String,
    pub patient_name: String,
    pub phone_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub original_report_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub simplified_report_url: Option<String>,
    /// RFC 3339 creation time
    pub created_at: String,
}

impl From<Submission> for SubmissionRes {
    fn from(s: Submission) -> Self {
        Self {
            id: s.id,
            center_id: s.center_id,
            patient_name: s.patient_name,
            phone_number: s.phone_number,
            email: s.email,
            original_report_url: s.original_report_url,
            simplified_report_url: s.simplified_report_url,
            created_at: s.created_at.to_rfc3339_opts(SecondsFormat::AutoSi, true),
        }
    }
}
