//! Submission records.
//!
//! A submission is one uploaded report, its generated summary, and the patient metadata the
//! center supplied with it. Records are created once per successful upload and never updated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A submission that has been persisted and assigned an identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    /// Identifier generated by the store (32 hex characters)
    pub id: String,
    pub center_id: String,
    pub patient_name: String,
    pub phone_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Stored path of the uploaded original, e.g. `uploads/report-...txt`
    pub original_report_url: String,
    /// Stored path of the generated summary; absent until summarisation completes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub simplified_report_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A submission ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubmission {
    /// Center identifier exactly as submitted; listing matches on this value
    pub center_id: String,
    pub patient_name: String,
    pub phone_number: String,
    pub email: Option<String>,
    pub original_report_url: String,
    pub simplified_report_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl NewSubmission {
    /// Attaches a store-generated identifier.
    pub fn into_submission(self, id: String) -> Submission {
        Submission {
            id,
            center_id: self.center_id,
            patient_name: self.patient_name,
            phone_number: self.phone_number,
            email: self.email,
            original_report_url: self.original_report_url,
            simplified_report_url: self.simplified_report_url,
            created_at: self.created_at,
        }
    }
}

/// Generates a new submission identifier.
pub(crate) fn new_submission_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
