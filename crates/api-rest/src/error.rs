//! Mapping of handler failures to HTTP responses.

use api_shared::{ErrorRes, MessageRes};
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use dxreport_core::SubmissionError;

/// Error returned by the REST handlers.
#[derive(Debug)]
pub enum ApiError {
    /// Missing or malformed client input (400, `{message}`)
    BadRequest(String),
    /// The multipart body could not be read; status comes from the extractor (400 or 413)
    Multipart(MultipartError),
    /// Upload processing failed downstream (500, `{message, error}`)
    Processing(String),
    /// Listing failed downstream (500, `{message, error}`)
    Internal(String),
}

impl ApiError {
    /// Maps an upload failure: validation → 400, anything else → processing error.
    pub fn from_upload(err: SubmissionError) -> Self {
        if err.is_validation() {
            Self::BadRequest(err.to_string())
        } else {
            Self::Processing(err.to_string())
        }
    }

    /// Maps a listing failure.
    pub fn from_listing(err: SubmissionError) -> Self {
        Self::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(MessageRes { message })).into_response()
            }
            ApiError::Multipart(e) => (
                e.status(),
                Json(MessageRes {
                    message: e.body_text(),
                }),
            )
                .into_response(),
            ApiError::Processing(error) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorRes {
                    message: "Error processing report".into(),
                    error,
                }),
            )
                .into_response(),
            ApiError::Internal(error) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorRes {
                    message: "Internal server error".into(),
                    error,
                }),
            )
                .into_response(),
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(e: MultipartError) -> Self {
        Self::Multipart(e)
    }
}
