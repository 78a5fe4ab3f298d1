//! # DXReport Core
//!
//! Core business logic for the DXReport diagnostic report simplifier.
//!
//! This crate contains the data model and the upload/listing operations:
//! - Submission records and the [`store::SubmissionStore`] that persists them
//! - The [`summariser::Summariser`] capability and its OpenAI-compatible client
//! - [`SubmissionService`], which runs upload → summarise → persist
//! - Configuration resolved once at startup ([`CoreConfig`])
//!
//! **No API concerns**: HTTP routing, multipart parsing, and response shapes belong in
//! `api-rest` and `api-shared`.

pub mod config;
pub mod constants;
pub mod error;
pub mod service;
pub mod store;
pub mod submission;
pub mod summariser;

pub use config::{CoreConfig, OpenAiConfig};
pub use error::{
    CoreError, CoreResult, StoreError, StoreResult, SubmissionError, SubmissionResult,
    SummariseError,
};
pub use service::{SubmissionService, UploadForm, UploadedReport};
pub use submission::{NewSubmission, Submission};

pub use dxreport_files as files;
pub use dxreport_types::NonEmptyText;
