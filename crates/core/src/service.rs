//! Submission processing.
//!
//! [`SubmissionService`] owns the upload flow and the per-center listing. It holds its three
//! collaborators as trait objects, so the HTTP layer, the CLI, and the tests all construct it
//! the same way with different implementations.
//!
//! ## Upload flow
//!
//! Steps run strictly in order; each starts only after the previous one has completed:
//!
//! 1. validate `center_id` and the presence of a non-empty report file
//! 2. write the original to the blob store
//! 3. read it back and decode it as UTF-8 (lossy)
//! 4. build the prompt and call the summariser once
//! 5. write the summary to a new `simplified_report_<millis>.txt`, adding `-<n>` while the
//!    name is taken
//! 6. insert the submission record
//!
//! A failure after step 2 leaves the original on disk; nothing is rolled back.
//!
//! Blob and store implementations are synchronous, so the service runs them through
//! `tokio::task::spawn_blocking`.

use crate::config::CoreConfig;
use crate::constants::MAX_SUMMARY_NAME_ATTEMPTS;
use crate::error::{SubmissionError, SubmissionResult};
use crate::store::SubmissionStore;
use crate::submission::{NewSubmission, Submission};
use crate::summariser::{build_summary_prompt, Summariser};
use chrono::Utc;
use dxreport_files::{
    original_report_name, simplified_report_name, BlobStore, FilesError, StoredBlob,
};
use dxreport_types::{text_or_empty, NonEmptyText};
use std::sync::Arc;

/// Report file received with an upload.
#[derive(Debug, Clone, Default)]
pub struct UploadedReport {
    /// File name supplied by the client, if any
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadedReport {
    /// A browser submits an empty part for an unselected file input; treat that, and any
    /// zero-byte file, as no file at all.
    fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Fields of an upload request, as received.
#[derive(Debug, Clone, Default)]
pub struct UploadForm {
    pub center_id: Option<String>,
    pub patient_name: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub report: Option<UploadedReport>,
}

/// Upload and listing operations - no HTTP concerns.
#[derive(Clone)]
pub struct SubmissionService {
    store: Arc<dyn SubmissionStore>,
    summariser: Arc<dyn Summariser>,
    blobs: Arc<dyn BlobStore>,
    summary_max_tokens: u32,
}

impl SubmissionService {
    /// Creates a new `SubmissionService` from its collaborators.
    ///
    /// # Arguments
    ///
    /// * `store` - Where submission records are persisted
    /// * `summariser` - Completion service used to simplify reports
    /// * `blobs` - Where original and simplified report files are written
    /// * `summary_max_tokens` - Output budget passed to every summariser call
    pub fn new(
        store: Arc<dyn SubmissionStore>,
        summariser: Arc<dyn Summariser>,
        blobs: Arc<dyn BlobStore>,
        summary_max_tokens: u32,
    ) -> Self {
        Self {
            store,
            summariser,
            blobs,
            summary_max_tokens,
        }
    }

    /// Creates a service using the output budget from `cfg`.
    pub fn with_config(
        cfg: &CoreConfig,
        store: Arc<dyn SubmissionStore>,
        summariser: Arc<dyn Summariser>,
        blobs: Arc<dyn BlobStore>,
    ) -> Self {
        Self::new(store, summariser, blobs, cfg.summary_max_tokens())
    }

    /// Processes one uploaded report end to end and persists its submission record.
    ///
    /// `center_id` is stored exactly as submitted; surrounding whitespace only matters for
    /// deciding whether it is blank. Blob and store calls run on the blocking thread pool.
    ///
    /// # Returns
    ///
    /// The inserted `Submission`, referencing both the stored original and the stored summary.
    ///
    /// # Errors
    ///
    /// Returns `SubmissionError::Validation` if `center_id` is missing or blank, or no
    /// non-empty report file was supplied; nothing is written in that case. Any later failure
    /// (blob write/read, summarisation, record insertion) is returned as the matching
    /// processing variant.
    pub async fn process_upload(&self, form: UploadForm) -> SubmissionResult<Submission> {
        let center_id = form
            .center_id
            .filter(|c| NonEmptyText::new(c).is_ok())
            .ok_or_else(|| SubmissionError::Validation("center_id is required".into()))?;
        let report = form
            .report
            .filter(|r| !r.is_empty())
            .ok_or_else(|| SubmissionError::Validation("No file uploaded".into()))?;

        let blobs = Arc::clone(&self.blobs);
        let (original, content) = run_blocking(move || {
            let original_name = original_report_name(report.file_name.as_deref(), Utc::now());
            let original = blobs
                .put_new(&original_name, &report.bytes)
                .map_err(SubmissionError::StoreOriginal)?;
            let content = blobs
                .read(&original.relative_path)
                .map_err(SubmissionError::ReadOriginal)?;
            Ok((original, content))
        })
        .await?;
        tracing::debug!(
            "stored original report {} ({} bytes)",
            original.relative_path,
            original.size_bytes
        );
        let content = String::from_utf8_lossy(&content);

        let summary = self.summarise_report(&content).await?;

        let blobs = Arc::clone(&self.blobs);
        let simplified = run_blocking(move || store_summary(blobs.as_ref(), &summary)).await?;

        let new_submission = NewSubmission {
            center_id,
            patient_name: text_or_empty(form.patient_name),
            phone_number: text_or_empty(form.phone_number),
            email: NonEmptyText::from_optional(form.email).map(NonEmptyText::into_inner),
            original_report_url: original.relative_path,
            simplified_report_url: Some(simplified.relative_path),
            created_at: Utc::now(),
        };
        let store = Arc::clone(&self.store);
        let record = run_blocking(move || {
            store
                .insert(new_submission)
                .map_err(SubmissionError::Insert)
        })
        .await?;

        tracing::info!(
            "saved submission {} for center {:?}",
            record.id,
            record.center_id
        );
        Ok(record)
    }

    /// Builds the analysis prompt for `report_content` and returns the generated summary.
    ///
    /// # Errors
    ///
    /// Returns `SubmissionError::Summarise` if the summariser call fails.
    pub async fn summarise_report(&self, report_content: &str) -> SubmissionResult<String> {
        let prompt = build_summary_prompt(report_content);
        let summary = self
            .summariser
            .summarise(&prompt, self.summary_max_tokens)
            .await?;
        Ok(summary.trim().to_string())
    }

    /// Lists the submissions of one center in insertion order.
    ///
    /// `center_id` is matched exactly, without trimming. `None` returns every submission.
    ///
    /// # Errors
    ///
    /// Returns `SubmissionError::Query` if the store fails.
    pub async fn list_for_center(
        &self,
        center_id: Option<String>,
    ) -> SubmissionResult<Vec<Submission>> {
        let store = Arc::clone(&self.store);
        run_blocking(move || {
            store
                .find_by_center(center_id.as_deref())
                .map_err(SubmissionError::Query)
        })
        .await
    }

    /// Lists the models reachable through the configured summariser.
    pub async fn available_models(&self) -> SubmissionResult<Vec<String>> {
        Ok(self.summariser.list_models().await?)
    }
}

/// Runs filesystem or database work off the async worker threads.
async fn run_blocking<T, F>(work: F) -> SubmissionResult<T>
where
    F: FnOnce() -> SubmissionResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| SubmissionError::Background(e.to_string()))?
}

/// Writes `summary` under the first free `simplified_report_<millis>[-n].txt` name.
fn store_summary(blobs: &dyn BlobStore, summary: &str) -> SubmissionResult<StoredBlob> {
    let at = Utc::now();
    let mut last_name = String::new();

    for attempt in 0..MAX_SUMMARY_NAME_ATTEMPTS {
        let name = simplified_report_name(at, attempt);
        match blobs.put_new(&name, summary.as_bytes()) {
            Ok(blob) => return Ok(blob),
            Err(FilesError::AlreadyExists(_)) => last_name = name,
            Err(e) => return Err(SubmissionError::StoreSummary(e)),
        }
    }

    Err(SubmissionError::StoreSummary(FilesError::AlreadyExists(
        last_name,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SummariseError;
    use crate::store::InMemorySubmissionStore;
    use crate::summariser::MockSummariser;
    use dxreport_files::{FilesResult, UploadDirectory};
    use std::collections::HashMap;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    struct Harness {
        _temp: TempDir,
        upload_dir: std::path::PathBuf,
        store: Arc<InMemorySubmissionStore>,
        summariser: Arc<MockSummariser>,
        service: SubmissionService,
    }

    fn harness(summariser: MockSummariser) -> Harness {
        let temp = TempDir::new().unwrap();
        let upload_dir = temp.path().join("uploads");
        let blobs = Arc::new(UploadDirectory::open_or_create(&upload_dir).unwrap());
        let store = Arc::new(InMemorySubmissionStore::new());
        let summariser = Arc::new(summariser);
        let service = SubmissionService::new(store.clone(), summariser.clone(), blobs, 500);

        Harness {
            _temp: temp,
            upload_dir,
            store,
            summariser,
            service,
        }
    }

    fn files_in(dir: &std::path::Path) -> usize {
        fs::read_dir(dir).unwrap().count()
    }

    fn valid_form(center: &str, content: &str) -> UploadForm {
        UploadForm {
            center_id: Some(center.into()),
            patient_name: Some("Jane Doe".into()),
            phone_number: Some("0123 456 789".into()),
            email: Some("jane@example.com".into()),
            report: Some(UploadedReport {
                file_name: Some("bp.txt".into()),
                bytes: content.as_bytes().to_vec(),
            }),
        }
    }

    #[tokio::test]
    async fn valid_upload_stores_both_files_and_one_record() {
        let h = harness(MockSummariser::replying("Your report looks normal."));

        let record = h
            .service
            .process_upload(valid_form("Center 1", "BP: 120/80, normal"))
            .await
            .unwrap();

        assert_eq!(record.center_id, "Center 1");
        assert_eq!(record.patient_name, "Jane Doe");
        assert_eq!(record.phone_number, "0123 456 789");
        assert_eq!(record.email.as_deref(), Some("jane@example.com"));
        assert!(record.original_report_url.starts_with("uploads/report-"));
        assert!(record.original_report_url.ends_with(".txt"));

        let simplified = record.simplified_report_url.clone().unwrap();
        assert!(simplified.starts_with("uploads/simplified_report_"));

        let original_file = h
            .upload_dir
            .join(record.original_report_url.trim_start_matches("uploads/"));
        let simplified_file = h.upload_dir.join(simplified.trim_start_matches("uploads/"));
        assert_eq!(fs::read_to_string(original_file).unwrap(), "BP: 120/80, normal");
        assert_eq!(
            fs::read_to_string(simplified_file).unwrap(),
            "Your report looks normal."
        );

        assert_eq!(h.store.find_by_center(Some("Center 1")).unwrap(), vec![record]);
    }

    #[tokio::test]
    async fn summariser_receives_prompt_with_report_and_budget() {
        let h = harness(MockSummariser::replying("ok"));

        h.service
            .process_upload(valid_form("Center 1", "Haemoglobin 9.1 g/dL"))
            .await
            .unwrap();

        let calls = h.summariser.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].0.contains("Report content: Haemoglobin 9.1 g/dL"));
        assert!(calls[0].0.contains("Suggested next steps."));
        assert_eq!(calls[0].1, 500);
    }

    #[tokio::test]
    async fn missing_center_id_writes_nothing() {
        let h = harness(MockSummariser::replying("ok"));

        for center in [None, Some("".to_string()), Some("   ".to_string())] {
            let mut form = valid_form("ignored", "content");
            form.center_id = center;

            let err = h.service.process_upload(form).await.unwrap_err();
            assert!(err.is_validation());
            assert_eq!(err.to_string(), "center_id is required");
        }

        assert_eq!(files_in(&h.upload_dir), 0);
        assert!(h.store.is_empty());
        assert!(h.summariser.calls().is_empty());
    }

    #[tokio::test]
    async fn missing_or_empty_file_writes_nothing() {
        let h = harness(MockSummariser::replying("ok"));

        let empty_part = UploadedReport {
            file_name: Some(String::new()),
            bytes: Vec::new(),
        };
        for report in [None, Some(empty_part)] {
            let mut form = valid_form("Center 1", "unused");
            form.report = report;

            let err = h.service.process_upload(form).await.unwrap_err();
            assert!(err.is_validation());
            assert_eq!(err.to_string(), "No file uploaded");
        }

        assert_eq!(files_in(&h.upload_dir), 0);
        assert!(h.store.is_empty());
    }

    #[tokio::test]
    async fn summariser_failure_creates_no_record_but_leaves_original() {
        let h = harness(MockSummariser::failing(SummariseError::Upstream {
            status: 500,
            body: "boom".into(),
        }));

        let err = h
            .service
            .process_upload(valid_form("Center 1", "BP: 120/80"))
            .await
            .unwrap_err();

        assert!(matches!(err, SubmissionError::Summarise(_)));
        assert!(!err.is_validation());
        assert!(h.store.is_empty());
        // Only the original remains; no summary was written.
        assert_eq!(files_in(&h.upload_dir), 1);
    }

    #[tokio::test]
    async fn optional_fields_default_when_absent() {
        let h = harness(MockSummariser::replying("ok"));
        let mut form = valid_form("Center 2", "report");
        form.patient_name = None;
        form.phone_number = None;
        form.email = Some("  ".into());

        let record = h.service.process_upload(form).await.unwrap();

        assert_eq!(record.patient_name, "");
        assert_eq!(record.phone_number, "");
        assert_eq!(record.email, None);
    }

    #[tokio::test]
    async fn invalid_utf8_is_decoded_lossily() {
        let h = harness(MockSummariser::replying("ok"));
        let mut form = valid_form("Center 1", "");
        form.report = Some(UploadedReport {
            file_name: Some("scan.bin".into()),
            bytes: vec![b'O', b'K', 0xFF, b'!'],
        });

        h.service.process_upload(form).await.unwrap();

        assert!(h.summariser.calls()[0].0.ends_with("OK\u{FFFD}!"));
    }

    #[tokio::test]
    async fn repeated_uploads_create_separate_records() {
        let h = harness(MockSummariser::replying("same summary"));

        let first = h
            .service
            .process_upload(valid_form("Center 1", "same"))
            .await
            .unwrap();
        let second = h
            .service
            .process_upload(valid_form("Center 1", "same"))
            .await
            .unwrap();

        assert_ne!(first.id, second.id);
        assert_ne!(first.simplified_report_url, second.simplified_report_url);
        let listed = h
            .service
            .list_for_center(Some("Center 1".into()))
            .await
            .unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(files_in(&h.upload_dir), 4);
    }

    #[tokio::test]
    async fn listing_empty_center_is_empty_not_error() {
        let h = harness(MockSummariser::replying("ok"));
        assert!(h
            .service
            .list_for_center(Some("Center 3".into()))
            .await
            .unwrap()
            .is_empty());
    }

    /// Blob store whose writes always fail.
    struct ReadOnlyBlobs;

    impl BlobStore for ReadOnlyBlobs {
        fn put_new(&self, _file_name: &str, _bytes: &[u8]) -> FilesResult<StoredBlob> {
            Err(FilesError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only",
            )))
        }

        fn read(&self, relative_path: &str) -> FilesResult<Vec<u8>> {
            Err(FilesError::NotFound(relative_path.to_string()))
        }
    }

    #[tokio::test]
    async fn blob_write_failure_is_processing_error() {
        let store = Arc::new(InMemorySubmissionStore::new());
        let summariser = Arc::new(MockSummariser::replying("ok"));
        let service = SubmissionService::new(
            store.clone(),
            summariser.clone(),
            Arc::new(ReadOnlyBlobs),
            500,
        );

        let err = service
            .process_upload(valid_form("Center 1", "x"))
            .await
            .unwrap_err();

        assert!(matches!(err, SubmissionError::StoreOriginal(_)));
        assert!(summariser.calls().is_empty());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn padded_center_id_is_stored_and_listed_verbatim() {
        let h = harness(MockSummariser::replying("ok"));

        let record = h
            .service
            .process_upload(valid_form(" Center 1 ", "report"))
            .await
            .unwrap();

        assert_eq!(record.center_id, " Center 1 ");
        let listed = h
            .service
            .list_for_center(Some(" Center 1 ".into()))
            .await
            .unwrap();
        assert_eq!(listed, vec![record]);
        assert!(h
            .service
            .list_for_center(Some("Center 1".into()))
            .await
            .unwrap()
            .is_empty());
    }

    /// In-memory blob store that reports the first `taken` summary names as already used.
    struct CollidingBlobs {
        taken: u32,
        summary_attempts: Mutex<u32>,
        blobs: Mutex<HashMap<String, Vec<u8>>>,
    }

    impl CollidingBlobs {
        fn new(taken: u32) -> Self {
            Self {
                taken,
                summary_attempts: Mutex::new(0),
                blobs: Mutex::new(HashMap::new()),
            }
        }
    }

    impl BlobStore for CollidingBlobs {
        fn put_new(&self, file_name: &str, bytes: &[u8]) -> FilesResult<StoredBlob> {
            if file_name.starts_with("simplified_report_") {
                let mut attempts = self.summary_attempts.lock().unwrap();
                *attempts += 1;
                if *attempts <= self.taken {
                    return Err(FilesError::AlreadyExists(file_name.to_string()));
                }
            }
            self.blobs
                .lock()
                .unwrap()
                .insert(file_name.to_string(), bytes.to_vec());
            Ok(StoredBlob {
                relative_path: format!("uploads/{file_name}"),
                size_bytes: bytes.len() as u64,
            })
        }

        fn read(&self, relative_path: &str) -> FilesResult<Vec<u8>> {
            let name = relative_path.trim_start_matches("uploads/");
            self.blobs
                .lock()
                .unwrap()
                .get(name)
                .cloned()
                .ok_or_else(|| FilesError::NotFound(relative_path.to_string()))
        }
    }

    #[tokio::test]
    async fn taken_summary_name_gets_numeric_suffix() {
        let blobs = Arc::new(CollidingBlobs::new(1));
        let store = Arc::new(InMemorySubmissionStore::new());
        let service = SubmissionService::new(
            store.clone(),
            Arc::new(MockSummariser::replying("Your report looks normal.")),
            blobs.clone(),
            500,
        );

        let record = service
            .process_upload(valid_form("Center 1", "BP: 120/80"))
            .await
            .unwrap();

        let simplified = record.simplified_report_url.unwrap();
        assert!(simplified.starts_with("uploads/simplified_report_"));
        assert!(simplified.ends_with("-1.txt"));
        assert_eq!(*blobs.summary_attempts.lock().unwrap(), 2);
        assert_eq!(
            blobs.read(&simplified).unwrap(),
            b"Your report looks normal."
        );
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn summary_names_exhausted_is_store_summary_error() {
        let blobs = Arc::new(CollidingBlobs::new(u32::MAX));
        let store = Arc::new(InMemorySubmissionStore::new());
        let service = SubmissionService::new(
            store.clone(),
            Arc::new(MockSummariser::replying("ok")),
            blobs.clone(),
            500,
        );

        let err = service
            .process_upload(valid_form("Center 1", "BP: 120/80"))
            .await
            .unwrap_err();

        match err {
            SubmissionError::StoreSummary(FilesError::AlreadyExists(name)) => {
                let last = format!("-{}.txt", MAX_SUMMARY_NAME_ATTEMPTS - 1);
                assert!(name.ends_with(&last), "{name}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(
            *blobs.summary_attempts.lock().unwrap(),
            MAX_SUMMARY_NAME_ATTEMPTS
        );
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn available_models_come_from_summariser() {
        let h = harness(
            MockSummariser::replying("ok").with_models(vec!["gpt-4o-mini".to_string()]),
        );
        assert_eq!(h.service.available_models().await.unwrap(), ["gpt-4o-mini"]);
    }
}
