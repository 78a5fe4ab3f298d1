use dxreport_core::SubmissionService;
use std::path::PathBuf;

/// Application state shared across REST API handlers
///
/// Holds the submission service; its store, summariser, and blob store are constructed once
/// at startup and injected here.
#[derive(Clone)]
pub struct AppState {
    pub submissions: SubmissionService,
}

impl AppState {
    pub fn new(submissions: SubmissionService) -> Self {
        Self { submissions }
    }
}

/// Static file and request-size settings for the router.
#[derive(Clone, Debug)]
pub struct ServeOptions {
    /// Directory exposed under `/uploads`
    pub upload_dir: PathBuf,
    /// Directory holding the browser client, served for unmatched paths
    pub frontend_dir: Option<PathBuf>,
    /// Maximum request body size in bytes
    pub max_upload_bytes: usize,
}
