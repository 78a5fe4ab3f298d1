use dxreport_files::FilesError;

/// Startup and configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("missing required setting {0}")]
    MissingSetting(&'static str),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Errors raised by a [`crate::store::SubmissionStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("unsupported database url: {0}")]
    UnsupportedUrl(String),
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("store lock poisoned")]
    LockPoisoned,
    #[error("failed to decode stored submission {id}: {reason}")]
    Decode { id: String, reason: String },
    #[error("migration to schema version {version} failed: {reason}")]
    MigrationFailed { version: i64, reason: String },
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors raised by a [`crate::summariser::Summariser`].
///
/// Upstream response bodies are kept for logging but left out of the `Display` text, which is
/// what reaches HTTP clients.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SummariseError {
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(String),
    #[error("cannot reach summarisation service at {0}")]
    Connection(String),
    #[error("summarisation request timed out after {0}s")]
    Timeout(u64),
    #[error("summarisation request failed: {0}")]
    HttpClient(String),
    #[error("summarisation service rejected the request with status {status}")]
    Upstream { status: u16, body: String },
    #[error("failed to parse summarisation response: {0}")]
    ResponseParsing(String),
    #[error("summarisation service returned no content")]
    NoContent,
}

/// Errors raised while processing or listing submissions.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("{0}")]
    Validation(String),
    #[error("failed to store uploaded report: {0}")]
    StoreOriginal(#[source] FilesError),
    #[error("failed to read uploaded report: {0}")]
    ReadOriginal(#[source] FilesError),
    #[error("failed to summarise report: {0}")]
    Summarise(#[from] SummariseError),
    #[error("failed to store simplified report: {0}")]
    StoreSummary(#[source] FilesError),
    #[error("failed to save submission: {0}")]
    Insert(#[source] StoreError),
    #[error("failed to query submissions: {0}")]
    Query(#[source] StoreError),
    #[error("background task failed: {0}")]
    Background(String),
}

impl SubmissionError {
    /// True for errors caused by the client's input rather than a downstream failure.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

pub type SubmissionResult<T> = std::result::Result<T, SubmissionError>;
