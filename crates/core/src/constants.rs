//! Constants used throughout the DXReport core crate.
//!
//! Defaults for every setting resolved at startup live here so the server binary, the CLI,
//! and the tests agree on them.

/// Default store connection string when `DATABASE_URL` is not set.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://submissions.db";

/// Default directory for uploaded and generated report files.
pub const DEFAULT_UPLOAD_DIR: &str = "uploads";

/// Default directory holding the browser client.
pub const DEFAULT_FRONTEND_DIR: &str = "frontend";

/// Default HTTP listen port.
pub const DEFAULT_PORT: u16 = 3000;

/// Default request body limit for uploads (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Default base URL of the OpenAI-compatible completion service.
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";

/// Default chat model used for summaries.
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";

/// Default output budget for a summary, in tokens.
pub const DEFAULT_SUMMARY_MAX_TOKENS: u32 = 500;

/// Default HTTP client timeout for summariser calls, in seconds.
pub const DEFAULT_SUMMARISER_TIMEOUT_SECS: u64 = 120;

/// How many `simplified_report_<millis>[-n].txt` names are tried before giving up.
pub const MAX_SUMMARY_NAME_ATTEMPTS: u32 = 16;

/// Environment variable names.
pub mod env {
    pub const PORT: &str = "PORT";
    pub const DATABASE_URL: &str = "DATABASE_URL";
    pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
    pub const OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";
    pub const OPENAI_MODEL: &str = "OPENAI_MODEL";
    pub const SUMMARY_MAX_TOKENS: &str = "SUMMARY_MAX_TOKENS";
    pub const SUMMARISER_TIMEOUT_SECS: &str = "SUMMARISER_TIMEOUT_SECS";
    pub const UPLOAD_DIR: &str = "UPLOAD_DIR";
    pub const FRONTEND_DIR: &str = "FRONTEND_DIR";
    pub const MAX_UPLOAD_BYTES: &str = "MAX_UPLOAD_BYTES";
}
