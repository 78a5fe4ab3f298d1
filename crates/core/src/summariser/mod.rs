//! Report summarisation.
//!
//! [`Summariser`] is the capability the upload flow depends on: turn a prompt into generated
//! text within an output budget. [`OpenAiSummariser`] talks to an OpenAI-compatible chat
//! completions API; [`MockSummariser`] returns a canned reply for tests.

mod mock;
mod openai;
mod prompt;

pub use mock::MockSummariser;
pub use openai::OpenAiSummariser;
pub use prompt::build_summary_prompt;

use crate::error::SummariseError;
use async_trait::async_trait;

/// Text-completion capability used to simplify reports.
///
/// Implementations perform a single attempt per call; retries are not part of the contract.
#[async_trait]
pub trait Summariser: Send + Sync {
    /// Generates text for `prompt`, limited to `max_tokens` of output.
    ///
    /// # Errors
    ///
    /// Returns `SummariseError` if the service is unreachable, rejects the request, or
    /// returns no content.
    async fn summarise(&self, prompt: &str, max_tokens: u32) -> Result<String, SummariseError>;

    /// Lists the model identifiers available to this client.
    async fn list_models(&self) -> Result<Vec<String>, SummariseError>;
}
