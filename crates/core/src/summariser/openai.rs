use serde::{Deserialize, Serialize};

use super::Summariser;
use crate::config::OpenAiConfig;
use crate::error::SummariseError;
use async_trait::async_trait;

/// HTTP client for an OpenAI-compatible chat completions API.
pub struct OpenAiSummariser {
    base_url: String,
    api_key: String,
    model: String,
    client: reqwest::Client,
    timeout_secs: u64,
}

impl OpenAiSummariser {
    /// Create a new `OpenAiSummariser` from resolved configuration.
    ///
    /// # Errors
    ///
    /// Returns `SummariseError::ClientBuild` if the HTTP client cannot be constructed.
    pub fn new(config: &OpenAiConfig) -> Result<Self, SummariseError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs()))
            .build()
            .map_err(|e| SummariseError::ClientBuild(e.to_string()))?;

        Ok(Self {
            base_url: config.base_url().trim_end_matches('/').to_string(),
            api_key: config.api_key().to_string(),
            model: config.model().to_string(),
            client,
            timeout_secs: config.timeout_secs(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn map_send_error(&self, e: reqwest::Error) -> SummariseError {
        if e.is_connect() {
            SummariseError::Connection(self.base_url.clone())
        } else if e.is_timeout() {
            SummariseError::Timeout(self.timeout_secs)
        } else {
            SummariseError::HttpClient(e.to_string())
        }
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, SummariseError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::warn!(
            "summarisation service returned {}: {}",
            status.as_u16(),
            body
        );
        Err(SummariseError::Upstream {
            status: status.as_u16(),
            body,
        })
    }
}

/// Request body for /v1/chat/completions
#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Response body from /v1/chat/completions
#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Response body from /v1/models
#[derive(Deserialize)]
struct ModelsResponse {
    data: Vec<ModelEntry>,
}

#[derive(Deserialize)]
struct ModelEntry {
    id: String,
}

#[async_trait]
impl Summariser for OpenAiSummariser {
    async fn summarise(&self, prompt: &str, max_tokens: u32) -> Result<String, SummariseError> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;
        let response = Self::check_status(response).await?;

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| SummariseError::ResponseParsing(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(SummariseError::NoContent)
    }

    async fn list_models(&self) -> Result<Vec<String>, SummariseError> {
        let url = format!("{}/v1/models", self.base_url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;
        let response = Self::check_status(response).await?;

        let parsed: ModelsResponse = response
            .json()
            .await
            .map_err(|e| SummariseError::ResponseParsing(e.to_string()))?;

        Ok(parsed.data.into_iter().map(|m| m.id).collect())
    }
}
