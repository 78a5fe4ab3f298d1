use super::Summariser;
use crate::error::SummariseError;
use async_trait::async_trait;
use std::sync::Mutex;

/// Mock summariser for testing. Returns a configurable reply and records every call.
pub struct MockSummariser {
    reply: Result<String, SummariseError>,
    available_models: Vec<String>,
    calls: Mutex<Vec<(String, u32)>>,
}

impl MockSummariser {
    /// A summariser that always answers with `reply`.
    pub fn replying(reply: &str) -> Self {
        Self::with_result(Ok(reply.to_string()))
    }

    /// A summariser that always fails with `error`.
    pub fn failing(error: SummariseError) -> Self {
        Self::with_result(Err(error))
    }

    fn with_result(reply: Result<String, SummariseError>) -> Self {
        Self {
            reply,
            available_models: vec!["gpt-3.5-turbo".to_string()],
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_models(mut self, models: Vec<String>) -> Self {
        self.available_models = models;
        self
    }

    /// Prompts and token budgets received so far.
    pub fn calls(&self) -> Vec<(String, u32)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Summariser for MockSummariser {
    async fn summarise(&self, prompt: &str, max_tokens: u32) -> Result<String, SummariseError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((prompt.to_string(), max_tokens));
        }
        self.reply.clone()
    }

    async fn list_models(&self) -> Result<Vec<String>, SummariseError> {
        Ok(self.available_models.clone())
    }
}
