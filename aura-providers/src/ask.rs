//! HTTP client for the remote answering service

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// Answer substituted when the service responds without an answer field
pub const NO_ANSWER_FALLBACK: &str = "No answer.";

/// Error type for answering calls
#[derive(Error, Debug)]
pub enum AskError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {0}")]
    Api(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

pub type AskResult<T> = Result<T, AskError>;

/// Trait for answering services
#[async_trait]
pub trait AnswerProvider: Send + Sync {
    /// Submit one question and wait for the answer
    async fn ask(&self, question: &str) -> AskResult<String>;
}

#[derive(Debug, Serialize)]
struct AskRequest<'a> {
    question: &'a str,
}

/// Client for the `/ask` endpoint
///
/// No timeout is applied to the call; the caller waits as long as the
/// service takes.
pub struct AnswerClient {
    client: Client,
    base_url: String,
}

impl AnswerClient {
    /// Create a new client for the given base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl AnswerProvider for AnswerClient {
    async fn ask(&self, question: &str) -> AskResult<String> {
        let url = format!("{}/ask", self.base_url);
        debug!("Submitting question to {}", url);

        let response = self
            .client
            .post(&url)
            .json(&AskRequest { question })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AskError::Api(format!("HTTP {}: {}", status, body)));
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AskError::InvalidResponse(e.to_string()))?;

        // Any JSON shape without a string answer degrades to the fixed
        // placeholder rather than an error
        Ok(payload
            .get("answer")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .unwrap_or_else(|| NO_ANSWER_FALLBACK.to_string()))
    }
}
