//! Speech-to-text client for voice input
//!
//! Uploads recorded audio to a Whisper-compatible transcription endpoint
//! (Groq's by default, which is fast and has a generous free tier).

use aura_core::config::TranscriptionConfig;
use reqwest::multipart::{Form, Part};
use std::path::Path;
use thiserror::Error;
use tracing::error;

/// Transcription errors
#[derive(Error, Debug)]
pub enum TranscriptionError {
    #[error("API key not configured")]
    NoApiKey,

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Failed to read file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {0}")]
    Api(String),
}

#[derive(Debug, serde::Deserialize)]
struct TranscriptionResponse {
    text: String,
}

/// Whisper-compatible transcription client
#[derive(Clone)]
pub struct Transcriber {
    api_key: Option<String>,
    api_url: String,
    model: String,
}

impl Transcriber {
    /// Create a transcriber from configuration
    ///
    /// An empty configured key falls back to the GROQ_API_KEY env var.
    pub fn new(config: &TranscriptionConfig) -> Self {
        let api_key = Some(config.api_key.clone())
            .filter(|key| !key.is_empty())
            .or_else(|| std::env::var("GROQ_API_KEY").ok());

        Self {
            api_key,
            api_url: config.api_url.clone(),
            model: config.model.clone(),
        }
    }

    /// Whether an API key is available
    ///
    /// An unconfigured transcriber is the "platform lacks speech
    /// recognition" case; callers surface it to the user before recording.
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Transcribe an audio file
    ///
    /// Accepts the formats the endpoint accepts (MP3, WAV, OGG, FLAC, M4A).
    pub async fn transcribe<P: AsRef<Path>>(
        &self,
        file_path: P,
    ) -> Result<String, TranscriptionError> {
        let api_key = self.api_key.as_ref().ok_or(TranscriptionError::NoApiKey)?;

        let path = file_path.as_ref();
        if !path.exists() {
            return Err(TranscriptionError::FileNotFound(
                path.to_string_lossy().to_string(),
            ));
        }

        let file_bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("audio.mp3")
            .to_string();

        let file_part = Part::bytes(file_bytes).file_name(file_name);
        let form = Form::new()
            .part("file", file_part)
            .text("model", self.model.clone());

        let client = reqwest::Client::new();
        let response = client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", api_key))
            .multipart(form)
            .timeout(std::time::Duration::from_secs(60))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!("Transcription failed: {} - {}", status, error_text);
            return Err(TranscriptionError::Api(format!(
                "{}: {}",
                status, error_text
            )));
        }

        let data: TranscriptionResponse = response.json().await?;
        Ok(data.text)
    }
}
