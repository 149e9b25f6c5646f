//! Text-to-speech client for spoken answers

use aura_core::config::SpeechConfig;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error};

/// Pictographic and symbol characters that garble synthesized audio
static PICTOGRAPHS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\x{1F300}-\x{1FAFF}\x{2600}-\x{26FF}]").expect("pictograph pattern is valid")
});

/// Remove pictographic characters and surrounding whitespace before synthesis
pub fn strip_pictographs(text: &str) -> String {
    PICTOGRAPHS.replace_all(text, "").trim().to_string()
}

/// Pick the first voice matching the preferred marker, else the first available
pub fn select_voice<'a>(voices: &'a [String], preferred: &str) -> Option<&'a str> {
    if let Ok(marker) = Regex::new(preferred) {
        if let Some(voice) = voices.iter().find(|voice| marker.is_match(voice)) {
            return Some(voice.as_str());
        }
    }
    voices.first().map(|voice| voice.as_str())
}

/// Speech synthesis errors
#[derive(Error, Debug)]
pub enum SpeechError {
    #[error("API key not configured")]
    NoApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {0}")]
    Api(String),
}

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
    speed: f32,
    pitch: f32,
}

/// HTTP text-to-speech client returning raw audio bytes
#[derive(Clone)]
pub struct SpeechSynthesizer {
    client: Client,
    api_key: Option<String>,
    api_url: String,
    model: String,
    speed: f32,
    pitch: f32,
}

impl SpeechSynthesizer {
    /// Create a synthesizer from configuration
    ///
    /// An empty configured key falls back to the OPENAI_API_KEY env var.
    pub fn new(config: &SpeechConfig) -> Self {
        let api_key = Some(config.api_key.clone())
            .filter(|key| !key.is_empty())
            .or_else(|| std::env::var("OPENAI_API_KEY").ok());

        Self {
            client: Client::new(),
            api_key,
            api_url: config.api_url.clone(),
            model: config.model.clone(),
            speed: config.speed,
            pitch: config.pitch,
        }
    }

    /// Whether an API key is available
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Synthesize speech for the given text and voice
    pub async fn synthesize(&self, text: &str, voice: &str) -> Result<Vec<u8>, SpeechError> {
        let api_key = self.api_key.as_ref().ok_or(SpeechError::NoApiKey)?;

        debug!("Synthesizing {} chars with voice {}", text.len(), voice);
        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&SpeechRequest {
                model: &self.model,
                input: text,
                voice,
                speed: self.speed,
                pitch: self.pitch,
            })
            .timeout(std::time::Duration::from_secs(60))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!("Speech synthesis failed: {} - {}", status, error_text);
            return Err(SpeechError::Api(format!("{}: {}", status, error_text)));
        }

        Ok(response.bytes().await?.to_vec())
    }
}
