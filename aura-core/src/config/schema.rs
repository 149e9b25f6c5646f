//! Configuration schema definitions

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Root configuration for aura-chat
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Answering service configuration
    #[serde(default)]
    pub ask: AskConfig,
    /// Chat storage configuration
    #[serde(default)]
    pub storage: StorageConfig,
    /// Voice input/output configuration
    #[serde(default)]
    pub voice: VoiceConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Answering service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskConfig {
    /// Base URL of the answering service
    #[serde(default = "default_ask_base_url")]
    pub base_url: String,
}

fn default_ask_base_url() -> String {
    "http://localhost:5000".to_string()
}

impl Default for AskConfig {
    fn default() -> Self {
        Self {
            base_url: default_ask_base_url(),
        }
    }
}

/// Chat storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the chat mapping and the last-active pointer
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

fn default_data_dir() -> String {
    "~/.aura-chat/data".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Voice input/output configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct VoiceConfig {
    #[serde(default)]
    pub transcription: TranscriptionConfig,
    #[serde(default)]
    pub speech: SpeechConfig,
}

/// Speech-to-text (transcription) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_transcription_url")]
    pub api_url: String,
    #[serde(default = "default_transcription_model")]
    pub model: String,
}

fn default_transcription_url() -> String {
    "https://api.groq.com/openai/v1/audio/transcriptions".to_string()
}

fn default_transcription_model() -> String {
    "whisper-large-v3".to_string()
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_url: default_transcription_url(),
            model: default_transcription_model(),
        }
    }
}

/// Text-to-speech configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_speech_url")]
    pub api_url: String,
    #[serde(default = "default_speech_model")]
    pub model: String,
    /// Voice names offered by the synthesis service
    #[serde(default = "default_voices")]
    pub voices: Vec<String>,
    /// Regex matched against voice names; the first match is used
    #[serde(default = "default_preferred_voice")]
    pub preferred_voice: String,
    #[serde(default = "default_speed")]
    pub speed: f32,
    #[serde(default = "default_pitch")]
    pub pitch: f32,
    /// External player command used for playback
    #[serde(default = "default_player")]
    pub player: String,
    #[serde(default = "default_player_args")]
    pub player_args: Vec<String>,
}

fn default_speech_url() -> String {
    "https://api.openai.com/v1/audio/speech".to_string()
}

fn default_speech_model() -> String {
    "tts-1".to_string()
}

fn default_voices() -> Vec<String> {
    ["alloy", "echo", "fable", "onyx", "nova", "shimmer"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_preferred_voice() -> String {
    "(?i)nova|shimmer|female".to_string()
}

fn default_speed() -> f32 {
    1.05
}

fn default_pitch() -> f32 {
    1.15
}

fn default_player() -> String {
    "ffplay".to_string()
}

fn default_player_args() -> Vec<String> {
    ["-nodisp", "-autoexit", "-loglevel", "quiet"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_url: default_speech_url(),
            model: default_speech_model(),
            voices: default_voices(),
            preferred_voice: default_preferred_voice(),
            speed: default_speed(),
            pitch: default_pitch(),
            player: default_player(),
            player_args: default_player_args(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (text, json)
    #[serde(default = "default_log_format")]
    pub format: String,
    /// Directory for log files
    #[serde(default = "default_log_dir")]
    pub dir: String,
    /// Module-specific overrides
    #[serde(default)]
    pub overrides: HashMap<String, String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_log_dir() -> String {
    "~/.aura-chat/logs".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            dir: default_log_dir(),
            overrides: HashMap::new(),
        }
    }
}
