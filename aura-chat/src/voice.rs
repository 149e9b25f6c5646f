//! Voice input and output around the speech services

use aura_core::config::VoiceConfig;
use aura_providers::{select_voice, strip_pictographs, SpeechSynthesizer, Transcriber};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use thiserror::Error;
use tokio::process::{Child, Command};
use tracing::{debug, error};

/// Voice adapter errors
#[derive(Error, Debug)]
pub enum VoiceError {
    #[error("Speech recognition is not available: {0}")]
    RecognitionUnavailable(String),

    #[error("Speech recognition failed: {0}")]
    Recognition(String),

    #[error("Speech synthesis failed: {0}")]
    Synthesis(String),

    #[error("Audio playback failed: {0}")]
    Playback(String),
}

/// Speech input/output channel for exchanges
///
/// `listen` turns a recorded question into text; `speak` synthesizes an
/// answer and plays it through an external player process. Playback never
/// queues: a new `speak` pre-empts whatever is still playing.
pub struct VoiceAdapter {
    transcriber: Transcriber,
    synthesizer: SpeechSynthesizer,
    voices: Vec<String>,
    preferred_voice: String,
    player: String,
    player_args: Vec<String>,
    audio_dir: PathBuf,
    playback: Option<Child>,
}

impl VoiceAdapter {
    /// Create a voice adapter; synthesized audio is written under `audio_dir`
    pub fn new(config: &VoiceConfig, audio_dir: impl Into<PathBuf>) -> Self {
        Self {
            transcriber: Transcriber::new(&config.transcription),
            synthesizer: SpeechSynthesizer::new(&config.speech),
            voices: config.speech.voices.clone(),
            preferred_voice: config.speech.preferred_voice.clone(),
            player: config.speech.player.clone(),
            player_args: config.speech.player_args.clone(),
            audio_dir: audio_dir.into(),
            playback: None,
        }
    }

    /// Whether speech recognition is available
    pub fn can_listen(&self) -> bool {
        self.transcriber.is_configured()
    }

    /// Whether speech synthesis is available
    pub fn can_speak(&self) -> bool {
        self.synthesizer.is_configured()
    }

    /// Transcribe a recorded question
    ///
    /// Unavailable recognition is reported so the caller can alert the user;
    /// runtime failures are logged here and only signalled to the caller.
    pub async fn listen(&self, audio: &Path) -> Result<String, VoiceError> {
        if !self.can_listen() {
            return Err(VoiceError::RecognitionUnavailable(
                "no transcription API key is configured".to_string(),
            ));
        }

        match self.transcriber.transcribe(audio).await {
            Ok(text) => Ok(text),
            Err(e) => {
                error!("Speech recognition failed: {}", e);
                Err(VoiceError::Recognition(e.to_string()))
            }
        }
    }

    /// Speak an answer, pre-empting any playback still running
    ///
    /// Empty input, or input that is empty once pictographs are stripped,
    /// is a no-op.
    pub async fn speak(&mut self, text: &str) -> Result<(), VoiceError> {
        let clean = strip_pictographs(text);
        if clean.is_empty() {
            return Ok(());
        }

        self.stop_playback().await;

        let voice = select_voice(&self.voices, &self.preferred_voice)
            .unwrap_or("default")
            .to_string();
        let audio = self
            .synthesizer
            .synthesize(&clean, &voice)
            .await
            .map_err(|e| VoiceError::Synthesis(e.to_string()))?;

        tokio::fs::create_dir_all(&self.audio_dir)
            .await
            .map_err(|e| VoiceError::Playback(e.to_string()))?;
        let path = self.audio_dir.join("answer.mp3");
        tokio::fs::write(&path, &audio)
            .await
            .map_err(|e| VoiceError::Playback(e.to_string()))?;

        let child = Command::new(&self.player)
            .args(&self.player_args)
            .arg(&path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                VoiceError::Playback(format!("failed to start {}: {}", self.player, e))
            })?;
        self.playback = Some(child);
        Ok(())
    }

    /// Kill the player from the previous utterance if it is still running
    pub async fn stop_playback(&mut self) {
        if let Some(mut child) = self.playback.take() {
            if let Err(e) = child.start_kill() {
                debug!("Playback process already finished: {}", e);
            }
            let _ = child.wait().await;
        }
    }
}
