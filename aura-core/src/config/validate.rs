//! Configuration validation rules.

use super::schema::Config;

/// Validate configuration and return aggregated validation errors.
pub fn validate_config(config: &Config) -> crate::Result<()> {
    let mut errors = Vec::new();

    if config.ask.base_url.trim().is_empty() {
        errors.push("ask.base_url must not be empty".to_string());
    } else if !config.ask.base_url.starts_with("http://")
        && !config.ask.base_url.starts_with("https://")
    {
        errors.push("ask.base_url must be an http(s) URL".to_string());
    }

    if config.storage.data_dir.trim().is_empty() {
        errors.push("storage.data_dir must not be empty".to_string());
    }

    if !(0.25..=4.0).contains(&config.voice.speech.speed) {
        errors.push("voice.speech.speed must be in [0.25, 4.0]".to_string());
    }
    if !(0.25..=4.0).contains(&config.voice.speech.pitch) {
        errors.push("voice.speech.pitch must be in [0.25, 4.0]".to_string());
    }
    if regex::Regex::new(&config.voice.speech.preferred_voice).is_err() {
        errors.push("voice.speech.preferred_voice must be a valid regex".to_string());
    }
    if config.voice.speech.player.trim().is_empty() {
        errors.push("voice.speech.player must not be empty".to_string());
    }

    if config.logging.dir.trim().is_empty() {
        errors.push("logging.dir must not be empty".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(crate::Error::Validation(errors.join("; ")))
    }
}
