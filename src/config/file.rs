//! TOML configuration file loading
//!
//! Supports `~/.config/friday/config.toml` as a persistent config source.
//! All fields are optional; the file is a partial overlay on top of defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct FridayConfigFile {
    /// Agent identity
    #[serde(default)]
    pub agent: AgentFileConfig,

    /// Voice/audio configuration
    #[serde(default)]
    pub voice: VoiceFileConfig,

    /// Conversational model configuration
    #[serde(default)]
    pub model: ModelFileConfig,

    /// Web search configuration
    #[serde(default)]
    pub search: SearchFileConfig,

    /// API keys for external services
    #[serde(default)]
    pub api_keys: ApiKeysFileConfig,
}

/// Agent identity
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct AgentFileConfig {
    /// Name the agent answers to (e.g. "Fawks")
    pub name: Option<String>,

    /// Contact email sent in the encyclopedia User-Agent
    pub contact_email: Option<String>,

    /// Wikipedia language edition (e.g. "en")
    pub wikipedia_language: Option<String>,
}

/// Voice processing configuration
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct VoiceFileConfig {
    /// Enable microphone and speaker
    pub enabled: Option<bool>,

    /// STT provider ("whisper" or "deepgram")
    pub stt_provider: Option<String>,

    /// STT model (e.g. "whisper-1")
    pub stt_model: Option<String>,

    /// TTS provider ("openai" or "elevenlabs")
    pub tts_provider: Option<String>,

    /// TTS model (e.g. "tts-1")
    pub tts_model: Option<String>,

    /// TTS voice identifier (e.g. "alloy")
    pub tts_voice: Option<String>,

    /// TTS speed multiplier
    pub tts_speed: Option<f64>,

    /// RMS energy above which microphone input counts as speech
    pub energy_threshold: Option<f32>,
}

/// Conversational model configuration
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ModelFileConfig {
    /// OpenAI-compatible endpoint base URL
    pub base_url: Option<String>,

    /// Model identifier (e.g. "gpt-4o-mini")
    pub model: Option<String>,

    /// System prompt
    pub system_prompt: Option<String>,

    /// Messages of history kept between turns
    pub max_history: Option<usize>,
}

/// Web search configuration
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SearchFileConfig {
    /// Provider ("google", "serper" or "brave"); picked from keys if unset
    pub provider: Option<String>,
}

/// API keys configuration
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ApiKeysFileConfig {
    pub openai: Option<String>,
    pub model: Option<String>,
    pub deepgram: Option<String>,
    pub elevenlabs: Option<String>,
    pub google: Option<String>,
    pub google_cse_id: Option<String>,
    pub serper: Option<String>,
    pub brave: Option<String>,
}

/// Load the TOML config file from the standard path
///
/// Returns `FridayConfigFile::default()` if the file doesn't exist or can't be parsed.
pub fn load_config_file() -> FridayConfigFile {
    config_file_path().map_or_else(FridayConfigFile::default, |path| load_config_file_from(&path))
}

/// Load a TOML config file from `path`, falling back to defaults
pub fn load_config_file_from(path: &Path) -> FridayConfigFile {
    if !path.exists() {
        return FridayConfigFile::default();
    }

    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "loaded config file");
                config
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to parse config file, using defaults"
                );
                FridayConfigFile::default()
            }
        },
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to read config file"
            );
            FridayConfigFile::default()
        }
    }
}

/// Write a config file, creating its directory
///
/// # Errors
///
/// Returns error if serialization or the write fails
pub fn write_config_file(path: &Path, config: &FridayConfigFile) -> crate::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let content = toml::to_string_pretty(config)
        .map_err(|e| crate::Error::Config(format!("failed to serialize config: {e}")))?;
    std::fs::write(path, content)?;

    Ok(())
}

/// Return the config file path: `~/.config/friday/config.toml`
pub fn config_file_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.config_dir().join("friday").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file() {
        let parsed: FridayConfigFile = toml::from_str(
            r#"
            [agent]
            name = "Jarvis"

            [api_keys]
            google = "g-key"
            "#,
        )
        .unwrap();

        assert_eq!(parsed.agent.name.as_deref(), Some("Jarvis"));
        assert_eq!(parsed.api_keys.google.as_deref(), Some("g-key"));
        assert!(parsed.voice.enabled.is_none());
        assert!(parsed.model.model.is_none());
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_config_file_from(&dir.path().join("nope.toml"));
        assert!(loaded.agent.name.is_none());
    }

    #[test]
    fn test_unparseable_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "agent = [not valid").unwrap();

        let loaded = load_config_file_from(&path);
        assert!(loaded.agent.name.is_none());
    }

    #[test]
    fn test_write_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = FridayConfigFile::default();
        config.agent.name = Some("Fawks".to_string());
        config.voice.tts_speed = Some(1.25);
        write_config_file(&path, &config).unwrap();

        let loaded = load_config_file_from(&path);
        assert_eq!(loaded.agent.name.as_deref(), Some("Fawks"));
        assert_eq!(loaded.voice.tts_speed, Some(1.25));
    }
}
