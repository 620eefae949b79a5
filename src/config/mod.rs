//! Configuration management for Friday
//!
//! Every setting resolves as env > TOML file > default. A `.env` file in
//! the working directory feeds the env layer without overriding variables
//! that are already set.

pub mod file;

use std::path::{Path, PathBuf};

use crate::knowledge::SearchProvider;
use crate::model::{self, ChatModelConfig};
use crate::voice::{DEFAULT_ENERGY_THRESHOLD, SttProvider, TtsProvider, TtsVoice};
use crate::{Error, Result};

pub use file::FridayConfigFile;

/// Name the agent answers to unless configured otherwise
pub const DEFAULT_AGENT_NAME: &str = "Fawks";

/// Friday configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Agent identity
    pub agent: AgentConfig,

    /// Voice configuration
    pub voice: VoiceConfig,

    /// Conversational model configuration
    pub model: ModelConfig,

    /// Preferred web search provider ("google", "serper", "brave")
    pub search_provider: Option<String>,

    /// API keys
    pub api_keys: ApiKeys,
}

/// Agent identity
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Name the agent answers to
    pub name: String,

    /// Contact email for the encyclopedia User-Agent
    pub contact_email: Option<String>,

    /// Wikipedia language edition
    pub wikipedia_language: String,
}

/// Voice processing configuration
#[derive(Debug, Clone)]
pub struct VoiceConfig {
    /// Use microphone and speaker (otherwise stdin/stdout)
    pub enabled: bool,

    /// STT backend
    pub stt_provider: SttProvider,

    /// STT model (e.g. "whisper-1", "nova-2")
    pub stt_model: String,

    /// TTS backend
    pub tts_provider: TtsProvider,

    /// TTS model (e.g. "tts-1", "eleven_monolingual_v1")
    pub tts_model: String,

    /// TTS voice identifier
    pub tts_voice: String,

    /// TTS speed multiplier (0.25 to 4.0)
    pub tts_speed: f64,

    /// RMS energy above which microphone input counts as speech
    pub energy_threshold: f32,
}

/// Conversational model configuration
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// OpenAI-compatible endpoint base URL
    pub base_url: String,

    /// Model identifier
    pub model: String,

    /// System prompt; derived from the agent name if unset
    pub system_prompt: Option<String>,

    /// Messages of history kept between turns
    pub max_history: usize,
}

/// API keys for external services
#[derive(Clone, Default)]
pub struct ApiKeys {
    /// `OpenAI` API key (Whisper, TTS, chat)
    pub openai: Option<String>,

    /// Key for a non-OpenAI chat endpoint (e.g. `OpenRouter`)
    pub model: Option<String>,

    /// Deepgram API key (optional STT)
    pub deepgram: Option<String>,

    /// `ElevenLabs` API key (optional TTS)
    pub elevenlabs: Option<String>,

    /// Google Custom Search API key
    pub google: Option<String>,

    /// Google programmable search engine ID
    pub google_cse_id: Option<String>,

    /// Serper API key
    pub serper: Option<String>,

    /// Brave Search API key
    pub brave: Option<String>,
}

impl std::fmt::Debug for ApiKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let set = |k: &Option<String>| if k.is_some() { "set" } else { "unset" };
        f.debug_struct("ApiKeys")
            .field("openai", &set(&self.openai))
            .field("model", &set(&self.model))
            .field("deepgram", &set(&self.deepgram))
            .field("elevenlabs", &set(&self.elevenlabs))
            .field("google", &set(&self.google))
            .field("google_cse_id", &set(&self.google_cse_id))
            .field("serper", &set(&self.serper))
            .field("brave", &set(&self.brave))
            .finish()
    }
}

/// Command-line overrides applied on top of env and file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// Agent name
    pub name: Option<String>,

    /// Force voice off
    pub disable_voice: bool,
}

/// Load `.env` into the process environment, if present
///
/// `FRIDAY_ENV_FILE` names the file explicitly; otherwise `.env` is looked
/// up from the working directory upwards.
///
/// # Errors
///
/// Returns error if the file exists but cannot be parsed, or if
/// `FRIDAY_ENV_FILE` points at a missing file
pub fn load_dotenv() -> Result<Option<PathBuf>> {
    if let Some(path) = std::env::var_os("FRIDAY_ENV_FILE") {
        let path = PathBuf::from(path);
        load_dotenv_from(&path)?;
        return Ok(Some(path));
    }

    match dotenvy::dotenv() {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(Error::Config(format!(".env: {e}"))),
    }
}

/// Load a specific env file into the process environment
///
/// # Errors
///
/// Returns error if the file cannot be read or parsed
pub fn load_dotenv_from(path: &Path) -> Result<()> {
    dotenvy::from_path(path).map_err(|e| Error::Config(format!("{}: {e}", path.display())))
}

impl Config {
    /// Load configuration from the process environment and config file
    ///
    /// Call [`load_dotenv`] first to pick up a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns error if a setting is invalid
    pub fn load(overrides: &Overrides) -> Result<Self> {
        let fc = file::load_config_file();
        Self::resolve(fc, |key| std::env::var(key).ok(), overrides)
    }

    /// Resolve configuration from a parsed file and an env lookup
    ///
    /// # Errors
    ///
    /// Returns error if a setting is invalid
    pub fn resolve<E>(fc: FridayConfigFile, env: E, overrides: &Overrides) -> Result<Self>
    where
        E: Fn(&str) -> Option<String>,
    {
        // Agent identity (flag > env > toml > default)
        let name = overrides
            .name
            .clone()
            .or_else(|| env("FRIDAY_NAME"))
            .or(fc.agent.name)
            .unwrap_or_else(|| DEFAULT_AGENT_NAME.to_string())
            .trim()
            .to_string();
        if name.is_empty() {
            return Err(Error::Config("agent name must not be empty".to_string()));
        }

        let agent = AgentConfig {
            name,
            contact_email: env("FRIDAY_USER_EMAIL")
                .or_else(|| env("USER_EMAIL"))
                .or(fc.agent.contact_email),
            wikipedia_language: env("FRIDAY_WIKIPEDIA_LANG")
                .or(fc.agent.wikipedia_language)
                .unwrap_or_else(|| "en".to_string()),
        };

        // API keys (env > toml > None)
        let api_keys = ApiKeys {
            openai: env("OPENAI_API_KEY").or(fc.api_keys.openai),
            model: env("FRIDAY_MODEL_API_KEY").or(fc.api_keys.model),
            deepgram: env("DEEPGRAM_API_KEY").or(fc.api_keys.deepgram),
            elevenlabs: env("ELEVENLABS_API_KEY").or(fc.api_keys.elevenlabs),
            google: env("GOOGLE_API_KEY").or(fc.api_keys.google),
            google_cse_id: env("GOOGLE_CSE_ID").or(fc.api_keys.google_cse_id),
            serper: env("SERPER_API_KEY").or(fc.api_keys.serper),
            brave: env("BRAVE_API_KEY").or(fc.api_keys.brave),
        };

        // Voice config (env > toml > default)
        let stt_provider = fc
            .voice
            .stt_provider
            .as_deref()
            .map_or(Ok(SttProvider::Whisper), SttProvider::parse)?;
        let tts_provider = fc
            .voice
            .tts_provider
            .as_deref()
            .map_or(Ok(TtsProvider::OpenAI), TtsProvider::parse)?;

        let default_stt_model = match stt_provider {
            SttProvider::Whisper => "whisper-1",
            SttProvider::Deepgram => "nova-2",
        };
        let (default_tts_model, default_tts_voice) = match tts_provider {
            TtsProvider::OpenAI => ("tts-1", "alloy"),
            TtsProvider::ElevenLabs => ("eleven_monolingual_v1", "21m00Tcm4TlvDq8ikWAM"),
        };

        let voice = VoiceConfig {
            enabled: !overrides.disable_voice && fc.voice.enabled.unwrap_or(true),
            stt_provider,
            stt_model: env("FRIDAY_STT_MODEL")
                .or(fc.voice.stt_model)
                .unwrap_or_else(|| default_stt_model.to_string()),
            tts_provider,
            tts_model: env("FRIDAY_TTS_MODEL")
                .or(fc.voice.tts_model)
                .unwrap_or_else(|| default_tts_model.to_string()),
            tts_voice: fc
                .voice
                .tts_voice
                .unwrap_or_else(|| default_tts_voice.to_string()),
            tts_speed: fc.voice.tts_speed.unwrap_or(1.0).clamp(0.25, 4.0),
            energy_threshold: fc
                .voice
                .energy_threshold
                .unwrap_or(DEFAULT_ENERGY_THRESHOLD),
        };

        if overrides.disable_voice {
            tracing::info!("voice disabled, using console input and output");
        }

        // Conversational model (env > toml > default)
        let model = ModelConfig {
            base_url: env("FRIDAY_MODEL_URL")
                .or(fc.model.base_url)
                .unwrap_or_else(|| model::DEFAULT_BASE_URL.to_string()),
            model: env("FRIDAY_MODEL")
                .or(fc.model.model)
                .unwrap_or_else(|| model::DEFAULT_MODEL.to_string()),
            system_prompt: fc.model.system_prompt,
            max_history: fc.model.max_history.unwrap_or(12),
        };

        let search_provider = env("FRIDAY_SEARCH_PROVIDER").or(fc.search.provider);

        Ok(Self {
            agent,
            voice,
            model,
            search_provider,
            api_keys,
        })
    }

    /// Web search provider to use, if its credentials are present
    ///
    /// # Errors
    ///
    /// Returns error if the preferred provider is unknown or lacks keys
    pub fn search(&self) -> Result<Option<SearchProvider>> {
        let keys = &self.api_keys;
        let google = || {
            keys.google
                .clone()
                .zip(keys.google_cse_id.clone())
                .map(|(api_key, cse_id)| SearchProvider::Google { api_key, cse_id })
        };
        let serper = || {
            keys.serper
                .clone()
                .map(|api_key| SearchProvider::Serper { api_key })
        };
        let brave = || {
            keys.brave
                .clone()
                .map(|api_key| SearchProvider::Brave { api_key })
        };

        let Some(preferred) = self.search_provider.as_deref() else {
            return Ok(google().or_else(serper).or_else(brave));
        };

        let provider = match preferred.trim().to_lowercase().as_str() {
            "google" => google(),
            "serper" => serper(),
            "brave" => brave(),
            other => return Err(Error::Config(format!("unknown search provider: {other}"))),
        };

        provider
            .map(Some)
            .ok_or_else(|| Error::Config(format!("search provider {preferred} has no API key")))
    }

    /// Settings for the conversational model handle
    #[must_use]
    pub fn chat_model(&self) -> ChatModelConfig {
        let system_prompt = self.model.system_prompt.clone().unwrap_or_else(|| {
            format!(
                "You are {}, a friendly voice assistant. Keep replies short and conversational.",
                self.agent.name
            )
        });

        ChatModelConfig {
            base_url: self.model.base_url.clone(),
            api_key: self.api_keys.model.clone().or_else(|| self.api_keys.openai.clone()),
            model: self.model.model.clone(),
            system_prompt: Some(system_prompt),
            max_history: self.model.max_history,
        }
    }

    /// API key for the configured STT provider
    #[must_use]
    pub fn stt_api_key(&self) -> Option<&str> {
        match self.voice.stt_provider {
            SttProvider::Whisper => self.api_keys.openai.as_deref(),
            SttProvider::Deepgram => self.api_keys.deepgram.as_deref(),
        }
    }

    /// API key for the configured TTS provider
    #[must_use]
    pub fn tts_api_key(&self) -> Option<&str> {
        match self.voice.tts_provider {
            TtsProvider::OpenAI => self.api_keys.openai.as_deref(),
            TtsProvider::ElevenLabs => self.api_keys.elevenlabs.as_deref(),
        }
    }

    /// Voice settings for synthesis
    #[must_use]
    pub fn tts_voice(&self) -> TtsVoice {
        TtsVoice {
            model: self.voice.tts_model.clone(),
            voice: self.voice.tts_voice.clone(),
            speed: self.voice.tts_speed,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn resolve(fc: FridayConfigFile, vars: &[(&str, &str)]) -> Result<Config> {
        let env: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Config::resolve(fc, |k| env.get(k).cloned(), &Overrides::default())
    }

    #[test]
    fn test_dotenv_feeds_env_layer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(
            &path,
            "FRIDAY_WIKIPEDIA_LANG=de\nFRIDAY_DOTENV_UNSET_CHECK=from-file\n",
        )
        .unwrap();

        load_dotenv_from(&path).unwrap();

        let config = Config::resolve(
            FridayConfigFile::default(),
            |k| std::env::var(k).ok(),
            &Overrides::default(),
        )
        .unwrap();
        assert_eq!(config.agent.wikipedia_language, "de");
        assert_eq!(
            std::env::var("FRIDAY_DOTENV_UNSET_CHECK").as_deref(),
            Ok("from-file")
        );
    }

    #[test]
    fn test_dotenv_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_dotenv_from(&dir.path().join("absent.env")),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_defaults() {
        let config = resolve(FridayConfigFile::default(), &[]).unwrap();
        assert_eq!(config.agent.name, DEFAULT_AGENT_NAME);
        assert_eq!(config.agent.wikipedia_language, "en");
        assert!(config.voice.enabled);
        assert_eq!(config.voice.stt_provider, SttProvider::Whisper);
        assert_eq!(config.voice.stt_model, "whisper-1");
        assert_eq!(config.voice.tts_voice, "alloy");
        assert_eq!(config.model.model, model::DEFAULT_MODEL);
        assert!(config.search().unwrap().is_none());
    }

    #[test]
    fn test_env_beats_file() {
        let mut fc = FridayConfigFile::default();
        fc.agent.name = Some("FromFile".to_string());
        fc.api_keys.openai = Some("file-key".to_string());

        let config = resolve(fc, &[("FRIDAY_NAME", "FromEnv"), ("OPENAI_API_KEY", "env-key")])
            .unwrap();
        assert_eq!(config.agent.name, "FromEnv");
        assert_eq!(config.api_keys.openai.as_deref(), Some("env-key"));
    }

    #[test]
    fn test_override_beats_env() {
        let overrides = Overrides {
            name: Some("Flag".to_string()),
            disable_voice: true,
        };
        let config = Config::resolve(
            FridayConfigFile::default(),
            |k| (k == "FRIDAY_NAME").then(|| "Env".to_string()),
            &overrides,
        )
        .unwrap();
        assert_eq!(config.agent.name, "Flag");
        assert!(!config.voice.enabled);
    }

    #[test]
    fn test_blank_name_rejected() {
        assert!(matches!(
            resolve(FridayConfigFile::default(), &[("FRIDAY_NAME", "   ")]),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_legacy_user_email() {
        let config = resolve(FridayConfigFile::default(), &[("USER_EMAIL", "me@example.com")])
            .unwrap();
        assert_eq!(config.agent.contact_email.as_deref(), Some("me@example.com"));
    }

    #[test]
    fn test_search_auto_selection() {
        let config = resolve(
            FridayConfigFile::default(),
            &[("GOOGLE_API_KEY", "g"), ("SERPER_API_KEY", "s")],
        )
        .unwrap();
        // Google needs both the key and the engine ID
        assert!(matches!(config.search().unwrap(), Some(SearchProvider::Serper { .. })));

        let config = resolve(
            FridayConfigFile::default(),
            &[("GOOGLE_API_KEY", "g"), ("GOOGLE_CSE_ID", "cx"), ("SERPER_API_KEY", "s")],
        )
        .unwrap();
        assert!(matches!(config.search().unwrap(), Some(SearchProvider::Google { .. })));
    }

    #[test]
    fn test_preferred_search_without_key() {
        let config = resolve(FridayConfigFile::default(), &[("FRIDAY_SEARCH_PROVIDER", "brave")])
            .unwrap();
        assert!(config.search().is_err());

        let config = resolve(FridayConfigFile::default(), &[("FRIDAY_SEARCH_PROVIDER", "bing")])
            .unwrap();
        assert!(config.search().is_err());
    }

    #[test]
    fn test_elevenlabs_defaults() {
        let mut fc = FridayConfigFile::default();
        fc.voice.tts_provider = Some("elevenlabs".to_string());
        fc.api_keys.elevenlabs = Some("el".to_string());

        let config = resolve(fc, &[]).unwrap();
        assert_eq!(config.voice.tts_model, "eleven_monolingual_v1");
        assert_eq!(config.tts_api_key(), Some("el"));
    }

    #[test]
    fn test_unknown_stt_provider() {
        let mut fc = FridayConfigFile::default();
        fc.voice.stt_provider = Some("sphinx".to_string());
        assert!(resolve(fc, &[]).is_err());
    }

    #[test]
    fn test_chat_model_prompt_mentions_name() {
        let config = resolve(FridayConfigFile::default(), &[("OPENAI_API_KEY", "sk")]).unwrap();
        let chat = config.chat_model();
        assert_eq!(chat.api_key.as_deref(), Some("sk"));
        assert!(chat.system_prompt.unwrap_or_default().contains("Fawks"));
    }

    #[test]
    fn test_api_keys_debug_hides_values() {
        let config = resolve(FridayConfigFile::default(), &[("OPENAI_API_KEY", "sk-secret")])
            .unwrap();
        let debug = format!("{:?}", config.api_keys);
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("set"));
    }
}
