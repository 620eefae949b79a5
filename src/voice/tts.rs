//! Text-to-speech (TTS) synthesis

use crate::{Error, Result};

/// TTS provider backend
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TtsProvider {
    /// `OpenAI` speech API
    OpenAI,
    /// `ElevenLabs`
    ElevenLabs,
}

impl TtsProvider {
    /// Parse a provider name from configuration
    ///
    /// # Errors
    ///
    /// Returns error for unknown names
    pub fn parse(name: &str) -> Result<Self> {
        match name.trim().to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAI),
            "elevenlabs" => Ok(Self::ElevenLabs),
            other => Err(Error::Config(format!("unknown TTS provider: {other}"))),
        }
    }
}

/// Voice settings for synthesis
#[derive(Debug, Clone)]
pub struct TtsVoice {
    /// Model identifier (e.g. "tts-1", "eleven_monolingual_v1")
    pub model: String,
    /// Voice name (`OpenAI`) or voice ID (`ElevenLabs`)
    pub voice: String,
    /// Speed multiplier; only `OpenAI` honours it
    pub speed: f64,
}

/// Synthesizes speech from text as MP3
pub struct TextToSpeech {
    client: reqwest::Client,
    api_key: String,
    voice: TtsVoice,
    provider: TtsProvider,
}

impl TextToSpeech {
    /// Create a synthesizer for `provider`
    ///
    /// # Errors
    ///
    /// Returns error if API key is missing
    pub fn new(provider: TtsProvider, api_key: String, voice: TtsVoice) -> Result<Self> {
        if api_key.is_empty() {
            let needed = match provider {
                TtsProvider::OpenAI => "OPENAI_API_KEY",
                TtsProvider::ElevenLabs => "ELEVENLABS_API_KEY",
            };
            return Err(Error::Config(format!("{needed} required for speech output")));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            voice,
            provider,
        })
    }

    /// Synthesize text to MP3 bytes
    ///
    /// # Errors
    ///
    /// Returns error if synthesis fails
    pub async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        tracing::debug!(chars = text.len(), provider = ?self.provider, "synthesizing speech");

        match self.provider {
            TtsProvider::OpenAI => self.synthesize_openai(text).await,
            TtsProvider::ElevenLabs => self.synthesize_elevenlabs(text).await,
        }
    }

    async fn synthesize_openai(&self, text: &str) -> Result<Vec<u8>> {
        #[derive(serde::Serialize)]
        struct TtsRequest<'a> {
            model: &'a str,
            input: &'a str,
            voice: &'a str,
            speed: f64,
        }

        let request = TtsRequest {
            model: &self.voice.model,
            input: text,
            voice: &self.voice.voice,
            speed: self.voice.speed,
        };

        let response = self
            .client
            .post("https://api.openai.com/v1/audio/speech")
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Tts(format!("OpenAI TTS error {status}: {body}")));
        }

        Ok(response.bytes().await?.to_vec())
    }

    async fn synthesize_elevenlabs(&self, text: &str) -> Result<Vec<u8>> {
        #[derive(serde::Serialize)]
        struct ElevenLabsRequest<'a> {
            text: &'a str,
            model_id: &'a str,
        }

        let url = format!(
            "https://api.elevenlabs.io/v1/text-to-speech/{}",
            urlencoding::encode(&self.voice.voice)
        );

        let request = ElevenLabsRequest {
            text,
            model_id: &self.voice.model,
        };

        let response = self
            .client
            .post(&url)
            .header("xi-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Tts(format!("ElevenLabs TTS error {status}: {body}")));
        }

        Ok(response.bytes().await?.to_vec())
    }
}
