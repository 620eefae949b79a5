//! Error types for Friday

use thiserror::Error;

/// Result type alias for Friday operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in Friday
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Audio error
    #[error("audio error: {0}")]
    Audio(String),

    /// Speech-to-text error
    #[error("STT error: {0}")]
    Stt(String),

    /// Text-to-speech error
    #[error("TTS error: {0}")]
    Tts(String),

    /// Knowledge lookup error (encyclopedia or web search)
    #[error("lookup error: {0}")]
    Lookup(String),

    /// Conversational model error
    #[error("model error: {0}")]
    Model(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Why a capture cycle produced no usable utterance
///
/// Always recovered by the session loop: the turn is routed as a
/// recognition failure and the loop keeps listening.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecognitionError {
    /// Audio was captured but no words could be made out
    #[error("speech was unintelligible")]
    Unintelligible,

    /// The recognizer could not be reached or rejected the request
    #[error("recognition service failed: {0}")]
    Service(String),
}

impl From<Error> for RecognitionError {
    fn from(err: Error) -> Self {
        Self::Service(err.to_string())
    }
}
