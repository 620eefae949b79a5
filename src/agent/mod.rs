//! Conversational core: intent routing and the session loop
//!
//! Each collaborator the core depends on is a trait here so the
//! microphone, speaker, lookups and model can be swapped for stubs.

mod clock;
mod intent;
pub mod phrases;
mod router;
mod session;

use async_trait::async_trait;

pub use clock::{Clock, FixedClock, SystemClock, format_time};
pub use intent::{Intent, Reply, Utterance};
pub use phrases::PhrasePicker;
pub use router::{ENCYCLOPEDIA_TRIGGER, IntentRouter, MAX_SUMMARY_CHARS, WEB_SEARCH_TRIGGER};
pub use session::{SessionLoop, SessionState, SessionSummary, TurnOutcome};

use crate::error::RecognitionError;
use crate::Result;

/// Captures one utterance and recognizes it as text
#[async_trait(?Send)]
pub trait SpeechCapture {
    /// Block until the speaker has said something
    ///
    /// # Errors
    ///
    /// Returns `RecognitionError` if the audio was unintelligible or the
    /// recognizer could not be reached
    async fn listen(&mut self) -> std::result::Result<String, RecognitionError>;
}

/// Renders response text as audio
#[async_trait(?Send)]
pub trait SpeechOutput {
    /// Speak `text`; empty or whitespace-only text is a no-op
    ///
    /// # Errors
    ///
    /// Returns error if synthesis or playback fails
    async fn speak(&mut self, text: &str) -> Result<()>;
}

/// Encyclopedia summary lookups
#[async_trait]
pub trait EncyclopediaProvider: Send + Sync {
    /// Summary for `topic`, or `None` if no such topic exists
    ///
    /// # Errors
    ///
    /// Returns error if the service cannot be reached
    async fn summarize(&self, topic: &str) -> Result<Option<String>>;
}

/// Web search lookups
#[async_trait]
pub trait WebSearchProvider: Send + Sync {
    /// Snippet of the top result for `query`, or `None` if nothing matched
    ///
    /// # Errors
    ///
    /// Returns error if the service cannot be reached
    async fn search(&self, query: &str) -> Result<Option<String>>;
}

/// Open-domain conversational model
///
/// Implementations keep their own conversation context between calls.
#[async_trait]
pub trait ConversationalModel: Send + Sync {
    /// Generate a reply to `text`
    ///
    /// # Errors
    ///
    /// Returns error if generation fails
    async fn reply(&self, text: &str) -> Result<String>;
}
