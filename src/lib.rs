//! Friday - a voice-driven conversational agent
//!
//! This library provides the core functionality for the assistant:
//! - Intent routing of recognized utterances to response strategies
//! - The listen/respond session loop and its exit condition
//! - Voice processing (microphone endpointing, STT, TTS, playback)
//! - Knowledge lookups (Wikipedia summaries, web search snippets)
//! - Open-domain replies from a chat-completions model
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                   Collaborators                      │
//! │   Microphone/STT  │  Speaker/TTS  │  stdin/stdout   │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │                  SessionLoop                         │
//! │   Listening → Recognizing → Routing → Speaking      │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │                  IntentRouter                        │
//! │   Greeting │ Clock │ Wikipedia │ Search │ Model     │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod agent;
pub mod config;
pub mod error;
pub mod knowledge;
pub mod model;
pub mod setup;
pub mod voice;

pub use agent::{
    ConversationalModel, EncyclopediaProvider, Intent, IntentRouter, Reply, SessionLoop,
    SessionState, SpeechCapture, SpeechOutput, Utterance, WebSearchProvider,
};
pub use config::Config;
pub use error::{Error, RecognitionError, Result};
pub use knowledge::{SearchProvider, WebSearchTool, WikipediaClient};
pub use model::ChatModel;
