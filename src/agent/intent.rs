//! Utterances and the intents they classify into

use std::fmt;

/// Text produced by one capture-and-recognize cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Utterance {
    /// Words recognized from the speaker
    Recognized(String),
    /// Recognition failed; stands in for the missing text
    Unrecognized,
}

impl Utterance {
    /// Recognized text, or `None` for the failure sentinel
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Recognized(text) => Some(text),
            Self::Unrecognized => None,
        }
    }

    /// Whether this is the recognition-failure sentinel
    #[must_use]
    pub const fn is_unrecognized(&self) -> bool {
        matches!(self, Self::Unrecognized)
    }
}

impl From<&str> for Utterance {
    fn from(text: &str) -> Self {
        Self::Recognized(text.to_string())
    }
}

impl From<String> for Utterance {
    fn from(text: String) -> Self {
        Self::Recognized(text)
    }
}

impl fmt::Display for Utterance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Recognized(text) => f.write_str(text),
            Self::Unrecognized => f.write_str("<unrecognized>"),
        }
    }
}

/// Classified purpose of an utterance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    /// Speech could not be recognized
    RecognitionError,
    /// The agent was addressed by name
    Greeting,
    /// Asked for the current time
    ClockQuery,
    /// Thanked the agent
    Gratitude,
    /// Asked the agent to stop listening
    Farewell,
    /// "tell me about ..."
    EncyclopediaLookup,
    /// "search google for ..."
    WebSearchLookup,
    /// Anything else, handed to the conversational model
    Fallback,
}

impl Intent {
    /// Whether the session ends after this intent's turn
    #[must_use]
    pub const fn ends_session(self) -> bool {
        matches!(self, Self::Farewell)
    }

    /// Short tag used in logs
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RecognitionError => "recognition_error",
            Self::Greeting => "greeting",
            Self::ClockQuery => "clock_query",
            Self::Gratitude => "gratitude",
            Self::Farewell => "farewell",
            Self::EncyclopediaLookup => "encyclopedia_lookup",
            Self::WebSearchLookup => "web_search_lookup",
            Self::Fallback => "fallback",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A routed response together with the intent that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Intent selected for the utterance
    pub intent: Intent,
    /// Text to speak; may be empty
    pub text: String,
}

impl Reply {
    pub(crate) fn new(intent: Intent, text: impl Into<String>) -> Self {
        Self {
            intent,
            text: text.into(),
        }
    }

    /// Whether there is nothing worth speaking
    #[must_use]
    pub fn is_silent(&self) -> bool {
        self.text.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_farewell_ends_session() {
        assert!(Intent::Farewell.ends_session());
        assert!(!Intent::Gratitude.ends_session());
        assert!(!Intent::RecognitionError.ends_session());
    }

    #[test]
    fn test_silent_reply() {
        assert!(Reply::new(Intent::Fallback, "  \n").is_silent());
        assert!(!Reply::new(Intent::Fallback, "hi").is_silent());
    }

    #[test]
    fn test_utterance_text() {
        assert_eq!(Utterance::from("hello").text(), Some("hello"));
        assert!(Utterance::Unrecognized.text().is_none());
    }
}
