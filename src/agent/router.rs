//! Intent routing
//!
//! Classifies an utterance by walking an ordered rule list (first match
//! wins, case-insensitive substring containment) and dispatches the
//! resulting [`Intent`] to its response strategy.

use std::sync::Arc;

use super::clock::{Clock, SystemClock, format_time};
use super::intent::{Intent, Reply, Utterance};
use super::phrases::{self, PhrasePicker};
use super::{ConversationalModel, EncyclopediaProvider, WebSearchProvider};

/// Phrase that introduces an encyclopedia topic
pub const ENCYCLOPEDIA_TRIGGER: &str = "tell me about";

/// Phrase that introduces a web search query
pub const WEB_SEARCH_TRIGGER: &str = "search google for";

/// Longest encyclopedia summary spoken, in characters
pub const MAX_SUMMARY_CHARS: usize = 500;

/// What a rule looks for in the lowercased utterance
#[derive(Debug, Clone, Copy)]
enum Trigger {
    /// The agent's configured name
    AgentName,
    /// Any of these literal phrases
    AnyOf(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy)]
struct Rule {
    intent: Intent,
    trigger: Trigger,
}

/// Rules in priority order; recognition failures are handled before these
/// and anything left over falls back to the conversational model.
const RULES: &[Rule] = &[
    Rule {
        intent: Intent::Greeting,
        trigger: Trigger::AgentName,
    },
    Rule {
        intent: Intent::ClockQuery,
        trigger: Trigger::AnyOf(&["time"]),
    },
    Rule {
        intent: Intent::Gratitude,
        trigger: Trigger::AnyOf(&["thank", "thanks"]),
    },
    Rule {
        intent: Intent::Farewell,
        trigger: Trigger::AnyOf(&["exit", "close"]),
    },
    Rule {
        intent: Intent::EncyclopediaLookup,
        trigger: Trigger::AnyOf(&[ENCYCLOPEDIA_TRIGGER]),
    },
    Rule {
        intent: Intent::WebSearchLookup,
        trigger: Trigger::AnyOf(&[WEB_SEARCH_TRIGGER]),
    },
];

/// Selects and runs exactly one response strategy per utterance
pub struct IntentRouter {
    name: String,
    name_lower: String,
    encyclopedia: Arc<dyn EncyclopediaProvider>,
    web_search: Arc<dyn WebSearchProvider>,
    model: Arc<dyn ConversationalModel>,
    clock: Box<dyn Clock>,
    phrases: PhrasePicker,
}

impl IntentRouter {
    /// Create a router for an agent called `name`
    pub fn new(
        name: impl Into<String>,
        encyclopedia: Arc<dyn EncyclopediaProvider>,
        web_search: Arc<dyn WebSearchProvider>,
        model: Arc<dyn ConversationalModel>,
    ) -> Self {
        let name = name.into();
        let name_lower = name.trim().to_lowercase();

        Self {
            name,
            name_lower,
            encyclopedia,
            web_search,
            model,
            clock: Box::new(SystemClock),
            phrases: PhrasePicker::new(),
        }
    }

    /// Replace the clock used for time queries
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Replace the phrase sampler (seed it for reproducible replies)
    #[must_use]
    pub fn with_phrases(mut self, phrases: PhrasePicker) -> Self {
        self.phrases = phrases;
        self
    }

    /// The agent's name as configured
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Classify an utterance without running any strategy
    #[must_use]
    pub fn classify(&self, utterance: &Utterance) -> Intent {
        let Some(text) = utterance.text() else {
            return Intent::RecognitionError;
        };
        let lowered = text.to_lowercase();

        RULES
            .iter()
            .find(|rule| self.matches(rule.trigger, &lowered))
            .map_or(Intent::Fallback, |rule| rule.intent)
    }

    /// Route an utterance to its strategy and return the response
    ///
    /// Never fails: collaborator errors become not-found style replies.
    pub async fn route(&mut self, utterance: &Utterance) -> Reply {
        let intent = self.classify(utterance);
        tracing::debug!(%intent, %utterance, "intent selected");

        let text = match (intent, utterance.text()) {
            (Intent::RecognitionError, _) | (_, None) => phrases::RECOGNITION_ERROR.to_string(),
            (Intent::Greeting, Some(_)) => phrases::greeting(&self.name),
            (Intent::ClockQuery, Some(_)) => format_time(self.clock.now()),
            (Intent::Gratitude, Some(_)) => self.phrases.pick(phrases::GRATITUDE).to_string(),
            (Intent::Farewell, Some(_)) => self.phrases.pick(phrases::FAREWELL).to_string(),
            (Intent::EncyclopediaLookup, Some(text)) => self.lookup_encyclopedia(text).await,
            (Intent::WebSearchLookup, Some(text)) => self.lookup_web(text).await,
            (Intent::Fallback, Some(text)) => self.converse(text).await,
        };

        Reply::new(intent, text)
    }

    fn matches(&self, trigger: Trigger, lowered: &str) -> bool {
        match trigger {
            Trigger::AgentName => !self.name_lower.is_empty() && lowered.contains(&self.name_lower),
            Trigger::AnyOf(needles) => needles.iter().any(|needle| lowered.contains(needle)),
        }
    }

    async fn lookup_encyclopedia(&self, text: &str) -> String {
        let lowered = text.to_lowercase();
        let Some(topic) = topic_after_first(&lowered, ENCYCLOPEDIA_TRIGGER) else {
            return phrases::MISSING_TOPIC.to_string();
        };

        tracing::info!(topic, "looking up encyclopedia summary");
        match self.encyclopedia.summarize(topic).await {
            Ok(Some(summary)) => truncate_chars(&summary, MAX_SUMMARY_CHARS),
            Ok(None) => phrases::NOT_FOUND.to_string(),
            Err(e) => {
                tracing::warn!(error = %e, topic, "encyclopedia lookup failed");
                phrases::NOT_FOUND.to_string()
            }
        }
    }

    async fn lookup_web(&self, text: &str) -> String {
        let lowered = text.to_lowercase();
        let Some(query) = topic_after_last(&lowered, WEB_SEARCH_TRIGGER) else {
            return phrases::MISSING_QUERY.to_string();
        };

        tracing::info!(query, "searching the web");
        match self.web_search.search(query).await {
            Ok(Some(snippet)) => snippet,
            Ok(None) => phrases::NOT_FOUND.to_string(),
            Err(e) => {
                tracing::warn!(error = %e, query, "web search failed");
                phrases::NOT_FOUND.to_string()
            }
        }
    }

    async fn converse(&self, text: &str) -> String {
        match self.model.reply(text).await {
            Ok(reply) => reply.trim().to_string(),
            Err(e) => {
                tracing::warn!(error = %e, "conversational model failed");
                phrases::MODEL_UNAVAILABLE.to_string()
            }
        }
    }
}

/// Trimmed text after the first occurrence of `phrase`, if non-empty
fn topic_after_first<'a>(lowered: &'a str, phrase: &str) -> Option<&'a str> {
    lowered
        .find(phrase)
        .map(|pos| lowered[pos + phrase.len()..].trim())
        .filter(|topic| !topic.is_empty())
}

/// Trimmed text after the last occurrence of `phrase`, if non-empty
fn topic_after_last<'a>(lowered: &'a str, phrase: &str) -> Option<&'a str> {
    lowered
        .rfind(phrase)
        .map(|pos| lowered[pos + phrase.len()..].trim())
        .filter(|topic| !topic.is_empty())
}

/// Keep at most `max` characters
fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_after_first() {
        assert_eq!(
            topic_after_first("please tell me about  the moon ", ENCYCLOPEDIA_TRIGGER),
            Some("the moon")
        );
        assert_eq!(topic_after_first("tell me about", ENCYCLOPEDIA_TRIGGER), None);
        assert_eq!(topic_after_first("tell me about   ", ENCYCLOPEDIA_TRIGGER), None);
        assert_eq!(topic_after_first("hello", ENCYCLOPEDIA_TRIGGER), None);
    }

    #[test]
    fn test_topic_after_last() {
        assert_eq!(
            topic_after_last("search google for search google for cats", WEB_SEARCH_TRIGGER),
            Some("cats")
        );
        assert_eq!(
            topic_after_last("search google for cats search google for", WEB_SEARCH_TRIGGER),
            None
        );
    }

    #[test]
    fn test_truncate_chars_counts_chars() {
        let text = "é".repeat(600);
        let truncated = truncate_chars(&text, MAX_SUMMARY_CHARS);
        assert_eq!(truncated.chars().count(), MAX_SUMMARY_CHARS);
        assert_eq!(truncate_chars("short", MAX_SUMMARY_CHARS), "short");
    }

    #[test]
    fn test_rules_in_priority_order() {
        let order: Vec<Intent> = RULES.iter().map(|r| r.intent).collect();
        assert_eq!(
            order,
            vec![
                Intent::Greeting,
                Intent::ClockQuery,
                Intent::Gratitude,
                Intent::Farewell,
                Intent::EncyclopediaLookup,
                Intent::WebSearchLookup,
            ]
        );
    }
}
