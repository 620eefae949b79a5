//! Fixed response texts and uniform phrase sampling

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Said when speech could not be recognized
pub const RECOGNITION_ERROR: &str = "Sorry, come again?";

/// Said when a lookup found nothing or its service failed
pub const NOT_FOUND: &str = "Sorry, I couldn't find information on that topic.";

/// Said when "tell me about" has no topic after it
pub const MISSING_TOPIC: &str = "Sorry, I didn't understand the topic you want to know about.";

/// Said when "search google for" has no query after it
pub const MISSING_QUERY: &str = "Sorry, I didn't understand the topic you want to search for.";

/// Said when the conversational model fails
pub const MODEL_UNAVAILABLE: &str = "Sorry, I couldn't come up with a reply.";

/// Acknowledgements for being thanked
pub const GRATITUDE: &[&str] = &[
    "you're welcome!",
    "anytime!",
    "no problem!",
    "cool!",
    "I'm here if you need me!",
    "peace out!",
];

/// Goodbyes spoken before the session ends
pub const FAREWELL: &[&str] = &[
    "Tata",
    "Have a good day",
    "Bye",
    "Goodbye",
    "Hope to meet soon",
    "peace out!",
];

/// Greeting for when the agent hears its own name
#[must_use]
pub fn greeting(name: &str) -> String {
    format!("Hello, I am {name} the AI, what can I do for you?")
}

/// Samples phrases uniformly from fixed sets
pub struct PhrasePicker {
    rng: StdRng,
}

impl PhrasePicker {
    /// Create a picker seeded from OS entropy
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Create a deterministic picker
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Pick one phrase; empty string for an empty set
    pub fn pick(&mut self, phrases: &[&'static str]) -> &'static str {
        phrases.choose(&mut self.rng).copied().unwrap_or_default()
    }
}

impl Default for PhrasePicker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pick_stays_in_set() {
        let mut picker = PhrasePicker::new();
        for _ in 0..50 {
            assert!(GRATITUDE.contains(&picker.pick(GRATITUDE)));
            assert!(FAREWELL.contains(&picker.pick(FAREWELL)));
        }
    }

    #[test]
    fn test_seeded_is_deterministic() {
        let mut a = PhrasePicker::seeded(7);
        let mut b = PhrasePicker::seeded(7);
        let left: Vec<_> = (0..10).map(|_| a.pick(FAREWELL)).collect();
        let right: Vec<_> = (0..10).map(|_| b.pick(FAREWELL)).collect();
        assert_eq!(left, right);
    }

    #[test]
    fn test_pick_covers_set() {
        let mut picker = PhrasePicker::seeded(42);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..500 {
            seen.insert(picker.pick(GRATITUDE));
        }
        assert_eq!(seen.len(), GRATITUDE.len());
    }

    #[test]
    fn test_empty_set() {
        let mut picker = PhrasePicker::seeded(1);
        assert_eq!(picker.pick(&[]), "");
    }

    #[test]
    fn test_greeting() {
        assert_eq!(
            greeting("Fawks"),
            "Hello, I am Fawks the AI, what can I do for you?"
        );
    }
}
