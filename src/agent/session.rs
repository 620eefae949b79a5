//! Listen-respond session loop
//!
//! Drives one turn at a time: capture and recognize, route, speak, then
//! either go back to listening or terminate after a farewell.

use std::fmt;

use super::intent::{Reply, Utterance};
use super::router::IntentRouter;
use super::{SpeechCapture, SpeechOutput};

/// Where the session loop currently is within a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// Waiting on [`SpeechCapture::listen`], which covers both capture and
    /// speech recognition
    Listening,
    /// Turning the recognizer's result (text or failure) into an utterance
    Recognizing,
    /// Selecting and running a response strategy
    Routing,
    /// Playing the response
    Speaking,
    /// A farewell was spoken; no further turns
    Terminated,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Listening => write!(f, "Listening"),
            Self::Recognizing => write!(f, "Recognizing"),
            Self::Routing => write!(f, "Routing"),
            Self::Speaking => write!(f, "Speaking"),
            Self::Terminated => write!(f, "Terminated"),
        }
    }
}

/// What happened during one turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOutcome {
    /// Utterance the turn was routed on
    pub utterance: Utterance,
    /// Routed reply
    pub reply: Reply,
    /// Whether the reply reached speech output
    pub spoken: bool,
}

/// Totals for a finished session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    /// Turns taken, including the farewell
    pub turns: usize,
    /// Turns whose utterance could not be recognized
    pub recognition_failures: usize,
}

/// Sequential capture → route → speak loop
pub struct SessionLoop<C, S> {
    capture: C,
    output: S,
    router: IntentRouter,
    state: SessionState,
    last_utterance: Option<Utterance>,
}

impl<C, S> SessionLoop<C, S>
where
    C: SpeechCapture,
    S: SpeechOutput,
{
    /// Create a session in the `Listening` state
    pub fn new(capture: C, output: S, router: IntentRouter) -> Self {
        Self {
            capture,
            output,
            router,
            state: SessionState::Listening,
            last_utterance: None,
        }
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Most recent utterance, if any turn has run
    #[must_use]
    pub const fn last_utterance(&self) -> Option<&Utterance> {
        self.last_utterance.as_ref()
    }

    /// Whether a farewell has ended the session
    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.state == SessionState::Terminated
    }

    /// Run turns until a farewell terminates the session
    #[allow(clippy::future_not_send)]
    pub async fn run(&mut self) -> SessionSummary {
        tracing::info!(name = self.router.name(), "session started");
        let mut summary = SessionSummary::default();

        while let Some(outcome) = self.turn().await {
            summary.turns += 1;
            if outcome.utterance.is_unrecognized() {
                summary.recognition_failures += 1;
            }
        }

        tracing::info!(
            turns = summary.turns,
            recognition_failures = summary.recognition_failures,
            "session terminated"
        );
        summary
    }

    /// Run a single turn
    ///
    /// Returns `None` once the session has terminated.
    #[allow(clippy::future_not_send)]
    pub async fn turn(&mut self) -> Option<TurnOutcome> {
        if self.is_terminated() {
            return None;
        }

        self.state = SessionState::Listening;
        let heard = self.capture.listen().await;

        self.state = SessionState::Recognizing;
        let utterance = match heard {
            Ok(text) => {
                tracing::info!(heard = %text, "utterance recognized");
                Utterance::Recognized(text)
            }
            Err(e) => {
                tracing::info!(error = %e, "recognition failed");
                Utterance::Unrecognized
            }
        };

        self.state = SessionState::Routing;
        let reply = self.router.route(&utterance).await;

        self.state = SessionState::Speaking;
        let spoken = self.speak(&reply).await;

        self.state = if reply.intent.ends_session() {
            SessionState::Terminated
        } else {
            SessionState::Listening
        };
        self.last_utterance = Some(utterance.clone());

        Some(TurnOutcome {
            utterance,
            reply,
            spoken,
        })
    }

    async fn speak(&mut self, reply: &Reply) -> bool {
        if reply.is_silent() {
            tracing::debug!(intent = %reply.intent, "empty response, skipping speech");
            return false;
        }

        tracing::info!(intent = %reply.intent, response = %reply.text, "responding");
        if let Err(e) = self.output.speak(&reply.text).await {
            tracing::warn!(error = %e, "speech output failed");
        }
        true
    }

    /// Take the collaborators back out of a finished session
    pub fn into_parts(self) -> (C, S, IntentRouter) {
        (self.capture, self.output, self.router)
    }
}
