//! Shared test utilities
//!
//! Stub collaborators for driving the router and session loop without
//! audio hardware or network access.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveTime;

use friday::agent::{
    ConversationalModel, EncyclopediaProvider, FixedClock, IntentRouter, PhrasePicker,
    SpeechCapture, SpeechOutput, WebSearchProvider,
};
use friday::{Error, RecognitionError, Result};

/// Name the test agent answers to
pub const AGENT_NAME: &str = "Fawks";

/// Canned answer from a stub lookup
#[derive(Clone)]
pub enum Answer {
    Found(String),
    Missing,
    Fails,
}

impl Answer {
    fn resolve(&self) -> Result<Option<String>> {
        match self {
            Self::Found(text) => Ok(Some(text.clone())),
            Self::Missing => Ok(None),
            Self::Fails => Err(Error::Lookup("service unreachable".to_string())),
        }
    }
}

/// Encyclopedia stub that records the topics it was asked about
pub struct StubEncyclopedia {
    answer: Answer,
    topics: Mutex<Vec<String>>,
}

impl StubEncyclopedia {
    pub fn new(answer: Answer) -> Arc<Self> {
        Arc::new(Self {
            answer,
            topics: Mutex::new(Vec::new()),
        })
    }

    pub fn topics(&self) -> Vec<String> {
        self.topics.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.topics.lock().unwrap().len()
    }
}

#[async_trait]
impl EncyclopediaProvider for StubEncyclopedia {
    async fn summarize(&self, topic: &str) -> Result<Option<String>> {
        self.topics.lock().unwrap().push(topic.to_string());
        self.answer.resolve()
    }
}

/// Web search stub that records its queries
pub struct StubSearch {
    answer: Answer,
    queries: Mutex<Vec<String>>,
}

impl StubSearch {
    pub fn new(answer: Answer) -> Arc<Self> {
        Arc::new(Self {
            answer,
            queries: Mutex::new(Vec::new()),
        })
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.queries.lock().unwrap().len()
    }
}

#[async_trait]
impl WebSearchProvider for StubSearch {
    async fn search(&self, query: &str) -> Result<Option<String>> {
        self.queries.lock().unwrap().push(query.to_string());
        self.answer.resolve()
    }
}

/// Conversational model stub with a fixed reply
pub struct StubModel {
    reply: Option<String>,
    calls: AtomicUsize,
    last_input: Mutex<Option<String>>,
}

impl StubModel {
    /// Replies with `reply` every time
    pub fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(reply.to_string()),
            calls: AtomicUsize::new(0),
            last_input: Mutex::new(None),
        })
    }

    /// Fails every time
    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: None,
            calls: AtomicUsize::new(0),
            last_input: Mutex::new(None),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_input(&self) -> Option<String> {
        self.last_input.lock().unwrap().clone()
    }
}

#[async_trait]
impl ConversationalModel for StubModel {
    async fn reply(&self, text: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_input.lock().unwrap() = Some(text.to_string());
        self.reply
            .clone()
            .ok_or_else(|| Error::Model("model offline".to_string()))
    }
}

/// Stub collaborators wired into a router
pub struct Harness {
    pub encyclopedia: Arc<StubEncyclopedia>,
    pub search: Arc<StubSearch>,
    pub model: Arc<StubModel>,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            encyclopedia: StubEncyclopedia::new(Answer::Found(
                "Cats are small carnivorous mammals.".to_string(),
            )),
            search: StubSearch::new(Answer::Found("Top result snippet".to_string())),
            model: StubModel::replying("I am doing well."),
        }
    }

    pub fn with_encyclopedia(mut self, answer: Answer) -> Self {
        self.encyclopedia = StubEncyclopedia::new(answer);
        self
    }

    pub fn with_search(mut self, answer: Answer) -> Self {
        self.search = StubSearch::new(answer);
        self
    }

    pub fn with_model(mut self, model: Arc<StubModel>) -> Self {
        self.model = model;
        self
    }

    /// Router at 14:05 with a seeded phrase picker
    pub fn router(&self) -> IntentRouter {
        IntentRouter::new(
            AGENT_NAME,
            self.encyclopedia.clone(),
            self.search.clone(),
            self.model.clone(),
        )
        .with_clock(FixedClock(NaiveTime::from_hms_opt(14, 5, 0).unwrap()))
        .with_phrases(PhrasePicker::seeded(7))
    }

    /// Total calls across every collaborator
    pub fn collaborator_calls(&self) -> usize {
        self.encyclopedia.calls() + self.search.calls() + self.model.calls()
    }
}

/// Capture that replays a fixed script of recognition results
pub struct ScriptedCapture {
    script: VecDeque<std::result::Result<String, RecognitionError>>,
    pub listens: usize,
}

impl ScriptedCapture {
    pub fn new(script: Vec<std::result::Result<String, RecognitionError>>) -> Self {
        Self {
            script: script.into(),
            listens: 0,
        }
    }

    /// Script of utterances that are all recognized
    pub fn lines(lines: &[&str]) -> Self {
        Self::new(lines.iter().map(|l| Ok((*l).to_string())).collect())
    }
}

#[async_trait(?Send)]
impl SpeechCapture for ScriptedCapture {
    async fn listen(&mut self) -> std::result::Result<String, RecognitionError> {
        self.listens += 1;
        self.script
            .pop_front()
            .expect("session listened past the end of its script")
    }
}

/// Output that records everything it was asked to speak
#[derive(Default)]
pub struct RecordingOutput {
    pub spoken: Vec<String>,
    pub fail: bool,
}

impl RecordingOutput {
    /// Output whose every `speak` call fails after recording the text
    pub fn failing() -> Self {
        Self {
            spoken: Vec::new(),
            fail: true,
        }
    }
}

#[async_trait(?Send)]
impl SpeechOutput for RecordingOutput {
    async fn speak(&mut self, text: &str) -> Result<()> {
        self.spoken.push(text.to_string());
        if self.fail {
            return Err(Error::Tts("speaker unplugged".to_string()));
        }
        Ok(())
    }
}
