//! Open-domain conversational model
//!
//! Talks to any OpenAI-compatible `/chat/completions` endpoint (`OpenAI`,
//! `OpenRouter`, a local Ollama or llama.cpp server). The model handle is
//! built once at startup and keeps the running conversation so follow-up
//! small talk has context.

use std::collections::VecDeque;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::agent::ConversationalModel;
use crate::{Error, Result};

/// Default completion endpoint base
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default model identifier
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Max tokens for a spoken reply
const MAX_TOKENS: u32 = 256;

/// One message in the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// "system", "user" or "assistant"
    pub role: String,
    /// Message text
    pub content: String,
}

impl ChatMessage {
    fn new(role: &str, content: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: Option<ChatMessage>,
}

/// Settings for [`ChatModel`]
#[derive(Debug, Clone)]
pub struct ChatModelConfig {
    /// Endpoint base URL, without the trailing `/chat/completions`
    pub base_url: String,
    /// Bearer token; local servers usually need none
    pub api_key: Option<String>,
    /// Model identifier
    pub model: String,
    /// System prompt prepended to every request
    pub system_prompt: Option<String>,
    /// Messages of history kept (user and assistant each count one)
    pub max_history: usize,
}

impl Default for ChatModelConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            system_prompt: None,
            max_history: 12,
        }
    }
}

/// Stateful chat-completions client
pub struct ChatModel {
    client: reqwest::Client,
    config: ChatModelConfig,
    history: Mutex<VecDeque<ChatMessage>>,
}

impl ChatModel {
    /// Create a model handle
    #[must_use]
    pub fn new(config: ChatModelConfig) -> Self {
        tracing::debug!(model = %config.model, base_url = %config.base_url, "chat model configured");

        Self {
            client: reqwest::Client::new(),
            config,
            history: Mutex::new(VecDeque::new()),
        }
    }

    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));
        let request = CompletionRequest {
            model: &self.config.model,
            messages,
            max_tokens: MAX_TOKENS,
        };

        let mut builder = self.client.post(&url).json(&request);
        if let Some(key) = &self.config.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "chat completion error");
            return Err(Error::Model(format!("chat completion error {status}: {body}")));
        }

        let body = response.text().await?;
        parse_completion(&body)
    }
}

#[async_trait]
impl ConversationalModel for ChatModel {
    async fn reply(&self, text: &str) -> Result<String> {
        let mut history = self.history.lock().await;

        let user = ChatMessage::new("user", text);
        let messages = build_messages(self.config.system_prompt.as_deref(), &history, &user);

        let reply = self.complete(&messages).await?;
        tracing::debug!(reply = %reply, "model replied");

        push_bounded(&mut history, user, self.config.max_history);
        push_bounded(
            &mut history,
            ChatMessage::new("assistant", reply.clone()),
            self.config.max_history,
        );

        Ok(reply)
    }
}

/// System prompt, then history, then the new user message
fn build_messages(
    system_prompt: Option<&str>,
    history: &VecDeque<ChatMessage>,
    user: &ChatMessage,
) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    if let Some(prompt) = system_prompt.filter(|p| !p.trim().is_empty()) {
        messages.push(ChatMessage::new("system", prompt));
    }
    messages.extend(history.iter().cloned());
    messages.push(user.clone());
    messages
}

/// Append, dropping the oldest messages beyond `max`
fn push_bounded(history: &mut VecDeque<ChatMessage>, message: ChatMessage, max: usize) {
    history.push_back(message);
    while history.len() > max {
        history.pop_front();
    }
}

/// Text of the first choice
fn parse_completion(body: &str) -> Result<String> {
    let response: CompletionResponse = serde_json::from_str(body)?;

    response
        .choices
        .into_iter()
        .find_map(|c| c.message)
        .map(|m| m.content)
        .ok_or_else(|| Error::Model("completion had no choices".to_string()))
}
