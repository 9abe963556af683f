//! # Assistant
//!
//! Produces Samm's replies. The handler only sees the [`Assistant`] trait;
//! [`GenAiAssistant`] is the production implementation backed by rust-genai,
//! which can talk to OpenAI, Anthropic, Gemini, DeepSeek and others depending
//! on the configured model name.

use async_trait::async_trait;
use thiserror::Error;

use crate::threads::Turn;

/// Longest reply forwarded to the widget, in characters
pub const MAX_REPLY_CHARS: usize = 1000;

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are Samm, a friendly assistant for a home renovation company. \
    - Help visitors describe their renovation project (kitchen, bathroom, basement, flooring, additions) \
    - Be concise: 2-4 sentences unless the visitor asks for detail \
    - When the visitor wants a quote or a visit, ask for their name, phone number and email \
    - Never invent prices; give typical ranges and say a specialist will confirm \
    - If you don't know something, say so";

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("assistant is not configured: {0}")]
    NotConfigured(String),

    #[error("provider error: {0}")]
    Provider(String),

    #[error("assistant returned an empty reply")]
    Empty,
}

#[async_trait]
pub trait Assistant: Send + Sync {
    /// Reply to the last turn of `turns`, oldest first.
    async fn reply(&self, turns: &[Turn]) -> Result<String, AssistantError>;
}

/// Assistant settings, loaded by [`Config`](crate::config::Config).
#[derive(Clone, Debug)]
pub struct AssistantConfig {
    /// Display name, also used when logging
    pub name: String,
    /// Model name passed to genai (e.g. "gpt-4o-mini", "deepseek-chat")
    pub model: String,
    pub api_key: String,
    pub system_prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Maximum number of turns sent with each request, including the new one
    pub context_window: usize,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            name: "Samm".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key: String::new(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            temperature: 0.7,
            max_tokens: 500,
            context_window: 20,
        }
    }
}

/// Clean up a raw model reply: drop stock AI disclaimers, trim and cap the
/// length, preferring to cut at a sentence and then a word boundary.
///
/// Returns `None` when nothing is left.
pub fn finalize_reply(raw: &str) -> Option<String> {
    let text = raw
        .replace("As an AI assistant, ", "")
        .replace("As an AI, ", "")
        .replace("As a language model, ", "");
    let text = text.trim();

    if text.is_empty() {
        return None;
    }

    let Some((cut, _)) = text.char_indices().nth(MAX_REPLY_CHARS) else {
        return Some(text.to_string());
    };

    let head = &text[..cut];
    let capped = if let Some(end) = head.rfind('.') {
        format!("{}...", &head[..=end])
    } else if let Some(end) = head.rfind(' ') {
        format!("{}...", &head[..end])
    } else {
        format!("{}...", head)
    };
    Some(capped)
}

pub struct GenAiAssistant {
    config: AssistantConfig,
    #[cfg(feature = "genai")]
    client: genai::Client,
}

impl GenAiAssistant {
    #[cfg(feature = "genai")]
    pub fn new(config: AssistantConfig) -> Self {
        use genai::resolver::{AuthData, AuthResolver};

        let api_key = config.api_key.clone();
        let auth_resolver = AuthResolver::from_resolver_fn(
            move |_model_iden| -> Result<Option<AuthData>, genai::resolver::Error> {
                Ok(Some(AuthData::from_single(api_key.clone())))
            },
        );

        let client = genai::Client::builder()
            .with_auth_resolver(auth_resolver)
            .build();

        Self { config, client }
    }

    #[cfg(not(feature = "genai"))]
    pub fn new(config: AssistantConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AssistantConfig {
        &self.config
    }
}

#[cfg(feature = "genai")]
#[async_trait]
impl Assistant for GenAiAssistant {
    async fn reply(&self, turns: &[Turn]) -> Result<String, AssistantError> {
        use genai::chat::{ChatMessage, ChatOptions, ChatRequest};

        use crate::threads::Role;

        if self.config.api_key.is_empty() {
            return Err(AssistantError::NotConfigured("no API key".to_string()));
        }

        let mut chat_req = ChatRequest::default().with_system(&self.config.system_prompt);
        for turn in turns {
            chat_req = chat_req.append_message(match turn.role {
                Role::User => ChatMessage::user(&turn.text),
                Role::Assistant => ChatMessage::assistant(&turn.text),
            });
        }

        let chat_options = ChatOptions::default()
            .with_temperature(self.config.temperature as f64)
            .with_max_tokens(self.config.max_tokens);

        tracing::debug!(model = %self.config.model, turns = turns.len(), "Calling AI provider");
        let chat_res = self
            .client
            .exec_chat(&self.config.model, chat_req, Some(&chat_options))
            .await
            .map_err(|e| AssistantError::Provider(format!("{:?}", e)))?;

        chat_res
            .first_text()
            .and_then(finalize_reply)
            .ok_or(AssistantError::Empty)
    }
}

#[cfg(not(feature = "genai"))]
#[async_trait]
impl Assistant for GenAiAssistant {
    async fn reply(&self, _turns: &[Turn]) -> Result<String, AssistantError> {
        Err(AssistantError::NotConfigured(
            "built without the 'genai' feature".to_string(),
        ))
    }
}
