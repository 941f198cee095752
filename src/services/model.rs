use crate::error::Result;
use crate::types::ChatMessage;
use async_trait::async_trait;
use futures::stream::BoxStream;
use serde_json::{json, Value};

/// Token deltas from a streaming completion. Dropping it aborts the request.
pub type TokenStream = BoxStream<'static, Result<String>>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResponseFormat {
    /// Ask the model for a single JSON object.
    Json,
    #[default]
    Text,
}

impl ResponseFormat {
    /// Chat-completions `response_format` field, when one is needed.
    pub fn to_wire(self) -> Option<Value> {
        match self {
            ResponseFormat::Json => Some(json!({ "type": "json_object" })),
            ResponseFormat::Text => None,
        }
    }
}

/// One model invocation: a system prompt followed by conversation turns.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelRequest {
    pub system: String,
    pub messages: Vec<ChatMessage>,
    pub response_format: ResponseFormat,
    pub temperature: f32,
}

impl ModelRequest {
    pub fn new(system: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            messages: Vec::new(),
            response_format: ResponseFormat::Text,
            temperature: 0.4,
        }
    }

    pub fn with_messages(mut self, messages: impl IntoIterator<Item = ChatMessage>) -> Self {
        self.messages.extend(messages);
        self
    }

    pub fn with_message(mut self, message: ChatMessage) -> Self {
        self.messages.push(message);
        self
    }

    pub fn json(mut self) -> Self {
        self.response_format = ResponseFormat::Json;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// System prompt first, then every turn, in chat-completions wire form.
    pub fn wire_messages(&self) -> Vec<Value> {
        std::iter::once(ChatMessage::system(self.system.clone()))
            .chain(self.messages.iter().cloned())
            .map(|message| message.to_message())
            .collect()
    }

    /// Text of the last message, usually the composed user prompt.
    pub fn last_content(&self) -> Option<&str> {
        self.messages.last().map(|message| message.content.as_str())
    }
}

/// Chat model capability used by the pipeline.
///
/// Implementations own transport and authentication. Neither method retries.
#[async_trait]
pub trait LanguageModel: Send + Sync + std::fmt::Debug {
    /// Full completion text. Empty content is returned as an empty string.
    async fn complete(&self, request: ModelRequest) -> Result<String>;

    /// Text deltas as they arrive.
    async fn stream(&self, request: ModelRequest) -> Result<TokenStream>;
}
