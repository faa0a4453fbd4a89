use bon::Builder;
use serde::{Deserialize, Serialize};

use crate::{
    message::{Message, SystemPrompt},
    tool::{Tool, ToolChoice, lenient_tool_choice},
};

const fn default_max_tokens() -> i64 {
    4096
}

/// A Messages API request as sent by clients.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Builder)]
#[builder(builder_type(vis = "pub"), state_mod(vis = "pub"))]
pub struct ChatRequest {
    #[builder(field)]
    pub messages: Vec<Message>,
    #[builder(into)]
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub system: Option<SystemPrompt>,
    #[serde(default = "default_max_tokens")]
    /// Requested output bound, kept signed so out-of-range values can be clamped downstream.
    #[builder(default = default_max_tokens())]
    pub max_tokens: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_sequences: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Tool>>,
    #[serde(
        default,
        deserialize_with = "lenient_tool_choice",
        skip_serializing_if = "Option::is_none"
    )]
    pub tool_choice: Option<ToolChoice>,
}

impl<S: chat_request_builder::State> ChatRequestBuilder<S> {
    pub fn messages(mut self, messages: impl IntoIterator<Item = impl Into<Message>>) -> Self {
        self.messages = messages.into_iter().map(Into::into).collect();
        self
    }

    pub fn message(mut self, message: impl Into<Message>) -> Self {
        self.messages.push(message.into());
        self
    }
}

impl ChatRequest {
    pub fn is_streaming(&self) -> bool {
        self.stream == Some(true)
    }

    /// Enable streaming for this request
    #[must_use]
    pub fn streaming(mut self) -> Self {
        self.stream = Some(true);
        self
    }
}
