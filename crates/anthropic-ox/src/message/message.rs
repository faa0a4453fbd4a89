use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};

use crate::tool::{ToolResult, ToolUse};

use strum::{Display, EnumString};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum ImageSource {
    #[serde(rename = "base64")]
    Base64 { media_type: String, data: String },
}

impl ImageSource {
    /// Render the source as a `data:` URI.
    pub fn to_data_url(&self) -> String {
        match self {
            ImageSource::Base64 { media_type, data } => format!("data:{media_type};base64,{data}"),
        }
    }
}

/// An image block. A source that is not a well-formed base64 source is kept as `None`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Image {
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub source: Option<ImageSource>,
}

#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Text {
    #[serde(default)]
    pub text: String,
}

impl Text {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// One content block of a request message.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Content {
    Text(Text),
    Image(Image),
    ToolUse(ToolUse),
    ToolResult(ToolResult),
    /// Any block type this crate does not model (thinking, documents, ...).
    #[serde(other)]
    Unknown,
}

impl Content {
    pub fn as_tool_use(&self) -> Option<&ToolUse> {
        if let Self::ToolUse(v) = self {
            Some(v)
        } else {
            None
        }
    }

    pub fn as_tool_result(&self) -> Option<&ToolResult> {
        if let Self::ToolResult(v) = self {
            Some(v)
        } else {
            None
        }
    }
}

/// Message content: either a bare string or a list of blocks.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Blocks(Vec<Content>),
}

impl From<String> for MessageContent {
    fn from(text: String) -> Self {
        MessageContent::Text(text)
    }
}

impl From<&str> for MessageContent {
    fn from(text: &str) -> Self {
        MessageContent::Text(text.to_owned())
    }
}

impl From<Vec<Content>> for MessageContent {
    fn from(blocks: Vec<Content>) -> Self {
        MessageContent::Blocks(blocks)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Message {
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<MessageContent>,
}

impl Message {
    pub fn new(role: Role, content: impl Into<MessageContent>) -> Self {
        Self {
            role,
            content: Some(content.into()),
        }
    }

    pub fn user(content: impl Into<MessageContent>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<MessageContent>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Content blocks, or an empty slice for string or absent content.
    pub fn blocks(&self) -> &[Content] {
        match &self.content {
            Some(MessageContent::Blocks(blocks)) => blocks,
            _ => &[],
        }
    }

    pub fn has_tool_results(&self) -> bool {
        self.blocks()
            .iter()
            .any(|block| matches!(block, Content::ToolResult(_)))
    }
}

/// One segment of a block-form system prompt.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SystemBlock {
    #[serde(rename = "type", default)]
    pub block_type: String,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum SystemPrompt {
    Text(String),
    Blocks(Vec<SystemBlock>),
}

impl SystemPrompt {
    /// The prompt as one string; text segments are separated by a blank line.
    pub fn joined_text(&self) -> String {
        match self {
            SystemPrompt::Text(text) => text.clone(),
            SystemPrompt::Blocks(blocks) => blocks
                .iter()
                .filter(|block| block.block_type == "text")
                .map(|block| block.text.as_str())
                .collect::<Vec<_>>()
                .join("\n\n"),
        }
    }
}

impl From<String> for SystemPrompt {
    fn from(text: String) -> Self {
        SystemPrompt::Text(text)
    }
}

impl From<&str> for SystemPrompt {
    fn from(text: &str) -> Self {
        SystemPrompt::Text(text.to_owned())
    }
}

/// Deserialize through `serde_json::Value` and keep `None` when the value does not fit `T`.
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_image_source_is_dropped_not_rejected() {
        let content: Content = serde_json::from_str(
            r#"{"type":"image","source":{"type":"url","url":"https://example.com/cat.png"}}"#,
        )
        .unwrap();

        assert_eq!(content, Content::Image(Image { source: None }));
    }

    #[test]
    fn unknown_block_type_becomes_unknown() {
        let content: Content =
            serde_json::from_str(r#"{"type":"thinking","thinking":"hmm","signature":"x"}"#)
                .unwrap();

        assert_eq!(content, Content::Unknown);
    }

    #[test]
    fn system_blocks_join_with_blank_line() {
        let system: SystemPrompt = serde_json::from_str(
            r#"[{"type":"text","text":"One"},{"type":"other","text":"skip"},{"type":"text","text":"Two"}]"#,
        )
        .unwrap();

        assert_eq!(system.joined_text(), "One\n\nTwo");
    }
}
