pub mod message;

pub use crate::tool::{ToolResult, ToolUse};
pub use message::{
    Content, Image, ImageSource, Message, MessageContent, Role, SystemBlock, SystemPrompt, Text,
};
