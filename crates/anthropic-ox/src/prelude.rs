//! Common imports for working with Messages API payloads.
//!
//! ```rust
//! use anthropic_ox::prelude::*;
//!
//! let request = ChatRequest::builder()
//!     .model("claude-3-5-sonnet-20241022")
//!     .messages(vec![Message::user("Hello!")])
//!     .temperature(0.7)
//!     .build();
//! assert_eq!(request.max_tokens, 4096);
//! ```

pub use crate::{
    ChatRequest, ChatResponse, StreamEvent,
    error::{ErrorInfo, ErrorResponse},
    message::{Content, Image, ImageSource, Message, MessageContent, Role, SystemPrompt, Text},
    response::{ContentBlock, ContentBlockDelta, StopReason},
    tool::{Tool, ToolChoice, ToolResult, ToolUse},
    usage::Usage,
};
