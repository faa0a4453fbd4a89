//! Constants for Messages API and Groq conversions

// Token bounds
pub const MIN_OUTPUT_TOKENS: u32 = 1;
pub const MAX_OUTPUT_TOKENS: u32 = 8192;

// Models
pub const DEFAULT_TARGET_MODEL: &str = "moonshotai/kimi-k2-instruct";

// Tool results
pub const NO_TOOL_RESULT_CONTENT: &str = "No content provided";
pub const TOOL_TYPE_FUNCTION: &str = "function";
pub const TOOL_CHOICE_AUTO: &str = "auto";
pub const RAW_ARGUMENTS_KEY: &str = "raw_arguments";

// Response envelope
pub const MESSAGE_TYPE: &str = "message";
pub const MESSAGE_ID_PREFIX: &str = "msg_";

// Streaming
pub const TEXT_BLOCK_INDEX: usize = 0;
pub const STREAM_ERROR_PREFIX: &str = "Streaming error";
