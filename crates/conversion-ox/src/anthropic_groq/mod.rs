//! Direct conversions between Messages API and Groq chat completions formats
//!
//! ## Supported Conversions
//!
//! - [`anthropic_to_groq_request()`] converts a Messages request into a chat
//!   completions request, mapping the model when no override is given.
//! - [`groq_to_anthropic_response()`] converts a buffered chat completion back
//!   into a Messages response.
//! - [`StreamTranslator`] and [`translate_stream()`] turn streamed chat
//!   completion chunks into Messages stream events.
//!
//! ## Limitations
//!
//! - Only base64 image sources survive; URL and file sources are dropped.
//! - Content block types other than text, image, `tool_use` and `tool_result`
//!   are dropped.
//! - `any` tool choice degrades to `auto`.
//! - Streamed tool arguments are surfaced once, when the buffered arguments
//!   first parse as complete JSON.

mod constants;
mod model;
mod request;
mod response;
mod streaming;

pub use constants::{DEFAULT_TARGET_MODEL, MAX_OUTPUT_TOKENS, NO_TOOL_RESULT_CONTENT};
pub use model::map_model;
pub use request::{anthropic_to_groq_request, clamp_max_tokens, normalize_tool_result_content};
pub use response::{groq_to_anthropic_response, map_finish_reason};
pub use streaming::{StreamTranslator, translate_stream};
