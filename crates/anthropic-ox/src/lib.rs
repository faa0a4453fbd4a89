#![cfg_attr(not(test), deny(unsafe_code))]
#![warn(
    clippy::pedantic,
    clippy::unwrap_used,
    clippy::missing_docs_in_private_items
)]

//! Wire types for the Anthropic Messages API dialect.
//!
//! Requests are deserialized leniently: unknown content block types and
//! malformed image sources or tool choices degrade to explicit fallback
//! variants instead of rejecting the whole request.

pub mod error;
pub mod message;
pub mod prelude;
pub mod request;
pub mod response;
pub mod tool;
pub mod usage;

// Re-export main types
pub use error::{ErrorInfo, ErrorResponse};
pub use request::ChatRequest;
pub use response::{ChatResponse, StreamEvent};
