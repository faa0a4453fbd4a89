#![cfg_attr(not(test), deny(unsafe_code))]
#![warn(
    clippy::pedantic,
    clippy::unwrap_used,
    clippy::missing_docs_in_private_items
)]

//! Messages API exchanges answered by Groq.
//!
//! [`MessagesProxy::handle`] takes a raw Messages API request body and returns
//! either a complete message or a stream of SSE frames, with failures mapped
//! onto an HTTP status and a Messages API error body. Listening for HTTP is
//! left to the caller.

pub mod config;
pub mod error;
pub mod proxy;

pub use config::ProxyConfig;
pub use error::ProxyError;
pub use proxy::{MessagesProxy, ProxyResponse};
