#![cfg_attr(not(test), deny(unsafe_code))]
#![warn(
    clippy::pedantic,
    clippy::unwrap_used,
    clippy::missing_docs_in_private_items
)]

//! Shared HTTP plumbing for the messages proxy crates
//!
//! Provider clients build their requests through [`RequestBuilder`] and decode
//! streamed replies with [`SseParser`], so endpoint handling, auth and error
//! extraction behave the same for every upstream.

pub mod error;
pub mod request_builder;
pub mod streaming;

pub use error::CommonRequestError;
pub use request_builder::RequestBuilder;
pub use streaming::SseParser;

/// Re-export common types for convenience
pub use futures_util::stream::BoxStream;
