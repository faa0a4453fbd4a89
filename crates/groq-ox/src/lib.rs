#![cfg_attr(not(test), deny(unsafe_code))]
#![warn(
    clippy::pedantic,
    clippy::unwrap_used,
    clippy::missing_docs_in_private_items
)]

//! Groq chat completions client.

pub mod error;
mod internal;
pub mod message;
pub mod model;
pub mod request;
pub mod response;
pub mod tool;
pub mod usage;

// Re-export main types
pub use error::GroqRequestError;
pub use message::Message;
pub use model::Model;
pub use request::ChatRequest;
pub use response::{ChatCompletionChunk, ChatResponse};
pub use tool::{Tool, ToolCall, ToolChoice};
pub use usage::Usage;

use bon::Builder;
use core::fmt;
use futures_util::stream::BoxStream;

use crate::internal::GroqRequestHelper;

pub const BASE_URL: &str = "https://api.groq.com/openai/v1";

#[derive(Clone, Builder)]
pub struct Groq {
    #[builder(into)]
    pub(crate) api_key: String,
    #[builder(default)]
    pub(crate) client: reqwest::Client,
    #[builder(default = BASE_URL.to_string(), into)]
    pub(crate) base_url: String,
}

impl Groq {
    /// Create a new Groq client with the provided API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            client: reqwest::Client::new(),
            base_url: BASE_URL.to_string(),
        }
    }

    /// Build a client from `GROQ_API_KEY`.
    ///
    /// # Errors
    ///
    /// Returns the `VarError` when the variable is unset.
    pub fn load_from_env() -> Result<Self, std::env::VarError> {
        let api_key = std::env::var("GROQ_API_KEY")?;
        Ok(Self::builder().api_key(api_key).build())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Create request helper for internal use
    fn request_helper(&self) -> GroqRequestHelper {
        GroqRequestHelper::new(self.client.clone(), &self.base_url, &self.api_key)
    }
}

impl Groq {
    /// Send a buffered chat completion request.
    ///
    /// # Errors
    ///
    /// Transport failures, non-2xx replies and undecodable bodies.
    pub async fn send(
        &self,
        request: &request::ChatRequest,
    ) -> Result<response::ChatResponse, GroqRequestError> {
        self.request_helper().send_chat_request(request).await
    }

    /// Stream a chat completion. The request goes out with `"stream": true`
    /// when the returned stream is first polled.
    pub fn stream(
        &self,
        request: &request::ChatRequest,
    ) -> BoxStream<'static, Result<response::ChatCompletionChunk, GroqRequestError>> {
        self.request_helper().stream_chat_request(request)
    }
}

impl fmt::Debug for Groq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Groq")
            .field("api_key", &"[REDACTED]")
            .field("client", &self.client)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}
