use core::fmt;

use anthropic_ox::{request::ChatRequest as AnthropicRequest, response::ChatResponse};
use conversion_ox::anthropic_groq::{
    anthropic_to_groq_request, groq_to_anthropic_response, translate_stream,
};
use futures_util::{
    Stream, StreamExt, future,
    stream::{self, BoxStream},
};
use groq_ox::{ChatCompletionChunk, Groq, GroqRequestError, request::ChatRequest as GroqRequest};

use crate::{config::ProxyConfig, error::ProxyError};

/// A successful exchange.
pub enum ProxyResponse {
    /// A complete message, to be sent as JSON
    Message(ChatResponse),
    /// Encoded SSE frames, one event per item
    Stream(BoxStream<'static, String>),
}

impl ProxyResponse {
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Message(_) => "application/json",
            Self::Stream(_) => "text/event-stream",
        }
    }
}

impl fmt::Debug for ProxyResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Message(message) => f.debug_tuple("Message").field(message).finish(),
            Self::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

/// Serves Messages API requests from Groq.
#[derive(Debug, Clone)]
pub struct MessagesProxy {
    config: ProxyConfig,
    client: Groq,
}

impl MessagesProxy {
    pub fn new(config: ProxyConfig) -> Self {
        let client = Groq::builder()
            .api_key(config.api_key.as_str())
            .base_url(config.base_url.as_str())
            .build();
        Self { config, client }
    }

    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    /// Handle one raw Messages API request body.
    ///
    /// Streaming requests resolve once Groq has accepted the request, so an
    /// immediate upstream rejection is returned as an error rather than as a
    /// stream. Failures after that point arrive as a final `error` frame.
    ///
    /// # Errors
    ///
    /// [`ProxyError::InvalidRequest`] for a body that does not parse,
    /// [`ProxyError::Upstream`] when Groq fails, and
    /// [`ProxyError::Conversion`] when a buffered reply cannot be converted.
    pub async fn handle(&self, body: &[u8]) -> Result<ProxyResponse, ProxyError> {
        let request: AnthropicRequest = serde_json::from_slice(body)?;
        let upstream_request = anthropic_to_groq_request(
            &request,
            self.config.model.as_deref(),
            &self.config.default_model,
        );

        if self.config.debug {
            log::debug!(
                "Groq request: {}",
                serde_json::to_string(&upstream_request).unwrap_or_default()
            );
        }

        if request.is_streaming() {
            self.handle_stream(&request, &upstream_request).await
        } else {
            self.handle_message(&request, &upstream_request).await
        }
    }

    async fn handle_message(
        &self,
        request: &AnthropicRequest,
        upstream_request: &GroqRequest,
    ) -> Result<ProxyResponse, ProxyError> {
        let response = self
            .client
            .send(upstream_request)
            .await
            .inspect_err(|e| log::warn!("Groq request failed: {e}"))?;

        if self.config.debug {
            log::debug!(
                "Groq response: {}",
                serde_json::to_string(&response).unwrap_or_default()
            );
        }

        let message = groq_to_anthropic_response(response, request)?;
        Ok(ProxyResponse::Message(message))
    }

    async fn handle_stream(
        &self,
        request: &AnthropicRequest,
        upstream_request: &GroqRequest,
    ) -> Result<ProxyResponse, ProxyError> {
        let frames = open_frames(self.client.stream(upstream_request), request.model.as_str()).await?;
        Ok(ProxyResponse::Stream(frames))
    }
}

/// Pull the first upstream item, then hand everything to the translator.
///
/// Only an HTTP rejection on that first item fails the exchange. Any other
/// first failure is left to the translator, which reports it as an `error`
/// frame.
async fn open_frames<S>(mut upstream: S, model: &str) -> Result<BoxStream<'static, String>, ProxyError>
where
    S: Stream<Item = Result<ChatCompletionChunk, GroqRequestError>> + Send + Unpin + 'static,
{
    let first = match upstream.next().await {
        Some(Err(e @ GroqRequestError::Api { .. })) => {
            log::warn!("Groq rejected the stream: {e}");
            return Err(e.into());
        }
        first => first,
    };

    let events = translate_stream(stream::iter(first).chain(upstream), model);
    let frames = events.filter_map(|event| {
        future::ready(
            event
                .to_sse()
                .inspect_err(|e| log::warn!("Dropping unencodable stream event: {e}"))
                .ok(),
        )
    });

    Ok(Box::pin(frames))
}
