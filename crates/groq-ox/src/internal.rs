use ai_ox_common::{BoxStream, RequestBuilder};

use crate::{ChatRequest, ChatResponse, GroqRequestError, response::ChatCompletionChunk};

const CHAT_COMPLETIONS: &str = "chat/completions";

/// Chat completions calls over the shared [`RequestBuilder`].
pub struct GroqRequestHelper {
    request_builder: RequestBuilder,
}

impl GroqRequestHelper {
    pub fn new(client: reqwest::Client, base_url: &str, api_key: &str) -> Self {
        Self {
            request_builder: RequestBuilder::new(client, base_url).with_bearer_auth(api_key),
        }
    }

    pub async fn send_chat_request(
        &self,
        request: &ChatRequest,
    ) -> Result<ChatResponse, GroqRequestError> {
        self.request_builder
            .request_json(CHAT_COMPLETIONS, request)
            .await
    }

    pub fn stream_chat_request(
        &self,
        request: &ChatRequest,
    ) -> BoxStream<'static, Result<ChatCompletionChunk, GroqRequestError>> {
        self.request_builder.stream(CHAT_COMPLETIONS, request)
    }
}
