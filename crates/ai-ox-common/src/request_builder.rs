use core::fmt;

use crate::{
    error::{self, CommonRequestError},
    streaming::SseParser,
};
use async_stream::try_stream;
use futures_util::stream::{self, BoxStream};
use reqwest::Response;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// POSTs JSON bodies to one provider and decodes JSON or SSE replies.
#[derive(Clone)]
pub struct RequestBuilder {
    client: reqwest::Client,
    base_url: String,
    bearer_token: Option<String>,
}

impl RequestBuilder {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            bearer_token: None,
        }
    }

    #[must_use]
    pub fn with_bearer_auth(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// `path` joined onto the base URL with exactly one slash between them.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// An authenticated POST to `path`, without a body.
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        let req = self.client.post(self.url(path));
        match &self.bearer_token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// POST `body` as JSON and decode the JSON reply.
    ///
    /// # Errors
    ///
    /// Transport failures, non-2xx replies and bodies that do not decode as `T`.
    pub async fn request_json<T, B>(&self, path: &str, body: &B) -> Result<T, CommonRequestError>
    where
        T: for<'de> Deserialize<'de>,
        B: Serialize,
    {
        let payload =
            serde_json::to_value(body).map_err(|e| CommonRequestError::Json(e.to_string()))?;
        log::trace!("POST {path} payload: {payload}");

        let res = self.post(path).json(&payload).send().await?;
        Self::handle_response(res).await
    }

    /// POST `body` with `"stream": true` set on it and decode the SSE reply.
    ///
    /// The body must serialize to a JSON object. Nothing is sent until the
    /// returned stream is first polled. A non-2xx reply is the first and only item.
    pub fn stream<T, B>(&self, path: &str, body: &B) -> BoxStream<'static, Result<T, CommonRequestError>>
    where
        T: for<'de> Deserialize<'de> + Send + 'static,
        B: Serialize,
    {
        let mut payload = match serde_json::to_value(body) {
            Ok(Value::Object(map)) => map,
            Ok(other) => {
                let message = format!("Streaming body must be a JSON object, got {other}");
                return Box::pin(stream::once(async move {
                    Err(CommonRequestError::Json(message))
                }));
            }
            Err(e) => {
                return Box::pin(stream::once(async move {
                    Err(CommonRequestError::Json(e.to_string()))
                }));
            }
        };
        payload.insert("stream".to_string(), Value::Bool(true));
        let payload = Value::Object(payload);
        log::trace!("STREAM {path} payload: {payload}");

        let req = self.post(path).json(&payload);

        Box::pin(try_stream! {
            let response = req.send().await?;
            let status = response.status();

            if !status.is_success() {
                let bytes = response.bytes().await?;
                Err(error::parse_error_response(status, &bytes))?;
            } else {
                let mut parser = SseParser::new(response);

                while let Some(event) = parser.next_event().await? {
                    yield event;
                }
            }
        })
    }

    async fn handle_response<T: for<'de> Deserialize<'de>>(
        res: Response,
    ) -> Result<T, CommonRequestError> {
        let status = res.status();
        let bytes = res.bytes().await?;

        if status.is_success() {
            serde_json::from_slice::<T>(&bytes).map_err(|e| {
                CommonRequestError::UnexpectedResponse(format!(
                    "HTTP {} but failed to decode JSON: {}; body: {}",
                    status.as_u16(),
                    e,
                    String::from_utf8_lossy(&bytes)
                ))
            })
        } else {
            Err(error::parse_error_response(status, &bytes))
        }
    }
}

impl fmt::Debug for RequestBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestBuilder")
            .field("base_url", &self.base_url)
            .field("bearer_token", &self.bearer_token.as_ref().map(|_| "[REDACTED]"))
            .finish_non_exhaustive()
    }
}
