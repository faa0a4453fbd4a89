use thiserror::Error;

/// Common errors that can occur in AI provider HTTP requests
#[derive(Error, Debug)]
pub enum CommonRequestError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(String),

    /// The provider answered with a non-success status
    #[error("HTTP {status}: {message}")]
    Api { status: u16, message: String },

    /// Invalid event data in streaming response
    #[error("Invalid event data: {0}")]
    InvalidEventData(String),

    /// Success status but a body that does not decode
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl CommonRequestError {
    /// HTTP status reported by the provider, if the error came from one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Parse error response from HTTP status and body
pub fn parse_error_response(status: reqwest::StatusCode, bytes: &bytes::Bytes) -> CommonRequestError {
    let message = serde_json::from_slice::<serde_json::Value>(bytes)
        .ok()
        .and_then(|json| extract_error_message(&json))
        .unwrap_or_else(|| String::from_utf8_lossy(bytes).into_owned());

    CommonRequestError::Api {
        status: status.as_u16(),
        message,
    }
}

/// Extract error message from the JSON error formats providers use
fn extract_error_message(json: &serde_json::Value) -> Option<String> {
    // {"error": {"message": "..."}}
    if let Some(msg) = json
        .get("error")
        .and_then(|error| error.get("message"))
        .and_then(serde_json::Value::as_str)
    {
        return Some(msg.to_string());
    }

    // {"error": "..."}
    if let Some(msg) = json.get("error").and_then(serde_json::Value::as_str) {
        return Some(msg.to_string());
    }

    json.get("message")
        .and_then(serde_json::Value::as_str)
        .map(ToString::to_string)
}
