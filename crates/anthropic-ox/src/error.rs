use serde::{Deserialize, Serialize};

/// The `error` object carried by error bodies and `error` stream events.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorInfo {
    pub r#type: String,
    pub message: String,
}

impl ErrorInfo {
    pub fn new(r#type: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            r#type: r#type.into(),
            message: message.into(),
        }
    }

    pub fn api_error(message: impl Into<String>) -> Self {
        Self::new("api_error", message)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new("invalid_request_error", message)
    }
}

/// Top level error body: `{"type":"error","error":{...}}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub r#type: String,
    pub error: ErrorInfo,
}

impl From<ErrorInfo> for ErrorResponse {
    fn from(error: ErrorInfo) -> Self {
        Self {
            r#type: "error".to_string(),
            error,
        }
    }
}
