use anthropic_ox::error::{ErrorInfo, ErrorResponse};
use conversion_ox::ConversionError;
use groq_ox::GroqRequestError;
use thiserror::Error;

/// Failures of one exchange, each with the HTTP status it is answered with.
#[derive(Error, Debug)]
pub enum ProxyError {
    /// The request body is not a valid Messages API request
    #[error("Invalid request body: {0}")]
    InvalidRequest(#[from] serde_json::Error),

    /// Groq could not be reached or answered with an error
    #[error("Upstream request failed: {0}")]
    Upstream(#[from] GroqRequestError),

    /// The Groq response could not be expressed as a message
    #[error("Response conversion failed: {0}")]
    Conversion(#[from] ConversionError),
}

impl ProxyError {
    /// HTTP status for the client. Upstream errors keep Groq's status when it
    /// sent one and are 502 otherwise.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidRequest(_) => 400,
            Self::Upstream(e) => e.status().unwrap_or(502),
            Self::Conversion(_) => 500,
        }
    }

    /// The Messages API error body for this failure.
    #[must_use]
    pub fn to_error_response(&self) -> ErrorResponse {
        let info = match self {
            Self::InvalidRequest(_) => ErrorInfo::invalid_request(self.to_string()),
            Self::Upstream(_) | Self::Conversion(_) => ErrorInfo::api_error(self.to_string()),
        };
        info.into()
    }
}
