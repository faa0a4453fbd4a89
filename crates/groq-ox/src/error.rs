pub use ai_ox_common::error::{CommonRequestError, parse_error_response};

/// Errors returned by the Groq client.
pub type GroqRequestError = CommonRequestError;
