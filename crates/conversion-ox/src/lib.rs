//! Dialect conversions between the Messages API and Groq chat completions.
//!
//! Everything here is pure: functions take explicit inputs, perform no I/O
//! and read no global configuration. Streaming is a pull-based state machine
//! that the caller drives one upstream chunk at a time.

#![cfg_attr(not(test), deny(unsafe_code))]
#![warn(
    clippy::pedantic,
    clippy::unwrap_used,
    clippy::missing_docs_in_private_items
)]

/// Error types for conversion failures
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConversionError {
    /// The upstream response carried no choices
    #[error("No choices in upstream response")]
    EmptyChoices,
    /// Missing required data for conversion
    #[error("Missing required data: {0}")]
    MissingData(String),
}

/// Conversions between Messages API and Groq formats
#[cfg(feature = "anthropic-groq")]
pub mod anthropic_groq;
