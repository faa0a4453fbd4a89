use core::fmt;
use std::env::VarError;

use bon::Builder;
use conversion_ox::anthropic_groq::DEFAULT_TARGET_MODEL;

/// Settings for one [`MessagesProxy`](crate::MessagesProxy).
#[derive(Clone, Builder)]
pub struct ProxyConfig {
    #[builder(into)]
    pub api_key: String,
    #[builder(default = groq_ox::BASE_URL.to_string(), into)]
    pub base_url: String,
    /// Target model for every request. Without it source models are mapped.
    #[builder(into)]
    pub model: Option<String>,
    /// Target for source models the mapping does not know.
    #[builder(default = DEFAULT_TARGET_MODEL.to_string(), into)]
    pub default_model: String,
    /// Log full converted payloads at debug level.
    #[builder(default)]
    pub debug: bool,
}

impl ProxyConfig {
    /// Read the configuration from the process environment.
    ///
    /// `GROQ_API_KEY` is required. `GROQ_BASE_URL`, `GROQ_MODEL` and
    /// `GROQ_DEFAULT_MODEL` are optional, and `DEBUG=true` turns on payload dumps.
    ///
    /// # Errors
    ///
    /// Returns the `VarError` when `GROQ_API_KEY` is unset.
    pub fn load_from_env() -> Result<Self, VarError> {
        Self::from_vars(|name| std::env::var(name))
    }

    fn from_vars(var: impl Fn(&str) -> Result<String, VarError>) -> Result<Self, VarError> {
        let api_key = var("GROQ_API_KEY")?;
        let optional = |name: &str| var(name).ok().filter(|value| !value.is_empty());

        Ok(Self::builder()
            .api_key(api_key)
            .maybe_base_url(optional("GROQ_BASE_URL"))
            .maybe_model(optional("GROQ_MODEL"))
            .maybe_default_model(optional("GROQ_DEFAULT_MODEL"))
            .debug(optional("DEBUG").is_some_and(|value| value == "true"))
            .build())
    }
}

impl fmt::Debug for ProxyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("default_model", &self.default_model)
            .field("debug", &self.debug)
            .finish()
    }
}
