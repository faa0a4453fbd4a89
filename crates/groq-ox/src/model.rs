use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

/// Groq chat models the proxy routes to
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    IntoStaticStr,
    PartialEq,
    Eq,
    Hash,
)]
pub enum Model {
    #[strum(to_string = "llama-3.3-70b-versatile")]
    #[serde(rename = "llama-3.3-70b-versatile")]
    Llama3_3_70bVersatile,
    #[strum(to_string = "llama-3.1-70b-versatile")]
    #[serde(rename = "llama-3.1-70b-versatile")]
    Llama3_1_70bVersatile,
    #[strum(to_string = "llama-3.1-8b-instant")]
    #[serde(rename = "llama-3.1-8b-instant")]
    Llama3_1_8bInstant,
    #[strum(to_string = "moonshotai/kimi-k2-instruct")]
    #[serde(rename = "moonshotai/kimi-k2-instruct")]
    #[default]
    KimiK2Instruct,
}

impl Model {
    /// Wire identifier of the model.
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}
