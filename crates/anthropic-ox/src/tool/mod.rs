use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// How the model may pick tools.
///
/// Anything that is an object but not one of the known shapes becomes
/// [`ToolChoice::Unknown`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ToolChoice {
    Auto,
    Any,
    Tool {
        #[serde(default)]
        name: String,
    },
    #[serde(other)]
    Unknown,
}

/// `null` stays `None`; any other value that is not a valid choice maps to `Unknown`.
pub(crate) fn lenient_tool_choice<'de, D>(deserializer: D) -> Result<Option<ToolChoice>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    Ok(Some(
        serde_json::from_value(value).unwrap_or(ToolChoice::Unknown),
    ))
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tool {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_schema: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolUse {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<Value>,
}

/// A tool result block. `content` is kept as raw JSON since clients send
/// strings, block arrays, bare objects and occasionally scalars.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolResult {
    #[serde(default)]
    pub tool_use_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}
