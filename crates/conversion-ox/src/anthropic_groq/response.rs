use anthropic_ox::{
    message::Role,
    request::ChatRequest as AnthropicRequest,
    response::{ChatResponse as AnthropicResponse, ContentBlock, StopReason},
    usage::Usage as AnthropicUsage,
};
use groq_ox::{response::ChatResponse as GroqResponse, tool::ToolCall, usage::Usage as GroqUsage};
use serde_json::{Value, json};

use super::constants::{MESSAGE_TYPE, RAW_ARGUMENTS_KEY};
use crate::ConversionError;

/// Convert a buffered Groq chat completion into a Messages API response.
///
/// Only the first choice is used. The model is echoed from `request`.
///
/// # Errors
///
/// [`ConversionError::EmptyChoices`] when the completion has no choices and
/// [`ConversionError::MissingData`] when the first choice has no message.
pub fn groq_to_anthropic_response(
    response: GroqResponse,
    request: &AnthropicRequest,
) -> Result<AnthropicResponse, ConversionError> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or(ConversionError::EmptyChoices)?;
    let message = choice
        .message
        .ok_or_else(|| ConversionError::MissingData("message in first choice".to_string()))?;

    let mut content = Vec::new();

    if let Some(text) = message.content {
        content.push(ContentBlock::Text { text });
    }

    content.extend(
        message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .filter(ToolCall::is_function)
            .map(convert_tool_call),
    );

    if content.is_empty() {
        content.push(ContentBlock::text(""));
    }

    Ok(AnthropicResponse {
        id: response.id,
        r#type: MESSAGE_TYPE.to_string(),
        role: Role::Assistant,
        content,
        model: request.model.clone(),
        stop_reason: map_finish_reason(choice.finish_reason.as_deref()),
        stop_sequence: None,
        usage: convert_usage(response.usage.as_ref()),
    })
}

/// Map a chat completions finish reason onto a Messages stop reason.
///
/// Total: anything unrecognized, or no reason at all, is `end_turn`.
pub fn map_finish_reason(finish_reason: Option<&str>) -> StopReason {
    match finish_reason {
        Some("length") => StopReason::MaxTokens,
        Some("tool_calls") => StopReason::ToolUse,
        _ => StopReason::EndTurn,
    }
}

pub(super) fn convert_usage(usage: Option<&GroqUsage>) -> AnthropicUsage {
    usage.map_or_else(
        || AnthropicUsage::default().with_cache_read(0),
        |usage| {
            AnthropicUsage::new(usage.prompt_tokens, usage.completion_tokens)
                .with_cache_read(usage.cached_tokens())
        },
    )
}

fn convert_tool_call(tool_call: ToolCall) -> ContentBlock {
    let arguments = if tool_call.function.arguments.is_empty() {
        "{}"
    } else {
        tool_call.function.arguments.as_str()
    };

    let input = serde_json::from_str::<Value>(arguments).unwrap_or_else(|e| {
        log::debug!("Tool call {} has unparseable arguments: {e}", tool_call.id);
        json!({ RAW_ARGUMENTS_KEY: arguments })
    });

    ContentBlock::ToolUse {
        id: tool_call.id,
        name: tool_call.function.name,
        input,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finish_reason_table_is_total() {
        assert_eq!(map_finish_reason(Some("stop")), StopReason::EndTurn);
        assert_eq!(map_finish_reason(Some("length")), StopReason::MaxTokens);
        assert_eq!(map_finish_reason(Some("tool_calls")), StopReason::ToolUse);
        assert_eq!(map_finish_reason(Some("content_filter")), StopReason::EndTurn);
        assert_eq!(map_finish_reason(Some("unknown")), StopReason::EndTurn);
        assert_eq!(map_finish_reason(None), StopReason::EndTurn);
    }

    #[test]
    fn unparseable_arguments_are_wrapped() {
        let block = convert_tool_call(ToolCall::new("call_1", "lookup", "{not json"));

        assert_eq!(
            block,
            ContentBlock::ToolUse {
                id: "call_1".to_string(),
                name: "lookup".to_string(),
                input: json!({"raw_arguments": "{not json"}),
            }
        );
    }

    #[test]
    fn empty_arguments_parse_as_empty_object() {
        let block = convert_tool_call(ToolCall::new("call_1", "lookup", ""));

        assert!(matches!(block, ContentBlock::ToolUse { input, .. } if input == json!({})));
    }
}
