use anthropic_ox::{
    message::{Content, Message as AnthropicMessage, MessageContent, Role, SystemPrompt},
    request::ChatRequest as AnthropicRequest,
    tool::{Tool as AnthropicTool, ToolChoice as AnthropicToolChoice},
};
use groq_ox::{
    message::{AssistantMessage, ContentPart, Message as GroqMessage, UserContent},
    request::ChatRequest as GroqRequest,
    tool::{Function, Tool as GroqTool, ToolCall, ToolChoice as GroqToolChoice},
};
use serde_json::{Map, Value};

use super::{
    constants::{
        MAX_OUTPUT_TOKENS, MIN_OUTPUT_TOKENS, NO_TOOL_RESULT_CONTENT, TOOL_CHOICE_AUTO,
        TOOL_TYPE_FUNCTION,
    },
    model::map_model,
};

/// Convert a Messages API request into a Groq chat completions request.
///
/// `target_model` overrides the model outright; without it the source model
/// goes through [`map_model`] with `default_model` as the fallback.
///
/// A user message carrying `tool_result` blocks right after an assistant turn
/// is folded into one `tool` message per result and is not emitted as a user
/// turn of its own.
pub fn anthropic_to_groq_request(
    request: &AnthropicRequest,
    target_model: Option<&str>,
    default_model: &str,
) -> GroqRequest {
    let mut messages = Vec::with_capacity(request.messages.len() + 1);

    if let Some(system) = request.system.as_ref().and_then(convert_system) {
        messages.push(GroqMessage::system(system));
    }

    let mut source = request.messages.iter().peekable();
    while let Some(message) = source.next() {
        match message.role {
            Role::User => messages.push(convert_user_message(message)),
            Role::Assistant => {
                messages.push(convert_assistant_message(message));

                if let Some(results) =
                    source.next_if(|next| next.role == Role::User && next.has_tool_results())
                {
                    messages.extend(convert_tool_results(results));
                }
            }
        }
    }

    let model = target_model
        .filter(|model| !model.is_empty())
        .map_or_else(|| map_model(&request.model, default_model), str::to_string);

    let tools: Vec<GroqTool> = request
        .tools
        .iter()
        .flatten()
        .filter(|tool| !tool.name.trim().is_empty())
        .map(convert_tool)
        .collect();

    GroqRequest {
        messages,
        model,
        max_tokens: clamp_max_tokens(request.max_tokens),
        temperature: request.temperature,
        top_p: request.top_p,
        stop: request.stop_sequences.clone(),
        stream: request.stream,
        tools: (!tools.is_empty()).then_some(tools),
        tool_choice: request.tool_choice.as_ref().map(convert_tool_choice),
    }
}

/// Clamp a requested output bound into `[1, 8192]`. Total over every `i64`.
pub fn clamp_max_tokens(max_tokens: i64) -> u32 {
    let clamped = max_tokens.clamp(i64::from(MIN_OUTPUT_TOKENS), i64::from(MAX_OUTPUT_TOKENS));
    u32::try_from(clamped).unwrap_or(MAX_OUTPUT_TOKENS)
}

/// Flatten `tool_result` content into the single string a `tool` message carries.
///
/// Arrays contribute one line per element: text blocks and objects with a
/// `text` field give their text, strings pass through, other objects are
/// serialized and non-object scalars are skipped. The joined result is trimmed.
pub fn normalize_tool_result_content(content: Option<&Value>) -> String {
    match content {
        None | Some(Value::Null) => NO_TOOL_RESULT_CONTENT.to_string(),
        Some(Value::String(text)) => text.clone(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(tool_result_item_text)
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_string(),
        Some(Value::Object(map)) if is_text_block(map) => text_field(map),
        Some(other) => other.to_string(),
    }
}

fn tool_result_item_text(item: &Value) -> Option<String> {
    match item {
        Value::String(text) => Some(text.clone()),
        Value::Object(map) if is_text_block(map) || map.contains_key("text") => {
            Some(text_field(map))
        }
        Value::Object(_) => Some(item.to_string()),
        _ => None,
    }
}

fn is_text_block(map: &Map<String, Value>) -> bool {
    map.get("type").and_then(Value::as_str) == Some("text")
}

/// The `text` field as a string; missing, `null`, `false`, `0` and `""` all read as empty.
fn text_field(map: &Map<String, Value>) -> String {
    match map.get("text") {
        Some(Value::String(text)) => text.clone(),
        None | Some(Value::Null | Value::Bool(false)) => String::new(),
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => String::new(),
        Some(other) => other.to_string(),
    }
}

fn convert_system(system: &SystemPrompt) -> Option<String> {
    let text = system.joined_text();
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn convert_user_message(message: &AnthropicMessage) -> GroqMessage {
    let content = match &message.content {
        None => UserContent::Text(String::new()),
        Some(MessageContent::Text(text)) => UserContent::Text(text.clone()),
        Some(MessageContent::Blocks(blocks)) => {
            collapse_parts(blocks.iter().filter_map(convert_user_block).collect())
        }
    };

    GroqMessage::user(content)
}

fn convert_user_block(block: &Content) -> Option<ContentPart> {
    match block {
        Content::Text(text) if !text.is_empty() => Some(ContentPart::text(text.as_str())),
        Content::Text(_) => None,
        Content::Image(image) => {
            let part = image
                .source
                .as_ref()
                .map(|source| ContentPart::image_url(source.to_data_url()));
            if part.is_none() {
                log::debug!("Dropping image block without a base64 source");
            }
            part
        }
        Content::ToolUse(_) | Content::ToolResult(_) | Content::Unknown => {
            log::debug!("Dropping unsupported block in user message");
            None
        }
    }
}

/// A lone text part is sent as a plain string.
fn collapse_parts(parts: Vec<ContentPart>) -> UserContent {
    if parts.len() == 1 {
        if let Some(ContentPart::Text { text }) = parts.first() {
            return UserContent::Text(text.clone());
        }
    }
    UserContent::Parts(parts)
}

fn convert_assistant_message(message: &AnthropicMessage) -> GroqMessage {
    let blocks = match &message.content {
        None => return AssistantMessage::default().into(),
        Some(MessageContent::Text(text)) => return GroqMessage::assistant(text.as_str()),
        Some(MessageContent::Blocks(blocks)) => blocks,
    };

    let mut text = String::new();
    let mut tool_calls = Vec::new();

    for block in blocks {
        match block {
            Content::Text(part) => text.push_str(part.as_str()),
            Content::ToolUse(tool_use) if !tool_use.id.is_empty() && !tool_use.name.is_empty() => {
                tool_calls.push(ToolCall::new(
                    tool_use.id.as_str(),
                    tool_use.name.as_str(),
                    tool_arguments(tool_use.input.as_ref()),
                ));
            }
            Content::ToolUse(_) => log::debug!("Dropping tool_use block without id or name"),
            Content::Image(_) | Content::ToolResult(_) | Content::Unknown => {
                log::debug!("Dropping unsupported block in assistant message");
            }
        }
    }

    AssistantMessage {
        content: (!text.is_empty()).then_some(text),
        tool_calls: (!tool_calls.is_empty()).then_some(tool_calls),
    }
    .into()
}

fn tool_arguments(input: Option<&Value>) -> String {
    match input {
        None | Some(Value::Null) => "{}".to_string(),
        Some(input) => input.to_string(),
    }
}

fn convert_tool_results(message: &AnthropicMessage) -> impl Iterator<Item = GroqMessage> + '_ {
    message
        .blocks()
        .iter()
        .filter_map(Content::as_tool_result)
        .map(|result| {
            GroqMessage::tool(
                result.tool_use_id.as_str(),
                normalize_tool_result_content(result.content.as_ref()),
            )
        })
}

fn convert_tool(tool: &AnthropicTool) -> GroqTool {
    GroqTool {
        r#type: TOOL_TYPE_FUNCTION.to_string(),
        function: Function {
            name: tool.name.clone(),
            description: Some(tool.description.clone().unwrap_or_default()),
            parameters: tool.input_schema.clone(),
        },
    }
}

fn convert_tool_choice(choice: &AnthropicToolChoice) -> GroqToolChoice {
    match choice {
        AnthropicToolChoice::Tool { name } if !name.is_empty() => GroqToolChoice::function(name),
        AnthropicToolChoice::Auto
        | AnthropicToolChoice::Any
        | AnthropicToolChoice::Tool { .. }
        | AnthropicToolChoice::Unknown => GroqToolChoice::Mode(TOOL_CHOICE_AUTO.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn clamps_into_bounds() {
        assert_eq!(clamp_max_tokens(0), 1);
        assert_eq!(clamp_max_tokens(1), 1);
        assert_eq!(clamp_max_tokens(500), 500);
        assert_eq!(clamp_max_tokens(8192), 8192);
        assert_eq!(clamp_max_tokens(999_999), 8192);
        assert_eq!(clamp_max_tokens(-5), 1);
        assert_eq!(clamp_max_tokens(5_000_000_000), 8192);
        assert_eq!(clamp_max_tokens(i64::MIN), 1);
        assert_eq!(clamp_max_tokens(i64::MAX), 8192);
    }

    #[test]
    fn tool_result_array_mixes_item_kinds() {
        let content = json!([
            {"type": "text", "text": "line one"},
            "line two",
            {"text": "line three"},
            {"kind": "blob"},
            42,
            null,
            {"type": "text"}
        ]);

        assert_eq!(
            normalize_tool_result_content(Some(&content)),
            "line one\nline two\nline three\n{\"kind\":\"blob\"}"
        );
    }

    #[test]
    fn tool_result_scalars_and_objects() {
        assert_eq!(normalize_tool_result_content(None), NO_TOOL_RESULT_CONTENT);
        assert_eq!(
            normalize_tool_result_content(Some(&Value::Null)),
            NO_TOOL_RESULT_CONTENT
        );
        assert_eq!(normalize_tool_result_content(Some(&json!("  raw "))), "  raw ");
        assert_eq!(
            normalize_tool_result_content(Some(&json!({"type": "text", "text": "hi"}))),
            "hi"
        );
        assert_eq!(
            normalize_tool_result_content(Some(&json!({"type": "text"}))),
            ""
        );
        assert_eq!(
            normalize_tool_result_content(Some(&json!({"ok": true}))),
            "{\"ok\":true}"
        );
        assert_eq!(normalize_tool_result_content(Some(&json!(7))), "7");
        assert_eq!(
            normalize_tool_result_content(Some(&json!({"type": "text", "text": 3}))),
            "3"
        );
        assert_eq!(normalize_tool_result_content(Some(&json!(false))), "false");
    }

    #[test]
    fn falsy_text_fields_read_as_empty() {
        for text in [json!(false), json!(0), json!(""), Value::Null] {
            assert_eq!(
                normalize_tool_result_content(Some(&json!({"type": "text", "text": text}))),
                ""
            );
        }

        let content = json!([
            {"type": "text", "text": false},
            {"text": 0},
            {"type": "text", "text": "kept"}
        ]);
        assert_eq!(normalize_tool_result_content(Some(&content)), "kept");
    }

    #[test]
    fn missing_tool_input_becomes_empty_object() {
        assert_eq!(tool_arguments(None), "{}");
        assert_eq!(tool_arguments(Some(&Value::Null)), "{}");
        assert_eq!(tool_arguments(Some(&json!({"a": 1}))), "{\"a\":1}");
    }
}
