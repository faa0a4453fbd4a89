use anthropic_ox::response::{ContentBlockDelta, StopReason, StreamEvent};
use conversion_ox::anthropic_groq::{StreamTranslator, translate_stream};
use futures_util::{StreamExt, stream};
use groq_ox::response::ChatCompletionChunk;
use serde_json::{Value, json};

fn chunk(value: Value) -> ChatCompletionChunk {
    serde_json::from_value(value).expect("valid chunk")
}

fn text_chunk(text: &str) -> ChatCompletionChunk {
    chunk(json!({"choices": [{"index": 0, "delta": {"content": text}}]}))
}

fn tool_chunk(index: u32, id: Option<&str>, name: Option<&str>, arguments: &str) -> ChatCompletionChunk {
    let mut call = json!({"index": index, "function": {"arguments": arguments}});
    if let Some(id) = id {
        call["id"] = json!(id);
        call["type"] = json!("function");
    }
    if let Some(name) = name {
        call["function"]["name"] = json!(name);
    }
    chunk(json!({"choices": [{"index": 0, "delta": {"tool_calls": [call]}}]}))
}

fn finish_chunk(reason: &str) -> ChatCompletionChunk {
    chunk(json!({"choices": [{"index": 0, "delta": {}, "finish_reason": reason}]}))
}

async fn collect(chunks: Vec<Result<ChatCompletionChunk, String>>) -> Vec<Value> {
    translate_stream(stream::iter(chunks), "claude-3-haiku-20240307")
        .map(|event| serde_json::to_value(event).unwrap())
        .collect()
        .await
}

fn event_types(events: &[Value]) -> Vec<&str> {
    events.iter().map(|e| e["type"].as_str().unwrap()).collect()
}

#[tokio::test]
async fn test_plain_text_stream() {
    let events = collect(vec![
        Ok(chunk(json!({"choices": [{"index": 0, "delta": {"role": "assistant", "content": ""}}]}))),
        Ok(text_chunk("Hi")),
        Ok(chunk(json!({
            "choices": [{"index": 0, "delta": {}, "finish_reason": "stop"}],
            "x_groq": {"id": "req_1", "usage": {"prompt_tokens": 5, "completion_tokens": 1, "total_tokens": 6}}
        }))),
    ])
    .await;

    let message_id = events[0]["message"]["id"].as_str().unwrap();
    assert!(message_id.starts_with("msg_"));

    assert_eq!(
        events,
        vec![
            json!({"type": "message_start", "message": {
                "id": message_id,
                "type": "message",
                "role": "assistant",
                "content": [],
                "model": "claude-3-haiku-20240307",
                "stop_reason": null,
                "stop_sequence": null,
                "usage": {"input_tokens": 0, "output_tokens": 0}
            }}),
            json!({"type": "content_block_start", "index": 0, "content_block": {"type": "text", "text": ""}}),
            json!({"type": "ping"}),
            json!({"type": "content_block_delta", "index": 0, "delta": {"type": "text_delta", "text": ""}}),
            json!({"type": "content_block_delta", "index": 0, "delta": {"type": "text_delta", "text": "Hi"}}),
            json!({"type": "content_block_stop", "index": 0}),
            json!({"type": "message_delta",
                "delta": {"stop_reason": "end_turn", "stop_sequence": null},
                "usage": {"input_tokens": 5, "output_tokens": 1, "cache_read_input_tokens": 0}}),
            json!({"type": "message_stop"}),
        ]
    );
}

#[tokio::test]
async fn test_empty_upstream_still_frames_a_message() {
    let events = collect(Vec::new()).await;

    assert_eq!(
        event_types(&events),
        vec![
            "message_start",
            "content_block_start",
            "ping",
            "content_block_stop",
            "message_delta",
            "message_stop"
        ]
    );
    assert_eq!(events[4]["delta"]["stop_reason"], "end_turn");
    assert_eq!(
        events[4]["usage"],
        json!({"input_tokens": 0, "output_tokens": 0, "cache_read_input_tokens": 0})
    );
}

#[tokio::test]
async fn test_split_arguments_are_emitted_once() {
    let events = collect(vec![
        Ok(tool_chunk(0, Some("call_1"), Some("lookup"), "")),
        Ok(tool_chunk(0, None, None, "{\"a\":1")),
        Ok(tool_chunk(0, None, None, "}")),
        Ok(tool_chunk(0, None, None, " ")),
        Ok(finish_chunk("tool_calls")),
    ])
    .await;

    assert_eq!(
        events[3],
        json!({"type": "content_block_start", "index": 1,
            "content_block": {"type": "tool_use", "id": "call_1", "name": "lookup", "input": {}}})
    );

    let json_deltas: Vec<&Value> = events
        .iter()
        .filter(|e| e["delta"]["type"] == "input_json_delta")
        .collect();
    assert_eq!(json_deltas.len(), 1);
    assert_eq!(json_deltas[0]["index"], 1);
    assert_eq!(json_deltas[0]["delta"]["partial_json"], "{\"a\":1}");

    let tail = &events[events.len() - 4..];
    assert_eq!(tail[0], json!({"type": "content_block_stop", "index": 0}));
    assert_eq!(tail[1], json!({"type": "content_block_stop", "index": 1}));
    assert_eq!(tail[2]["delta"]["stop_reason"], "tool_use");
    assert_eq!(tail[3]["type"], "message_stop");
}

#[tokio::test]
async fn test_interleaved_tool_calls_are_numbered_by_start() {
    let events = collect(vec![
        // Position 1 gets its name first, position 0 only later.
        Ok(tool_chunk(0, Some("call_a"), None, "{\"dropped\":0}")),
        Ok(tool_chunk(1, Some("call_b"), Some("second"), "{}")),
        Ok(tool_chunk(0, None, Some("first"), "{\"x\":")),
        Ok(tool_chunk(0, None, None, "true}")),
        Ok(tool_chunk(2, Some("call_c"), Some("third"), "{\"y\":2}")),
        Ok(finish_chunk("tool_calls")),
    ])
    .await;

    let starts: Vec<(u64, &str)> = events
        .iter()
        .filter(|e| e["type"] == "content_block_start" && e["index"] != 0)
        .map(|e| {
            (
                e["index"].as_u64().unwrap(),
                e["content_block"]["id"].as_str().unwrap(),
            )
        })
        .collect();
    assert_eq!(starts, vec![(1, "call_b"), (2, "call_a"), (3, "call_c")]);

    let deltas: Vec<(u64, &str)> = events
        .iter()
        .filter(|e| e["delta"]["type"] == "input_json_delta")
        .map(|e| {
            (
                e["index"].as_u64().unwrap(),
                e["delta"]["partial_json"].as_str().unwrap(),
            )
        })
        .collect();
    // The first fragment for call_a arrived before it had a name and is dropped.
    assert_eq!(
        deltas,
        vec![(1, "{}"), (2, "{\"x\":true}"), (3, "{\"y\":2}")]
    );

    let stops: Vec<u64> = events
        .iter()
        .filter(|e| e["type"] == "content_block_stop")
        .map(|e| e["index"].as_u64().unwrap())
        .collect();
    // Closed in the order each position was first seen.
    assert_eq!(stops, vec![0, 2, 1, 3]);
}

#[tokio::test]
async fn test_tool_call_without_name_is_never_started() {
    let events = collect(vec![
        Ok(tool_chunk(0, Some("call_1"), None, "{}")),
        Ok(finish_chunk("tool_calls")),
    ])
    .await;

    assert!(
        events
            .iter()
            .all(|e| e["type"] != "content_block_start" || e["index"] == 0)
    );
    assert_eq!(
        events
            .iter()
            .filter(|e| e["type"] == "content_block_stop")
            .count(),
        1
    );
}

#[tokio::test]
async fn test_latest_usage_wins() {
    let events = collect(vec![
        Ok(chunk(json!({
            "choices": [],
            "usage": {"prompt_tokens": 1, "completion_tokens": 1, "total_tokens": 2}
        }))),
        Ok(text_chunk("ok")),
        Ok(chunk(json!({
            "choices": [{"index": 0, "delta": {}, "finish_reason": "length"}],
            "usage": {
                "prompt_tokens": 30,
                "completion_tokens": 9,
                "total_tokens": 39,
                "prompt_tokens_details": {"cached_tokens": 16}
            }
        }))),
    ])
    .await;

    let delta = events
        .iter()
        .find(|e| e["type"] == "message_delta")
        .unwrap();
    assert_eq!(delta["delta"]["stop_reason"], "max_tokens");
    assert_eq!(
        delta["usage"],
        json!({"input_tokens": 30, "output_tokens": 9, "cache_read_input_tokens": 16})
    );
}

#[tokio::test]
async fn test_upstream_error_ends_with_error_event() {
    let events = collect(vec![
        Ok(text_chunk("partial")),
        Err("connection reset".to_string()),
        Ok(text_chunk("never seen")),
    ])
    .await;

    assert_eq!(
        event_types(&events),
        vec![
            "message_start",
            "content_block_start",
            "ping",
            "content_block_delta",
            "error"
        ]
    );
    assert_eq!(
        events[4],
        json!({"type": "error", "error": {"type": "api_error", "message": "Streaming error: connection reset"}})
    );
}

#[test]
fn test_translator_drives_without_a_stream() {
    let mut translator = StreamTranslator::with_message_id("msg_fixed", "claude-3-5-sonnet");

    let opening = translator.start();
    assert_eq!(opening.len(), 3);
    assert!(matches!(
        &opening[0],
        StreamEvent::MessageStart { message } if message.id == "msg_fixed" && message.model == "claude-3-5-sonnet"
    ));
    assert_eq!(translator.message_id(), "msg_fixed");

    let events = translator.process_chunk(&text_chunk("yo"));
    assert_eq!(
        events,
        vec![StreamEvent::ContentBlockDelta {
            index: 0,
            delta: ContentBlockDelta::TextDelta {
                text: "yo".to_string()
            },
        }]
    );

    assert!(translator.process_chunk(&finish_chunk("")).is_empty());

    let closing = translator.finish();
    assert!(closing.last().is_some_and(StreamEvent::is_terminal));
    assert!(matches!(
        &closing[1],
        StreamEvent::MessageDelta { delta, .. } if delta.stop_reason == Some(StopReason::EndTurn)
    ));
    assert_eq!(closing[0], StreamEvent::ContentBlockStop { index: 0 });
}
