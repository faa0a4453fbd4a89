//! Streaming conversion from Groq chunks to Messages API stream events
//!
//! Groq fragments tool calls across many chunks keyed by a position index,
//! while the Messages API frames each tool call as its own indexed content
//! block. [`StreamTranslator`] keeps the per-stream state needed to bridge the
//! two: one text block at index 0 and one block per tool call, numbered from 1
//! in the order each call first has both an id and a name.

use std::{collections::HashMap, fmt};

use anthropic_ox::{
    error::ErrorInfo,
    response::{
        ContentBlock, ContentBlockDelta, MessageDelta, StopReason, StreamEvent, StreamMessage,
    },
    usage::Usage as AnthropicUsage,
};
use async_stream::stream;
use futures_util::{Stream, StreamExt, stream::BoxStream};
use groq_ox::response::{ChatCompletionChunk, ToolCallDelta};
use serde_json::{Value, json};
use uuid::Uuid;

use super::{
    constants::{MESSAGE_ID_PREFIX, STREAM_ERROR_PREFIX, TEXT_BLOCK_INDEX},
    response::{convert_usage, map_finish_reason},
};

/// Tracking state for one upstream tool call position.
#[derive(Debug, Default)]
struct ToolCallState {
    id: Option<String>,
    name: Option<String>,
    arguments: String,
    json_emitted: bool,
    /// Output block index, assigned when the block is started.
    output_index: Option<usize>,
}

/// Stateful converter for Groq chunks to Messages API stream events.
///
/// Drive it with [`start`](Self::start) once, [`process_chunk`](Self::process_chunk)
/// per upstream chunk, then [`finish`](Self::finish) on normal end of input or
/// [`fail`](Self::fail) when reading the upstream fails. Each call returns the
/// events to write, in order.
#[derive(Debug)]
pub struct StreamTranslator {
    message_id: String,
    model: String,
    tool_block_counter: usize,
    /// Tool calls in order of first sighting.
    tool_calls: Vec<ToolCallState>,
    /// Upstream position index to slot in `tool_calls`.
    positions: HashMap<u32, usize>,
    stop_reason: StopReason,
    usage: AnthropicUsage,
}

impl StreamTranslator {
    /// Create a translator echoing `model`, with a fresh `msg_` id.
    pub fn new(model: impl Into<String>) -> Self {
        Self::with_message_id(format!("{MESSAGE_ID_PREFIX}{}", Uuid::new_v4().simple()), model)
    }

    pub fn with_message_id(message_id: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            message_id: message_id.into(),
            model: model.into(),
            tool_block_counter: 0,
            tool_calls: Vec::new(),
            positions: HashMap::new(),
            stop_reason: StopReason::EndTurn,
            usage: AnthropicUsage::default().with_cache_read(0),
        }
    }

    pub fn message_id(&self) -> &str {
        &self.message_id
    }

    /// Opening events: `message_start`, the empty text block at index 0 and a `ping`.
    pub fn start(&self) -> Vec<StreamEvent> {
        vec![
            StreamEvent::MessageStart {
                message: StreamMessage::start(self.message_id.as_str(), self.model.as_str()),
            },
            StreamEvent::ContentBlockStart {
                index: TEXT_BLOCK_INDEX,
                content_block: ContentBlock::text(""),
            },
            StreamEvent::Ping,
        ]
    }

    /// Translate one upstream chunk into zero or more events.
    pub fn process_chunk(&mut self, chunk: &ChatCompletionChunk) -> Vec<StreamEvent> {
        let mut events = Vec::new();

        if let Some(usage) = chunk.usage() {
            self.usage = convert_usage(Some(usage));
        }

        let Some(choice) = chunk.choices.first() else {
            return events;
        };

        if let Some(text) = &choice.delta.content {
            events.push(StreamEvent::ContentBlockDelta {
                index: TEXT_BLOCK_INDEX,
                delta: ContentBlockDelta::TextDelta { text: text.clone() },
            });
        }

        for fragment in choice.delta.tool_calls.iter().flatten() {
            self.process_tool_fragment(fragment, &mut events);
        }

        if let Some(reason) = choice.finish_reason.as_deref().filter(|r| !r.is_empty()) {
            self.stop_reason = map_finish_reason(Some(reason));
        }

        events
    }

    fn process_tool_fragment(&mut self, fragment: &ToolCallDelta, events: &mut Vec<StreamEvent>) {
        let position = fragment.index.unwrap_or(0);
        let slot = *self.positions.entry(position).or_insert_with(|| {
            self.tool_calls.push(ToolCallState::default());
            self.tool_calls.len() - 1
        });
        let state = &mut self.tool_calls[slot];

        if let Some(id) = fragment.id.as_deref().filter(|id| !id.is_empty()) {
            state.id = Some(id.to_string());
        }
        let function = fragment.function.as_ref();
        if let Some(name) = function
            .and_then(|f| f.name.as_deref())
            .filter(|name| !name.is_empty())
        {
            state.name = Some(name.to_string());
        }

        if state.output_index.is_none() {
            if let (Some(id), Some(name)) = (&state.id, &state.name) {
                self.tool_block_counter += 1;
                let index = TEXT_BLOCK_INDEX + self.tool_block_counter;
                events.push(StreamEvent::ContentBlockStart {
                    index,
                    content_block: ContentBlock::ToolUse {
                        id: id.clone(),
                        name: name.clone(),
                        input: json!({}),
                    },
                });
                state.output_index = Some(index);
            }
        }

        let Some(arguments) = function
            .and_then(|f| f.arguments.as_deref())
            .filter(|arguments| !arguments.is_empty())
        else {
            return;
        };
        let Some(index) = state.output_index else {
            log::debug!("Dropping arguments for tool call {position} before it has an id and name");
            return;
        };

        state.arguments.push_str(arguments);
        if state.json_emitted {
            return;
        }
        if serde_json::from_str::<Value>(&state.arguments).is_ok() {
            events.push(StreamEvent::ContentBlockDelta {
                index,
                delta: ContentBlockDelta::InputJsonDelta {
                    partial_json: state.arguments.clone(),
                },
            });
            state.json_emitted = true;
        } else {
            log::debug!("Buffering incomplete arguments for tool call {position}");
        }
    }

    /// Closing events after the upstream ended normally.
    pub fn finish(self) -> Vec<StreamEvent> {
        let mut events = vec![StreamEvent::ContentBlockStop {
            index: TEXT_BLOCK_INDEX,
        }];

        events.extend(
            self.tool_calls
                .iter()
                .filter_map(|state| state.output_index)
                .map(|index| StreamEvent::ContentBlockStop { index }),
        );

        events.push(StreamEvent::MessageDelta {
            delta: MessageDelta {
                stop_reason: Some(self.stop_reason),
                stop_sequence: None,
            },
            usage: self.usage,
        });
        events.push(StreamEvent::MessageStop);

        events
    }

    /// The single terminal `error` event for a failed upstream read.
    pub fn fail(&self, error: impl fmt::Display) -> Vec<StreamEvent> {
        vec![StreamEvent::Error {
            error: ErrorInfo::api_error(format!("{STREAM_ERROR_PREFIX}: {error}")),
        }]
    }
}

/// Translate an upstream chunk stream into Messages API stream events.
///
/// Opening events are produced on first poll, before any upstream item is
/// read. Each upstream item is pulled only when the consumer asks for more,
/// and the first upstream error ends the stream with one `error` event.
pub fn translate_stream<S, E>(upstream: S, model: impl Into<String>) -> BoxStream<'static, StreamEvent>
where
    S: Stream<Item = Result<ChatCompletionChunk, E>> + Send + 'static,
    E: fmt::Display + Send + 'static,
{
    let model = model.into();

    Box::pin(stream! {
        let mut translator = StreamTranslator::new(model);
        for event in translator.start() {
            yield event;
        }

        let mut upstream = Box::pin(upstream);
        while let Some(item) = upstream.next().await {
            match item {
                Ok(chunk) => {
                    for event in translator.process_chunk(&chunk) {
                        yield event;
                    }
                }
                Err(e) => {
                    log::warn!("Upstream stream failed: {e}");
                    for event in translator.fail(&e) {
                        yield event;
                    }
                    return;
                }
            }
        }

        for event in translator.finish() {
            yield event;
        }
    })
}
