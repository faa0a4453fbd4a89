use crate::error::CommonRequestError;
use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use serde::Deserialize;
use std::pin::Pin;

/// Boxed byte stream feeding the parser
type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, CommonRequestError>> + Send>>;

/// Server-Sent Events parser for chat-completion style streams.
///
/// Every `data: <json>` line is one frame. Frames that are not valid JSON for
/// `T` are skipped, `data: [DONE]` ends the stream, and comment, `event:`,
/// `id:` and blank lines are ignored. Lines split across network chunks are
/// reassembled before parsing.
pub struct SseParser {
    byte_stream: ByteStream,
    buffer: Vec<u8>,
    done: bool,
}

impl SseParser {
    pub fn new(response: reqwest::Response) -> Self {
        Self::from_stream(response.bytes_stream())
    }

    /// Build a parser over any stream of byte chunks.
    pub fn from_stream<S, E>(stream: S) -> Self
    where
        S: Stream<Item = Result<Bytes, E>> + Send + 'static,
        E: Into<CommonRequestError>,
    {
        Self {
            byte_stream: Box::pin(stream.map(|chunk| chunk.map_err(Into::into))),
            buffer: Vec::new(),
            done: false,
        }
    }

    /// Get the next parsed event from the stream
    pub async fn next_event<T: for<'de> Deserialize<'de>>(
        &mut self,
    ) -> Result<Option<T>, CommonRequestError> {
        loop {
            if self.done {
                return Ok(None);
            }

            if let Some(event) = self.try_parse_event_from_buffer::<T>() {
                return Ok(Some(event));
            }
            if self.done {
                return Ok(None);
            }

            if let Some(chunk_result) = self.byte_stream.next().await {
                let chunk = chunk_result?;
                self.buffer.extend_from_slice(&chunk);
            } else {
                self.done = true;
                if self.buffer.is_empty() {
                    return Ok(None);
                }
                let line = std::mem::take(&mut self.buffer);
                return Ok(self.process_line::<T>(&String::from_utf8_lossy(&line)));
            }
        }
    }

    /// Try to parse an event from the complete lines in the buffer
    ///
    /// Lines are decoded lossily, so invalid UTF-8 surfaces as a frame that
    /// fails to parse and is skipped.
    fn try_parse_event_from_buffer<T: for<'de> Deserialize<'de>>(&mut self) -> Option<T> {
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line_bytes = self.buffer.drain(..=pos).collect::<Vec<u8>>();
            let line = String::from_utf8_lossy(&line_bytes).into_owned();

            if let Some(event) = self.process_line::<T>(&line) {
                return Some(event);
            }
            if self.done {
                break;
            }
        }

        None
    }

    fn process_line<T: for<'de> Deserialize<'de>>(&mut self, line: &str) -> Option<T> {
        let line = line.trim_end_matches(['\n', '\r']);

        let data = line.strip_prefix("data:")?.trim();
        if data.is_empty() {
            return None;
        }

        if data == "[DONE]" {
            self.done = true;
            self.buffer.clear();
            return None;
        }

        match serde_json::from_str(data) {
            Ok(event) => Some(event),
            Err(e) => {
                log::debug!("Skipping unparseable stream frame: {e}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;
    use serde_json::Value;

    fn parser(chunks: Vec<&'static str>) -> SseParser {
        SseParser::from_stream(stream::iter(
            chunks
                .into_iter()
                .map(|c| Ok::<_, CommonRequestError>(Bytes::from_static(c.as_bytes()))),
        ))
    }

    async fn collect(mut parser: SseParser) -> Vec<Value> {
        let mut events = Vec::new();
        while let Some(event) = parser.next_event::<Value>().await.unwrap() {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn parses_each_data_line() {
        let events = collect(parser(vec![
            "data: {\"n\":1}\n\ndata: {\"n\":2}\n\n",
            "data: [DONE]\n\n",
        ]))
        .await;

        assert_eq!(events.len(), 2);
        assert_eq!(events[1]["n"], 2);
    }

    #[tokio::test]
    async fn reassembles_split_lines() {
        let events = collect(parser(vec!["data: {\"te", "xt\":\"hi\"}\n", "\n"])).await;

        assert_eq!(events, vec![serde_json::json!({"text": "hi"})]);
    }

    #[tokio::test]
    async fn skips_malformed_frames() {
        let events = collect(parser(vec![
            ": keep-alive\n",
            "data: {not json}\n\n",
            "event: chunk\n",
            "data: {\"ok\":true}\n\n",
        ]))
        .await;

        assert_eq!(events, vec![serde_json::json!({"ok": true})]);
    }

    #[tokio::test]
    async fn stops_at_done_marker() {
        let events = collect(parser(vec![
            "data: {\"n\":1}\n\ndata: [DONE]\n\ndata: {\"n\":2}\n\n",
        ]))
        .await;

        assert_eq!(events.len(), 1);
    }

    #[tokio::test]
    async fn parses_trailing_line_without_newline() {
        let events = collect(parser(vec!["data: {\"n\":7}"])).await;

        assert_eq!(events, vec![serde_json::json!({"n": 7})]);
    }

    #[tokio::test]
    async fn skips_frames_with_invalid_utf8() {
        let mut parser = SseParser::from_stream(stream::iter(vec![
            Ok::<_, CommonRequestError>(Bytes::from_static(b"data: {\"n\":\xff}\n\n")),
            Ok(Bytes::from_static(b"data: {\"n\":2}\n\ndata: [DONE]\n\n")),
        ]));

        let first = parser.next_event::<Value>().await.unwrap();
        assert_eq!(first, Some(serde_json::json!({"n": 2})));
        assert!(parser.next_event::<Value>().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn skips_invalid_utf8_in_trailing_line() {
        let mut parser = SseParser::from_stream(stream::iter(vec![Ok::<_, CommonRequestError>(
            Bytes::from_static(b"data: {\"n\":1}\ndata: \xfe\xff"),
        )]));

        assert!(parser.next_event::<Value>().await.unwrap().is_some());
        assert!(parser.next_event::<Value>().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn surfaces_transport_errors() {
        let mut parser = SseParser::from_stream(stream::iter(vec![
            Ok(Bytes::from_static(b"data: {\"n\":1}\n")),
            Err(CommonRequestError::InvalidEventData("connection reset".to_string())),
        ]));

        assert!(parser.next_event::<Value>().await.unwrap().is_some());
        assert!(parser.next_event::<Value>().await.is_err());
    }
}
