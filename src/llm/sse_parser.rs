// ABOUTME: Line-buffering SSE parser for streaming completion responses
// ABOUTME: Handles partial lines across TCP boundaries and multiple events per chunk
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # SSE Stream Parser
//!
//! A line-buffering parser for the Server-Sent Events framing used by
//! OpenAI-style streaming endpoints. Two correctness issues are handled
//! here once, for any provider:
//!
//! 1. **Multiple events per TCP chunk**: when network buffers batch
//!    several SSE events into a single `bytes_stream()` chunk, all of
//!    them are emitted, in order.
//! 2. **Partial lines across TCP boundaries**: when a JSON payload is
//!    split across two chunks, the buffer accumulates until a complete
//!    line arrives.
//!
//! The provider supplies a `parse_data` closure that converts raw JSON
//! payloads into [`StreamChunk`]s; the SSE framing (line buffering,
//! `data:` prefix stripping, `[DONE]` detection) lives here.

use std::mem;

use bytes::Bytes;
use futures_util::{future, Stream, StreamExt};

use super::{ChatStream, StreamChunk};
use crate::errors::AppError;

/// A parsed SSE event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseEvent {
    /// A `data:` payload with the prefix stripped
    Data(String),
    /// The `[DONE]` termination signal (OpenAI convention)
    Done,
}

/// Line-buffering SSE parser
///
/// SSE streams are newline-delimited, but TCP does not align network
/// chunks with event boundaries. Incomplete lines stay buffered until a
/// terminating `\n` arrives.
#[derive(Debug, Default)]
pub struct SseLineBuffer {
    /// Bytes not yet terminated by a newline
    buffer: String,
}

impl SseLineBuffer {
    /// Create a new empty line buffer
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed raw bytes from a TCP chunk, returning any complete SSE events
    ///
    /// Complete lines are extracted and parsed; a trailing partial line
    /// remains buffered for the next `feed` call.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<SseEvent> {
        self.buffer.push_str(&String::from_utf8_lossy(bytes));

        let mut events = Vec::new();
        while let Some(newline_pos) = self.buffer.find('\n') {
            let rest = self.buffer.split_off(newline_pos + 1);
            let line = mem::replace(&mut self.buffer, rest);
            events.extend(Self::parse_line(&line));
        }
        events
    }

    /// Flush any remaining buffered content as a final event
    ///
    /// Called when the byte stream ends with a partial line still
    /// buffered (no trailing newline).
    pub fn flush(&mut self) -> Vec<SseEvent> {
        let remaining = mem::take(&mut self.buffer);
        Self::parse_line(&remaining).into_iter().collect()
    }

    /// Parse a single SSE line into an event
    ///
    /// Empty lines (event separators) and non-data fields (`event:`,
    /// `id:`, `retry:`, comments) produce nothing.
    fn parse_line(line: &str) -> Option<SseEvent> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }
        if trimmed == "data: [DONE]" {
            return Some(SseEvent::Done);
        }
        let payload = trimmed.strip_prefix("data: ")?;
        if payload.trim().is_empty() {
            None
        } else {
            Some(SseEvent::Data(payload.to_owned()))
        }
    }
}

/// Wrap a raw byte stream into a buffered [`ChatStream`]
///
/// `parse_data` converts provider-specific JSON payloads into chunks;
/// returning `None` skips events that carry no output (metadata-only
/// deltas). A read error terminates the stream after surfacing one
/// error item. Empty deltas are filtered out unless final.
pub fn create_sse_stream<S, F>(
    byte_stream: S,
    parse_data: F,
    provider_name: &'static str,
) -> ChatStream
where
    S: Stream<Item = Result<Bytes, reqwest::Error>> + Send + 'static,
    F: Fn(&str) -> Option<Result<StreamChunk, AppError>> + Send + 'static,
{
    let stream = async_stream::stream! {
        let mut byte_stream = Box::pin(byte_stream);
        let mut parser = SseLineBuffer::new();

        while let Some(next) = byte_stream.next().await {
            match next {
                Ok(bytes) => {
                    for event in parser.feed(&bytes) {
                        match event {
                            SseEvent::Data(payload) => {
                                if let Some(result) = parse_data(&payload) {
                                    yield result;
                                }
                            }
                            SseEvent::Done => {
                                yield Ok(terminal_chunk());
                                return;
                            }
                        }
                    }
                }
                Err(e) => {
                    yield Err(AppError::external_service(
                        provider_name,
                        format!("Stream read error: {e}"),
                    ));
                    return;
                }
            }
        }

        // Byte stream ended without [DONE]; flush the partial tail
        for event in parser.flush() {
            match event {
                SseEvent::Data(payload) => {
                    if let Some(result) = parse_data(&payload) {
                        yield result;
                    }
                }
                SseEvent::Done => {
                    yield Ok(terminal_chunk());
                    return;
                }
            }
        }
    };

    let filtered = stream.filter(|result| {
        future::ready(
            result
                .as_ref()
                .map_or(true, |chunk| !chunk.delta.is_empty() || chunk.is_final),
        )
    });

    Box::pin(filtered)
}

/// The synthetic final chunk emitted on `[DONE]`
fn terminal_chunk() -> StreamChunk {
    StreamChunk {
        delta: String::new(),
        is_final: true,
        finish_reason: Some("stop".to_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_single_complete_event() {
        let mut parser = SseLineBuffer::new();
        let events = parser.feed(b"data: {\"x\":1}\n\n");
        assert_eq!(events, vec![SseEvent::Data("{\"x\":1}".to_owned())]);
    }

    #[test]
    fn test_feed_partial_line_buffers() {
        let mut parser = SseLineBuffer::new();
        assert!(parser.feed(b"data: {\"x\"").is_empty());
        let events = parser.feed(b":1}\n");
        assert_eq!(events, vec![SseEvent::Data("{\"x\":1}".to_owned())]);
    }

    #[test]
    fn test_feed_multiple_events_per_chunk() {
        let mut parser = SseLineBuffer::new();
        let events = parser.feed(b"data: a\n\ndata: b\n\ndata: [DONE]\n");
        assert_eq!(
            events,
            vec![
                SseEvent::Data("a".to_owned()),
                SseEvent::Data("b".to_owned()),
                SseEvent::Done,
            ]
        );
    }

    #[test]
    fn test_crlf_line_endings() {
        let mut parser = SseLineBuffer::new();
        let events = parser.feed(b"data: hi\r\n\r\n");
        assert_eq!(events, vec![SseEvent::Data("hi".to_owned())]);
    }

    #[test]
    fn test_non_data_fields_ignored() {
        let mut parser = SseLineBuffer::new();
        let events = parser.feed(b"event: message\nid: 3\nretry: 100\n: comment\n");
        assert!(events.is_empty());
    }

    #[test]
    fn test_flush_unterminated_tail() {
        let mut parser = SseLineBuffer::new();
        assert!(parser.feed(b"data: tail").is_empty());
        assert_eq!(parser.flush(), vec![SseEvent::Data("tail".to_owned())]);
        // Second flush is a no-op
        assert!(parser.flush().is_empty());
    }

    #[test]
    fn test_flush_done_signal() {
        let mut parser = SseLineBuffer::new();
        assert!(parser.feed(b"data: [DONE]").is_empty());
        assert_eq!(parser.flush(), vec![SseEvent::Done]);
    }
}
