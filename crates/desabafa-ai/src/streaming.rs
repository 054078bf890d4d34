//! Server-Sent Events (SSE) streaming parser.
//!
//! Gemini streams `streamGenerateContent?alt=sse` responses as SSE. The
//! parser here is pull-based: it yields one `SseEvent` per blank-line
//! terminated block, so callers can map events to reply fragments lazily.

use futures_util::{stream, Stream, StreamExt};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tokio_util::io::StreamReader;

use crate::AiError;

/// A single SSE event parsed from the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    /// The event type, when the server sent an `event:` field.
    pub event: Option<String>,
    /// The event data; multiple `data:` lines are joined with `\n`.
    pub data: String,
}

struct ParserState<R> {
    lines: Lines<R>,
    event: Option<String>,
    data: String,
    done: bool,
}

impl<R> ParserState<R> {
    fn take_event(&mut self) -> SseEvent {
        SseEvent {
            event: self.event.take(),
            data: std::mem::take(&mut self.data),
        }
    }
}

/// Parse SSE events from any buffered async reader.
pub fn sse_events<R>(reader: R) -> impl Stream<Item = Result<SseEvent, AiError>> + Send
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    let state = ParserState {
        lines: reader.lines(),
        event: None,
        data: String::new(),
        done: false,
    };

    stream::unfold(state, |mut state| async move {
        if state.done {
            return None;
        }

        loop {
            let line = match state.lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => {
                    // Flush an event the server did not terminate
                    state.done = true;
                    if state.data.is_empty() {
                        return None;
                    }
                    let event = state.take_event();
                    return Some((Ok(event), state));
                }
                Err(e) => {
                    state.done = true;
                    return Some((Err(AiError::NetworkError(e.to_string())), state));
                }
            };

            if line.is_empty() {
                if !state.data.is_empty() {
                    let event = state.take_event();
                    return Some((Ok(event), state));
                }
                state.event = None;
                continue;
            }

            if let Some(event_type) = field_value(&line, "event") {
                state.event = Some(event_type.to_string());
            } else if let Some(data) = field_value(&line, "data") {
                if !state.data.is_empty() {
                    state.data.push('\n');
                }
                state.data.push_str(data);
            }
            // id:, retry: and comments are ignored
        }
    })
}

/// Parse SSE events from a streaming HTTP response body.
pub fn response_events(
    response: reqwest::Response,
) -> impl Stream<Item = Result<SseEvent, AiError>> + Send {
    let byte_stream = response
        .bytes_stream()
        .map(|result| result.map_err(std::io::Error::other));
    let reader = tokio::io::BufReader::new(StreamReader::new(byte_stream));
    sse_events(reader)
}

/// `"data: x"` -> `Some("x")` for field `data`. One leading space is
/// part of the separator.
fn field_value<'a>(line: &'a str, field: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(field)?.strip_prefix(':')?;
    Some(rest.strip_prefix(' ').unwrap_or(rest))
}
