//! Server-sent events — byte stream to fragment stream.
//!
//! DESIGN
//! ======
//! Both providers stream replies as SSE. [`SseDecoder`] turns arbitrary byte
//! chunks into complete `data:` payloads; [`fragment_stream`] pumps a body
//! through the decoder and a provider-specific payload parser, yielding one
//! [`Fragment`] per non-empty text delta.
//!
//! Lines are buffered as bytes so a chunk boundary inside a multi-byte UTF-8
//! sequence (e.g. `৳`) never corrupts text.

use std::collections::VecDeque;
use std::fmt::Display;
use std::pin::Pin;

use futures::stream::{self, Stream, StreamExt};

use super::types::{Fragment, FragmentStream, LlmError};

// =============================================================================
// DECODER
// =============================================================================

/// Incremental SSE decoder that yields the `data` field of each event.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buf: Vec<u8>,
    data: Vec<String>,
}

impl SseDecoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk; returns every event completed by it.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buf.extend_from_slice(chunk);
        let mut events = Vec::new();
        while let Some(pos) = self.buf.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buf.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&line[..line.len() - 1]);
            let line = line.strip_suffix('\r').unwrap_or(&line);
            if let Some(event) = self.line(line) {
                events.push(event);
            }
        }
        events
    }

    /// Flush a trailing event that was not terminated by a blank line.
    pub fn finish(&mut self) -> Vec<String> {
        let rest = std::mem::take(&mut self.buf);
        let mut events = Vec::new();
        if !rest.is_empty() {
            let line = String::from_utf8_lossy(&rest);
            let line = line.strip_suffix('\r').unwrap_or(&line);
            if let Some(event) = self.line(line) {
                events.push(event);
            }
        }
        if !self.data.is_empty() {
            events.push(self.data.drain(..).collect::<Vec<_>>().join("\n"));
        }
        events
    }

    fn line(&mut self, line: &str) -> Option<String> {
        if line.is_empty() {
            if self.data.is_empty() {
                return None;
            }
            return Some(self.data.drain(..).collect::<Vec<_>>().join("\n"));
        }
        if line.starts_with(':') {
            return None;
        }
        if let Some(value) = line.strip_prefix("data:") {
            self.data
                .push(value.strip_prefix(' ').unwrap_or(value).to_string());
        }
        // `event:`, `id:` and `retry:` fields carry nothing the providers need.
        None
    }
}

// =============================================================================
// PAYLOADS
// =============================================================================

/// What a provider parser made of one `data:` payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SsePayload {
    /// A text delta (possibly empty, which is skipped).
    Text(String),
    /// The provider's explicit end-of-stream marker.
    Done,
    /// A payload with nothing to display (role headers, usage, etc.).
    Skip,
}

/// Provider-specific payload parser.
pub type PayloadParser = fn(&str) -> Result<SsePayload, LlmError>;

// =============================================================================
// PUMP
// =============================================================================

struct Pump<S> {
    body: Pin<Box<S>>,
    decoder: SseDecoder,
    pending: VecDeque<String>,
    parse: PayloadParser,
    finished: bool,
}

/// Turn an HTTP body stream into a [`FragmentStream`].
///
/// The first error (transport or parse) is yielded once and ends the stream.
pub fn fragment_stream<S, B, E>(body: S, parse: PayloadParser) -> FragmentStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Display + Send + 'static,
{
    let pump = Pump { body: Box::pin(body), decoder: SseDecoder::new(), pending: VecDeque::new(), parse, finished: false };

    stream::unfold(pump, |mut pump| async move {
        loop {
            if let Some(data) = pump.pending.pop_front() {
                match (pump.parse)(&data) {
                    Ok(SsePayload::Text(text)) if !text.is_empty() => {
                        return Some((Ok(Fragment::new(text)), pump));
                    }
                    Ok(SsePayload::Text(_) | SsePayload::Skip) => continue,
                    Ok(SsePayload::Done) => return None,
                    Err(e) => {
                        pump.finished = true;
                        pump.pending.clear();
                        return Some((Err(e), pump));
                    }
                }
            }
            if pump.finished {
                return None;
            }
            match pump.body.next().await {
                Some(Ok(chunk)) => {
                    let events = pump.decoder.push(chunk.as_ref());
                    pump.pending.extend(events);
                }
                Some(Err(e)) => {
                    pump.finished = true;
                    return Some((Err(LlmError::ApiRequest(e.to_string())), pump));
                }
                None => {
                    pump.finished = true;
                    let events = pump.decoder.finish();
                    pump.pending.extend(events);
                }
            }
        }
    })
    .boxed()
}

#[cfg(test)]
#[path = "sse_test.rs"]
mod tests;
