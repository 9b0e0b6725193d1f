//! Newline-delimited JSON streaming for Ollama generate replies.
//!
//! Converts a raw byte stream into [`GenerateChunk`] values and aggregates
//! the fragments. Lines are split on the `\n` byte before UTF-8 decoding,
//! so records and multi-byte characters that straddle chunk boundaries are
//! reassembled intact. Undecodable lines are logged and skipped.

use bytes::Bytes;
use futures::stream::{Stream, StreamExt};
use std::fmt::Display;
use std::pin::Pin;
use std::task::{Context, Poll};

use crate::error::{OllamaError, Result};
use crate::types::GenerateChunk;

type ByteStream = Pin<Box<dyn Stream<Item = std::result::Result<Bytes, String>> + Send>>;

/// Receives text fragments in arrival order.
///
/// Any `FnMut(&str)` closure is a sink.
pub trait FragmentSink {
    fn on_fragment(&mut self, fragment: &str);
}

impl<F> FragmentSink for F
where
    F: FnMut(&str),
{
    fn on_fragment(&mut self, fragment: &str) {
        self(fragment)
    }
}

/// Pending bytes that do not yet form a complete line.
#[derive(Debug, Default)]
pub struct LineBuffer {
    pending: Vec<u8>,
    // bytes of `pending` already known to hold no newline
    scanned: usize,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append raw bytes from the transport.
    pub fn push(&mut self, bytes: &[u8]) {
        self.pending.extend_from_slice(bytes);
    }

    /// Take the next complete line, without its trailing `\n`.
    pub fn next_line(&mut self) -> Option<Vec<u8>> {
        let Some(offset) = self.pending[self.scanned..].iter().position(|&b| b == b'\n') else {
            self.scanned = self.pending.len();
            return None;
        };
        let pos = self.scanned + offset;
        self.scanned = 0;
        let mut line: Vec<u8> = self.pending.drain(..=pos).collect();
        line.pop();
        Some(line)
    }

    /// Take whatever is left once the transport has ended.
    pub fn finish(&mut self) -> Option<Vec<u8>> {
        self.scanned = 0;
        if self.pending.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.pending))
        }
    }

    /// Number of buffered bytes.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

/// Decode one line into a record; `None` for blank or malformed lines.
pub fn decode_line(line: &[u8]) -> Option<GenerateChunk> {
    let text = match std::str::from_utf8(line) {
        Ok(text) => text.trim(),
        Err(e) => {
            tracing::warn!(error = %e, len = line.len(), "Skipping stream line with invalid UTF-8");
            return None;
        }
    };

    if text.is_empty() {
        return None;
    }

    match serde_json::from_str::<GenerateChunk>(text) {
        Ok(chunk) => Some(chunk),
        Err(e) => {
            tracing::warn!(
                error = %e,
                line = %text.chars().take(200).collect::<String>(),
                "Skipping malformed stream line"
            );
            None
        }
    }
}

/// Stream adapter that converts raw NDJSON bytes into [`GenerateChunk`] values.
///
/// Ends after the first record with `done: true` (the transport is released
/// at that point) or when the byte stream ends. A transport error is yielded
/// once and ends the stream.
pub struct GenerateStream {
    inner: ByteStream,
    buffer: LineBuffer,
    finished: bool,
}

impl GenerateStream {
    pub fn new<S, B, E>(byte_stream: S) -> Self
    where
        S: Stream<Item = std::result::Result<B, E>> + Send + 'static,
        B: Into<Bytes> + 'static,
        E: Display + 'static,
    {
        let inner = byte_stream.map(|item| item.map(Into::into).map_err(|e| e.to_string()));
        Self {
            inner: Box::pin(inner),
            buffer: LineBuffer::new(),
            finished: false,
        }
    }

    fn finish(&mut self) {
        self.finished = true;
        // drop the transport
        self.inner = Box::pin(futures::stream::empty::<std::result::Result<Bytes, String>>());
    }
}

impl Stream for GenerateStream {
    type Item = Result<GenerateChunk>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        loop {
            if this.finished {
                return Poll::Ready(None);
            }

            // Drain complete lines before asking for more bytes
            while let Some(line) = this.buffer.next_line() {
                if let Some(chunk) = decode_line(&line) {
                    if chunk.done {
                        this.finish();
                    }
                    return Poll::Ready(Some(Ok(chunk)));
                }
            }

            match this.inner.as_mut().poll_next(cx) {
                Poll::Ready(Some(Ok(bytes))) => {
                    this.buffer.push(&bytes);
                }
                Poll::Ready(Some(Err(e))) => {
                    this.finish();
                    return Poll::Ready(Some(Err(OllamaError::Transport(e))));
                }
                Poll::Ready(None) => {
                    // Last line may lack its newline
                    let tail = this.buffer.finish();
                    this.finish();
                    if let Some(chunk) = tail.as_deref().and_then(decode_line) {
                        return Poll::Ready(Some(Ok(chunk)));
                    }
                    return Poll::Ready(None);
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

/// Drain a [`GenerateStream`], delivering each non-empty fragment to `sink`
/// and returning their concatenation.
///
/// Fragments delivered before a transport error are not retracted; the
/// error is returned instead of the text.
pub async fn aggregate<K>(mut stream: GenerateStream, mut sink: K) -> Result<String>
where
    K: FragmentSink,
{
    let mut full_text = String::new();
    let mut fragments = 0usize;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| {
            tracing::warn!(error = %e, fragments, "Generate stream failed");
            e
        })?;

        if let Some(fragment) = chunk.fragment() {
            full_text.push_str(fragment);
            fragments += 1;
            sink.on_fragment(fragment);
        }

        if chunk.done {
            break;
        }
    }

    tracing::debug!(fragments, chars = full_text.len(), "Generate stream complete");
    Ok(full_text)
}

/// Aggregate a raw NDJSON byte stream.
///
/// Convenience for `aggregate(GenerateStream::new(chunks), sink)`.
pub async fn aggregate_stream<S, B, E, K>(chunks: S, sink: K) -> Result<String>
where
    S: Stream<Item = std::result::Result<B, E>> + Send + 'static,
    B: Into<Bytes> + 'static,
    E: Display + 'static,
    K: FragmentSink,
{
    aggregate(GenerateStream::new(chunks), sink).await
}
