//! Completion stream frame decoder
//!
//! Turns an arbitrarily-chunked byte stream into complete `(event, data)`
//! frames. The completion endpoint uses a line-oriented framing rule:
//!
//! - `event: <name>` sets the current event name for subsequent data lines,
//!   persisting until changed
//! - `data: <json>` carries a `{"message": "..."}` payload interpreted
//!   under the current event name
//! - blank lines and anything else are ignored
//!
//! A blank line is not required to terminate a frame: each `data:` line is
//! self-contained given the most recently seen `event:` line. Chunk
//! boundaries carry no meaning — a line may arrive split across any number
//! of chunks, including mid-codepoint, so the decoder buffers raw bytes and
//! only decodes a line once its terminating newline has arrived.

use serde::Deserialize;

/// One decoded `(event, data)` unit from the stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// The event name in effect when the data line arrived
    pub event: String,
    /// The payload's `message` field
    pub message: String,
}

/// JSON payload carried by a `data:` line
#[derive(Debug, Deserialize)]
struct FramePayload {
    #[serde(default)]
    message: Option<String>,
}

/// Incremental decoder for the completion byte stream
///
/// Feed chunks with [`push_chunk`](Self::push_chunk) as they arrive; each
/// call returns the frames completed by that chunk. Call
/// [`finish`](Self::finish) once the stream ends to flush an unterminated
/// final line — trailing data must not be silently lost.
///
/// # Examples
///
/// ```
/// use covo::completion::FrameDecoder;
///
/// let mut decoder = FrameDecoder::new();
/// let frames = decoder.push_chunk(b"event: data\ndata: {\"message\":\"hi\"}\n");
/// assert_eq!(frames.len(), 1);
/// assert_eq!(frames[0].event, "data");
/// assert_eq!(frames[0].message, "hi");
/// ```
#[derive(Debug, Default)]
pub struct FrameDecoder {
    /// Raw bytes of the current incomplete line
    buffer: Vec<u8>,
    /// Most recently seen `event:` value
    current_event: String,
}

impl FrameDecoder {
    /// Create a decoder with an empty buffer and no current event
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk of bytes, returning all frames it completed
    ///
    /// Every line except a possible trailing incomplete one is processed
    /// and removed from the buffer; the trailing remainder is retained and
    /// prefixed to the next chunk.
    pub fn push_chunk(&mut self, chunk: &[u8]) -> Vec<Frame> {
        self.buffer.extend_from_slice(chunk);

        let mut frames = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line_bytes: Vec<u8> = self.buffer.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&line_bytes[..pos]);
            if let Some(frame) = self.process_line(&line) {
                frames.push(frame);
            }
        }
        frames
    }

    /// Flush the leftover buffer after the stream ends
    ///
    /// Applies the same line rules to the unterminated final line, if any.
    pub fn finish(mut self) -> Vec<Frame> {
        if self.buffer.is_empty() {
            return Vec::new();
        }
        let leftover: Vec<u8> = std::mem::take(&mut self.buffer);
        let line = String::from_utf8_lossy(&leftover).into_owned();
        self.process_line(&line).into_iter().collect()
    }

    /// Classify one complete line, possibly emitting a frame
    ///
    /// - blank lines are frame separators and carry nothing
    /// - `event:` lines update the current event name
    /// - `data:` lines are parsed as JSON; malformed payloads are dropped
    ///   and logged, and decoding continues
    /// - any other line is ignored
    fn process_line(&mut self, line: &str) -> Option<Frame> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }

        if let Some(name) = trimmed.strip_prefix("event:") {
            self.current_event = name.trim().to_string();
            return None;
        }

        if let Some(data) = trimmed.strip_prefix("data:") {
            let data = data.trim();
            match serde_json::from_str::<FramePayload>(data) {
                Ok(FramePayload {
                    message: Some(message),
                }) => {
                    return Some(Frame {
                        event: self.current_event.clone(),
                        message,
                    });
                }
                Ok(FramePayload { message: None }) => {
                    tracing::debug!("data line without message field dropped: {}", data);
                }
                Err(e) => {
                    tracing::warn!("malformed data payload dropped: {}: {}", e, data);
                }
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Decode an entire payload through a fresh decoder, including the
    /// final flush.
    fn decode_all(chunks: &[&[u8]]) -> Vec<Frame> {
        let mut decoder = FrameDecoder::new();
        let mut frames = Vec::new();
        for chunk in chunks {
            frames.extend(decoder.push_chunk(chunk));
        }
        frames.extend(decoder.finish());
        frames
    }

    fn frame(event: &str, message: &str) -> Frame {
        Frame {
            event: event.to_string(),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_single_chunk_single_frame() {
        let frames = decode_all(&[b"event: data\ndata: {\"message\":\"hi\"}\n"]);
        assert_eq!(frames, vec![frame("data", "hi")]);
    }

    #[test]
    fn test_event_name_persists_across_data_lines() {
        let body = b"event: data\n\
                     data: {\"message\":\"a\"}\n\
                     data: {\"message\":\"b\"}\n\
                     event: done\n\
                     data: {\"message\":\"c\"}\n";
        let frames = decode_all(&[body]);
        assert_eq!(
            frames,
            vec![frame("data", "a"), frame("data", "b"), frame("done", "c")]
        );
    }

    #[test]
    fn test_split_mid_line_reassembled() {
        // The payload is split in the middle of a data line's JSON string.
        let frames = decode_all(&[
            b"event: data\ndata: {\"message\":\"Hel",
            b"lo\"}\n\nevent: done\ndata: {\"message\":\"done\"}\n",
        ]);
        assert_eq!(frames, vec![frame("data", "Hello"), frame("done", "done")]);
    }

    #[test]
    fn test_any_split_point_yields_same_frames() {
        let payload: &[u8] = b"event: status\n\
                               data: {\"message\":\"step one\"}\n\
                               event: data\n\
                               data: {\"message\":\"partial\"}\n\
                               data: {\"message\":\" reply\"}\n\
                               event: done\n\
                               data: {\"message\":\"final\"}\n";
        let expected = decode_all(&[payload]);
        assert_eq!(expected.len(), 4);

        for split in 0..=payload.len() {
            let (left, right) = payload.split_at(split);
            let frames = decode_all(&[left, right]);
            assert_eq!(frames, expected, "split at byte {}", split);
        }
    }

    #[test]
    fn test_byte_at_a_time_with_multibyte_text() {
        // Korean text exercises splits inside multi-byte codepoints.
        let payload =
            "event: data\ndata: {\"message\":\"안녕하세요\"}\n".as_bytes();
        let chunks: Vec<&[u8]> = payload.chunks(1).collect();
        let frames = decode_all(&chunks);
        assert_eq!(frames, vec![frame("data", "안녕하세요")]);
    }

    #[test]
    fn test_malformed_json_dropped_stream_continues() {
        let body = b"event: data\n\
                     data: {not json}\n\
                     data: {\"message\":\"ok\"}\n";
        let frames = decode_all(&[body]);
        assert_eq!(frames, vec![frame("data", "ok")]);
    }

    #[test]
    fn test_data_without_message_field_dropped() {
        let body = b"event: data\n\
                     data: {\"other\":\"x\"}\n\
                     data: {\"message\":\"kept\"}\n";
        let frames = decode_all(&[body]);
        assert_eq!(frames, vec![frame("data", "kept")]);
    }

    #[test]
    fn test_blank_and_unknown_lines_ignored() {
        let body = b"\n\
                     : comment-ish noise\n\
                     retry: 3000\n\
                     event: data\n\
                     \n\
                     data: {\"message\":\"hi\"}\n";
        let frames = decode_all(&[body]);
        assert_eq!(frames, vec![frame("data", "hi")]);
    }

    #[test]
    fn test_unterminated_final_line_flushed() {
        // No trailing newline on the last data line; finish() must not
        // lose it.
        let mut decoder = FrameDecoder::new();
        let frames = decoder.push_chunk(b"event: done\ndata: {\"message\":\"tail\"}");
        assert!(frames.is_empty());
        let flushed = decoder.finish();
        assert_eq!(flushed, vec![frame("done", "tail")]);
    }

    #[test]
    fn test_finish_with_empty_buffer_is_empty() {
        let mut decoder = FrameDecoder::new();
        decoder.push_chunk(b"event: data\ndata: {\"message\":\"x\"}\n");
        assert!(decoder.finish().is_empty());
    }

    #[test]
    fn test_crlf_line_endings_tolerated() {
        let body = b"event: data\r\ndata: {\"message\":\"hi\"}\r\n";
        let frames = decode_all(&[body]);
        assert_eq!(frames, vec![frame("data", "hi")]);
    }

    #[test]
    fn test_data_before_any_event_line_has_empty_event() {
        let frames = decode_all(&[b"data: {\"message\":\"orphan\"}\n"]);
        assert_eq!(frames, vec![frame("", "orphan")]);
    }
}
