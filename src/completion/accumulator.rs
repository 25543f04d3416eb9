//! Stream event interpreter and reply accumulator
//!
//! Folds decoded frames into the single in-flight assistant reply. Three
//! streams are concurrently meaningful on the wire:
//!
//! - `status`: pre-answer progress narration, shown until tokens arrive
//! - `data`: the token stream, accumulated into a monotonically growing
//!   reply
//! - `done`: terminal summary; when it carries real text (not the
//!   backend's sentinel placeholder) it replaces the accumulation as the
//!   authoritative final reply
//!
//! Frames are applied strictly in arrival order. The accumulator owns all
//! per-turn folding state explicitly so the same logic runs identically
//! under test and inside a turn.

use crate::completion::decoder::Frame;

/// Sentinel placeholder emitted by the backend on `done` events when the
/// full text was already streamed; a `done` payload equal to this string
/// must never replace the accumulated reply.
pub const DONE_SENTINEL: &str = "....위 내용 전부 담길예정 ...";

/// Classified event names carried by frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Stream opened; no content
    Start,
    /// Progress narration before any tokens
    Status,
    /// Reply tokens
    Data,
    /// Terminal summary
    Done,
    /// Fatal server-side failure
    Error,
    /// Anything else; dropped
    Unknown,
}

impl EventKind {
    /// Classify a wire event name
    pub fn from_name(name: &str) -> Self {
        match name {
            "start" => Self::Start,
            "status" => Self::Status,
            "data" => Self::Data,
            "done" => Self::Done,
            "error" => Self::Error,
            _ => Self::Unknown,
        }
    }
}

/// Visible effect of applying one frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameEffect {
    /// Nothing user-visible changed
    None,
    /// Replace the in-flight message's single content part with this text
    Replace(String),
    /// The server reported a fatal error; stop processing further frames
    Fatal(String),
}

/// Per-turn folding state for one assistant reply
///
/// # Examples
///
/// ```
/// use covo::completion::{Frame, FrameEffect, StreamAccumulator};
///
/// let mut acc = StreamAccumulator::new();
/// let frame = Frame { event: "data".to_string(), message: "Hi".to_string() };
/// assert_eq!(acc.apply(&frame), FrameEffect::Replace("Hi".to_string()));
/// assert_eq!(acc.data(), "Hi");
/// ```
#[derive(Debug, Default)]
pub struct StreamAccumulator {
    /// Accumulated status narration, newline-terminated per entry
    status: String,
    /// Accumulated reply text
    data: String,
    /// Whether the token stream has begun
    data_streaming: bool,
    /// Set once a fatal error frame was seen
    failed: bool,
}

impl StreamAccumulator {
    /// Fresh state: empty accumulators, data streaming not begun
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one frame in arrival order
    ///
    /// Returns what, if anything, the in-flight message content should
    /// become. After a [`FrameEffect::Fatal`], further frames are ignored.
    pub fn apply(&mut self, frame: &Frame) -> FrameEffect {
        if self.failed {
            return FrameEffect::None;
        }

        match EventKind::from_name(&frame.event) {
            EventKind::Start => {
                tracing::debug!("completion stream started");
                FrameEffect::None
            }
            EventKind::Status => {
                // Status is purely a pre-answer progress indicator; once
                // tokens arrive it no longer touches the visible reply.
                if self.data_streaming {
                    return FrameEffect::None;
                }
                self.status.push_str(&frame.message);
                self.status.push('\n');
                FrameEffect::Replace(self.status.clone())
            }
            EventKind::Data => {
                if !self.data_streaming {
                    self.data_streaming = true;
                    self.data.clear();
                }
                if frame.message.is_empty() {
                    return FrameEffect::None;
                }
                self.data.push_str(&frame.message);
                FrameEffect::Replace(self.data.clone())
            }
            EventKind::Done => {
                self.data_streaming = false;
                if !frame.message.is_empty() && frame.message != DONE_SENTINEL {
                    self.data = frame.message.clone();
                    FrameEffect::Replace(self.data.clone())
                } else {
                    FrameEffect::None
                }
            }
            EventKind::Error => {
                self.failed = true;
                FrameEffect::Fatal(frame.message.clone())
            }
            EventKind::Unknown => {
                tracing::debug!("unknown event type dropped: {}", frame.event);
                FrameEffect::None
            }
        }
    }

    /// The accumulated reply text
    pub fn data(&self) -> &str {
        &self.data
    }

    /// Whether any reply text was accumulated
    pub fn has_data(&self) -> bool {
        !self.data.is_empty()
    }

    /// Whether the token stream has begun and not yet settled
    pub fn is_data_streaming(&self) -> bool {
        self.data_streaming
    }

    /// Whether a fatal error frame was seen
    pub fn is_failed(&self) -> bool {
        self.failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(event: &str, message: &str) -> Frame {
        Frame {
            event: event.to_string(),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_start_has_no_visible_effect() {
        let mut acc = StreamAccumulator::new();
        assert_eq!(acc.apply(&frame("start", "Generating completion...")), FrameEffect::None);
        assert!(!acc.has_data());
    }

    #[test]
    fn test_status_accumulates_with_newlines() {
        let mut acc = StreamAccumulator::new();
        assert_eq!(
            acc.apply(&frame("status", "looking up tools")),
            FrameEffect::Replace("looking up tools\n".to_string())
        );
        assert_eq!(
            acc.apply(&frame("status", "calling model")),
            FrameEffect::Replace("looking up tools\ncalling model\n".to_string())
        );
    }

    #[test]
    fn test_first_data_discards_status() {
        let mut acc = StreamAccumulator::new();
        acc.apply(&frame("status", "warming up"));
        assert_eq!(
            acc.apply(&frame("data", "Hello")),
            FrameEffect::Replace("Hello".to_string())
        );
        assert!(acc.is_data_streaming());
    }

    #[test]
    fn test_data_accumulation_is_monotonic() {
        let mut acc = StreamAccumulator::new();
        let parts = ["m1", "m2", "m3", "m4"];
        let mut expected = String::new();
        for part in parts {
            expected.push_str(part);
            assert_eq!(
                acc.apply(&frame("data", part)),
                FrameEffect::Replace(expected.clone())
            );
        }
        assert_eq!(acc.data(), "m1m2m3m4");
    }

    #[test]
    fn test_status_suppressed_after_data_starts() {
        let mut acc = StreamAccumulator::new();
        acc.apply(&frame("data", "Hello"));
        assert_eq!(acc.apply(&frame("status", "late status")), FrameEffect::None);
        assert_eq!(acc.data(), "Hello");
    }

    #[test]
    fn test_done_overrides_accumulation() {
        let mut acc = StreamAccumulator::new();
        acc.apply(&frame("data", "partial "));
        acc.apply(&frame("data", "reply"));
        assert_eq!(
            acc.apply(&frame("done", "the full reply")),
            FrameEffect::Replace("the full reply".to_string())
        );
        assert_eq!(acc.data(), "the full reply");
        assert!(!acc.is_data_streaming());
    }

    #[test]
    fn test_done_sentinel_keeps_accumulation() {
        let mut acc = StreamAccumulator::new();
        acc.apply(&frame("data", "streamed text"));
        assert_eq!(acc.apply(&frame("done", DONE_SENTINEL)), FrameEffect::None);
        assert_eq!(acc.data(), "streamed text");
        assert!(!acc.is_data_streaming());
    }

    #[test]
    fn test_done_with_literal_word_done_overrides() {
        // "done" is an ordinary string, not the sentinel, so it replaces
        // the accumulation.
        let mut acc = StreamAccumulator::new();
        acc.apply(&frame("data", "Hello"));
        assert_eq!(
            acc.apply(&frame("done", "done")),
            FrameEffect::Replace("done".to_string())
        );
        assert_eq!(acc.data(), "done");
    }

    #[test]
    fn test_error_is_fatal_and_preserves_partial_data() {
        let mut acc = StreamAccumulator::new();
        acc.apply(&frame("data", "partial"));
        assert_eq!(
            acc.apply(&frame("error", "model crashed")),
            FrameEffect::Fatal("model crashed".to_string())
        );
        assert!(acc.is_failed());
        // Partial text is preserved and later frames are ignored.
        assert_eq!(acc.data(), "partial");
        assert_eq!(acc.apply(&frame("data", "more")), FrameEffect::None);
        assert_eq!(acc.data(), "partial");
    }

    #[test]
    fn test_unknown_event_dropped() {
        let mut acc = StreamAccumulator::new();
        assert_eq!(acc.apply(&frame("telemetry", "x")), FrameEffect::None);
        assert!(!acc.has_data());
    }

    #[test]
    fn test_status_after_done_resumes_before_new_data() {
        // done resets the streaming flag, so a subsequent status frame is
        // applied again (the backend does this between chained phases).
        let mut acc = StreamAccumulator::new();
        acc.apply(&frame("data", "phase one"));
        acc.apply(&frame("done", DONE_SENTINEL));
        assert!(matches!(
            acc.apply(&frame("status", "phase two")),
            FrameEffect::Replace(_)
        ));
    }

    #[test]
    fn test_event_kind_classification() {
        assert_eq!(EventKind::from_name("start"), EventKind::Start);
        assert_eq!(EventKind::from_name("status"), EventKind::Status);
        assert_eq!(EventKind::from_name("data"), EventKind::Data);
        assert_eq!(EventKind::from_name("done"), EventKind::Done);
        assert_eq!(EventKind::from_name("error"), EventKind::Error);
        assert_eq!(EventKind::from_name("anything"), EventKind::Unknown);
    }
}
